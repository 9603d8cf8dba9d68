//! Edit scripts.
//!
//! An edit script is a TOML document listing `[[step]]` tables. Each step
//! names its operation in `op` and calls exactly one recipe on the model.
//! Elements created by earlier steps are referred to by the script-local
//! `id` they were bound to.
//!
//! ```toml
//! [[step]]
//! op = "create"
//! id = "order"
//! kind = "Class"
//! name = "Order"
//!
//! [[step]]
//! op = "create"
//! id = "line"
//! kind = "Class"
//! name = "OrderLine"
//!
//! [[step]]
//! op = "association"
//! id = "lines"
//! head = "order"
//! tail = "line"
//!
//! [[step]]
//! op = "navigability"
//! end = "lines.tail"
//! navigability = "navigable"
//! ```
//!
//! An association step binds its ends as `<id>.head` and `<id>.tail`.

use std::ops::Range;

use indexmap::IndexMap;
use log::{debug, info, trace};
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

use astrolabe_core::{
    model::{ElementId, Model},
    uml::relations as rel,
    value::AttributeValue,
};

use crate::{
    c4model,
    error::RecipeError,
    recipes::{
        literal,
        navigability::{self, Navigability},
        relationship, slot, stereotype,
    },
};

/// Script-local ids and the elements they are bound to, in binding order.
pub type Bindings = IndexMap<String, ElementId>;

/// Failures while loading or replaying an edit script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid script: {message}")]
    Syntax {
        message: String,
        span: Option<Range<usize>>,
    },

    #[error("step {step}: `{id}` is not bound by an earlier step")]
    UnknownId {
        step: usize,
        id: String,
        span: Range<usize>,
    },

    #[error("step {step}: `{id}` is already bound")]
    DuplicateId {
        step: usize,
        id: String,
        span: Range<usize>,
    },

    #[error("step {step}: unknown element kind `{kind}`")]
    UnknownKind {
        step: usize,
        kind: String,
        span: Range<usize>,
    },

    #[error("step {step} ({op}) failed: {source}")]
    Recipe {
        step: usize,
        op: &'static str,
        source: RecipeError,
        span: Range<usize>,
    },
}

impl ScriptError {
    /// Byte range of the offending part of the script source.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Syntax { span, .. } => span.clone(),
            Self::UnknownId { span, .. }
            | Self::DuplicateId { span, .. }
            | Self::UnknownKind { span, .. }
            | Self::Recipe { span, .. } => Some(span.clone()),
        }
    }

    /// A hint on how to fix the script, when there is one.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::UnknownId { .. } => {
                Some("bind the element with `id = \"...\"` in an earlier step")
            }
            Self::DuplicateId { .. } => Some("script ids must be unique"),
            Self::UnknownKind { .. } => {
                Some("use a UML kind such as `Class` or an enabled profile kind")
            }
            Self::Syntax { .. } | Self::Recipe { .. } => None,
        }
    }
}

/// One edit operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Creates an element of `kind`, optionally named.
    Create {
        id: String,
        kind: String,
        name: Option<String>,
    },
    /// Sets or clears a scalar attribute.
    Attribute {
        element: String,
        attribute: String,
        value: Option<AttributeValue>,
    },
    /// Adds `target` to a relation of `source`.
    Link {
        source: String,
        relation: String,
        target: String,
    },
    Extension {
        id: Option<String>,
        metaclass: String,
        stereotype: String,
    },
    ApplyStereotype {
        id: Option<String>,
        element: String,
        stereotype: String,
    },
    RemoveStereotype {
        element: String,
        stereotype: String,
    },
    Association {
        id: String,
        head: String,
        tail: String,
        name: Option<String>,
    },
    Navigability {
        end: String,
        navigability: Navigability,
    },
    /// A plain dependency, or the kind picked by
    /// [`relationship::dependency_type`] when `infer` is set.
    Dependency {
        id: Option<String>,
        client: String,
        supplier: String,
        #[serde(default)]
        infer: bool,
    },
    Generalization {
        id: Option<String>,
        general: String,
        specific: String,
    },
    Realization {
        id: Option<String>,
        classifier: String,
        abstraction: String,
    },
    Connector {
        id: Option<String>,
        head: String,
        tail: String,
    },
    Lower {
        element: String,
        value: Option<String>,
    },
    Upper {
        element: String,
        value: Option<String>,
    },
    Default {
        element: String,
        value: Option<String>,
    },
    Slot {
        id: Option<String>,
        instance: String,
        feature: String,
        value: Option<String>,
    },
    CloneMessage {
        id: Option<String>,
        message: String,
        #[serde(default)]
        inverted: bool,
    },
    OwnerContainer {
        element: String,
        container: Option<String>,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Attribute { .. } => "attribute",
            Self::Link { .. } => "link",
            Self::Extension { .. } => "extension",
            Self::ApplyStereotype { .. } => "apply_stereotype",
            Self::RemoveStereotype { .. } => "remove_stereotype",
            Self::Association { .. } => "association",
            Self::Navigability { .. } => "navigability",
            Self::Dependency { .. } => "dependency",
            Self::Generalization { .. } => "generalization",
            Self::Realization { .. } => "realization",
            Self::Connector { .. } => "connector",
            Self::Lower { .. } => "lower",
            Self::Upper { .. } => "upper",
            Self::Default { .. } => "default",
            Self::Slot { .. } => "slot",
            Self::CloneMessage { .. } => "clone_message",
            Self::OwnerContainer { .. } => "owner_container",
        }
    }
}

/// A parsed edit script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    steps: Vec<Spanned<Step>>,
}

impl Script {
    /// Parses a script from TOML source.
    ///
    /// # Errors
    ///
    /// [`ScriptError::Syntax`] when the source is not valid TOML or a step
    /// does not match any operation.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(source).map_err(|err| ScriptError::Syntax {
            message: err.message().to_string(),
            span: err.span(),
        })?;
        debug!(steps = script.steps.len(); "Script parsed");
        Ok(script)
    }

    /// The steps in replay order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(Spanned::get_ref)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replays every step on `model`, stopping at the first failure.
    ///
    /// Steps applied before a failure stay applied.
    pub fn apply(&self, model: &mut Model) -> Result<Bindings, ScriptError> {
        let mut replay = Replay {
            model,
            bindings: Bindings::new(),
            step: 0,
            span: 0..0,
        };
        for (index, step) in self.steps.iter().enumerate() {
            replay.step = index + 1;
            replay.span = step.span();
            trace!(step = replay.step, op = step.get_ref().op(); "Replaying step");
            replay.run(step.get_ref())?;
        }
        info!(steps = self.steps.len(), elements = replay.model.len(); "Script replayed");
        Ok(replay.bindings)
    }
}

struct Replay<'a> {
    model: &'a mut Model,
    bindings: Bindings,
    step: usize,
    span: Range<usize>,
}

impl Replay<'_> {
    fn lookup(&self, id: &str) -> Result<ElementId, ScriptError> {
        self.bindings
            .get(id)
            .copied()
            .ok_or_else(|| ScriptError::UnknownId {
                step: self.step,
                id: id.to_string(),
                span: self.span.clone(),
            })
    }

    fn lookup_optional(&self, id: Option<&str>) -> Result<Option<ElementId>, ScriptError> {
        id.map(|id| self.lookup(id)).transpose()
    }

    /// Fails when any of `ids` is already bound.
    fn ensure_unbound<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i str>,
    ) -> Result<(), ScriptError> {
        for id in ids {
            if self.bindings.contains_key(id) {
                return Err(ScriptError::DuplicateId {
                    step: self.step,
                    id: id.to_string(),
                    span: self.span.clone(),
                });
            }
        }
        Ok(())
    }

    fn bind(&mut self, id: Option<&str>, element: ElementId) {
        if let Some(id) = id {
            debug!(id, element:% = element; "Element bound");
            self.bindings.insert(id.to_string(), element);
        }
    }

    fn recipe<T>(
        &self,
        op: &'static str,
        result: Result<T, RecipeError>,
    ) -> Result<T, ScriptError> {
        result.map_err(|source| ScriptError::Recipe {
            step: self.step,
            op,
            source,
            span: self.span.clone(),
        })
    }

    fn run(&mut self, step: &Step) -> Result<(), ScriptError> {
        let op = step.op();
        match step {
            Step::Create { id, kind, name } => {
                self.ensure_unbound([id.as_str()])?;
                let resolved = self.model.metamodel().kind(kind).ok_or_else(|| {
                    ScriptError::UnknownKind {
                        step: self.step,
                        kind: kind.clone(),
                        span: self.span.clone(),
                    }
                })?;
                let result = self.model.create(resolved).map_err(RecipeError::from);
                let element = self.recipe(op, result)?;
                if let Some(name) = name {
                    let result = self.model.set_name(element, name).map_err(RecipeError::from);
                    self.recipe(op, result)?;
                }
                self.bind(Some(id.as_str()), element);
            }
            Step::Attribute {
                element,
                attribute,
                value,
            } => {
                let element = self.lookup(element)?;
                let result = self
                    .model
                    .set_attribute(element, attribute.as_str(), value.clone())
                    .map_err(RecipeError::from);
                self.recipe(op, result)?;
            }
            Step::Link {
                source,
                relation,
                target,
            } => {
                let (source, target) = (self.lookup(source)?, self.lookup(target)?);
                let result = self
                    .model
                    .add(source, relation.as_str(), target)
                    .map_err(RecipeError::from);
                self.recipe(op, result)?;
            }
            Step::Extension {
                id,
                metaclass,
                stereotype,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (metaclass, stereotype) = (self.lookup(metaclass)?, self.lookup(stereotype)?);
                let result = stereotype::create_extension(self.model, metaclass, stereotype);
                let extension = self.recipe(op, result)?;
                self.bind(id.as_deref(), extension);
            }
            Step::ApplyStereotype {
                id,
                element,
                stereotype,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (element, stereotype) = (self.lookup(element)?, self.lookup(stereotype)?);
                let result = stereotype::apply_stereotype(self.model, element, stereotype);
                let instance = self.recipe(op, result)?;
                self.bind(id.as_deref(), instance);
            }
            Step::RemoveStereotype {
                element,
                stereotype,
            } => {
                let (element, stereotype) = (self.lookup(element)?, self.lookup(stereotype)?);
                let result = stereotype::remove_stereotype(self.model, element, stereotype);
                self.recipe(op, result)?;
            }
            Step::Association {
                id,
                head,
                tail,
                name,
            } => {
                let head_id = format!("{id}.head");
                let tail_id = format!("{id}.tail");
                self.ensure_unbound([id.as_str(), head_id.as_str(), tail_id.as_str()])?;
                let (head, tail) = (self.lookup(head)?, self.lookup(tail)?);
                let result = relationship::create_association(self.model, head, tail);
                let association = self.recipe(op, result)?;
                if let Some(name) = name {
                    let result = self.model.set_name(association, name).map_err(RecipeError::from);
                    self.recipe(op, result)?;
                }
                let result = relationship::association_ends(self.model, association);
                let ends = self.recipe(op, result)?;
                self.bind(Some(id.as_str()), association);
                if let [head_end, tail_end] = ends[..] {
                    self.bind(Some(head_id.as_str()), head_end);
                    self.bind(Some(tail_id.as_str()), tail_end);
                }
            }
            Step::Navigability { end, navigability } => {
                let end = self.lookup(end)?;
                let result = self.set_navigability(end, *navigability);
                self.recipe(op, result)?;
            }
            Step::Dependency {
                id,
                client,
                supplier,
                infer,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (client, supplier) = (self.lookup(client)?, self.lookup(supplier)?);
                let result = if *infer {
                    relationship::create_inferred_dependency(self.model, client, supplier)
                } else {
                    relationship::create_dependency(self.model, supplier, client)
                };
                let dependency = self.recipe(op, result)?;
                self.bind(id.as_deref(), dependency);
            }
            Step::Generalization {
                id,
                general,
                specific,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (general, specific) = (self.lookup(general)?, self.lookup(specific)?);
                let result = relationship::create_generalization(self.model, general, specific);
                let generalization = self.recipe(op, result)?;
                self.bind(id.as_deref(), generalization);
            }
            Step::Realization {
                id,
                classifier,
                abstraction,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (classifier, abstraction) =
                    (self.lookup(classifier)?, self.lookup(abstraction)?);
                let result = relationship::create_realization(self.model, classifier, abstraction);
                let realization = self.recipe(op, result)?;
                self.bind(id.as_deref(), realization);
            }
            Step::Connector { id, head, tail } => {
                self.ensure_unbound(id.as_deref())?;
                let (head, tail) = (self.lookup(head)?, self.lookup(tail)?);
                let result = relationship::create_connector(self.model, head, tail);
                let connector = self.recipe(op, result)?;
                self.bind(id.as_deref(), connector);
            }
            Step::Lower { element, value } => {
                let element = self.lookup(element)?;
                let result =
                    literal::set_lower_value_from_string(self.model, element, value.as_deref());
                self.recipe(op, result)?;
            }
            Step::Upper { element, value } => {
                let element = self.lookup(element)?;
                let result =
                    literal::set_upper_value_from_string(self.model, element, value.as_deref());
                self.recipe(op, result)?;
            }
            Step::Default { element, value } => {
                let element = self.lookup(element)?;
                let result =
                    literal::set_default_value_from_string(self.model, element, value.as_deref());
                self.recipe(op, result)?;
            }
            Step::Slot {
                id,
                instance,
                feature,
                value,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let (instance, feature) = (self.lookup(instance)?, self.lookup(feature)?);
                let result = slot::add_slot(self.model, instance, feature);
                let created = self.recipe(op, result)?;
                if let Some(value) = value {
                    let result = slot::set_slot_value(self.model, created, value);
                    self.recipe(op, result)?;
                }
                self.bind(id.as_deref(), created);
            }
            Step::CloneMessage {
                id,
                message,
                inverted,
            } => {
                self.ensure_unbound(id.as_deref())?;
                let message = self.lookup(message)?;
                let result = relationship::clone_message(self.model, message, *inverted);
                let clone = self.recipe(op, result)?;
                self.bind(id.as_deref(), clone);
            }
            Step::OwnerContainer { element, container } => {
                let element = self.lookup(element)?;
                let container = self.lookup_optional(container.as_deref())?;
                let result = c4model::set_owner_container(self.model, element, container);
                self.recipe(op, result)?;
            }
        }
        Ok(())
    }

    /// Sets the navigability of `end` within the association it belongs to.
    fn set_navigability(
        &mut self,
        end: ElementId,
        navigability: Navigability,
    ) -> Result<(), RecipeError> {
        let Some(association) = self.model.get(end, rel::ASSOCIATION)? else {
            return Err(RecipeError::MissingOpposite { end });
        };
        navigability::set_navigability(self.model, association, end, navigability)
    }
}

#[cfg(test)]
mod tests {
    use astrolabe_core::uml::kinds;

    use super::*;
    use crate::registry;

    fn replay(source: &str) -> (Model, Result<Bindings, ScriptError>) {
        let script = Script::parse(source).expect("script parses");
        let mut model = registry::new_model();
        let result = script.apply(&mut model);
        (model, result)
    }

    #[test]
    fn test_parse_steps() {
        let script = Script::parse(
            r#"
            [[step]]
            op = "create"
            id = "order"
            kind = "Class"

            [[step]]
            op = "navigability"
            end = "lines.tail"
            navigability = "nonNavigable"
            "#,
        )
        .unwrap();

        let ops: Vec<&str> = script.steps().map(Step::op).collect();
        assert_eq!(ops, ["create", "navigability"]);
        assert!(matches!(
            script.steps().nth(1),
            Some(Step::Navigability {
                navigability: Navigability::NonNavigable,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_script() {
        let script = Script::parse("").unwrap();
        assert!(script.is_empty());
    }

    #[test]
    fn test_unknown_op_is_a_syntax_error() {
        let err = Script::parse(
            r#"
            [[step]]
            op = "explode"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ScriptError::Syntax { .. }));
    }

    #[test]
    fn test_association_binds_ends() {
        let (model, result) = replay(
            r#"
            [[step]]
            op = "create"
            id = "order"
            kind = "Class"
            name = "Order"

            [[step]]
            op = "create"
            id = "line"
            kind = "Class"
            name = "OrderLine"

            [[step]]
            op = "association"
            id = "lines"
            head = "order"
            tail = "line"

            [[step]]
            op = "navigability"
            end = "lines.tail"
            navigability = "navigable"

            [[step]]
            op = "upper"
            element = "lines.tail"
            value = "*"
            "#,
        );
        let bindings = result.unwrap();

        let tail = bindings["lines.tail"];
        let order = bindings["order"];
        assert_eq!(model.get(tail, rel::TYPE).unwrap(), Some(bindings["line"]));
        assert!(model.contains_link(order, rel::OWNED_ATTRIBUTE, tail).unwrap());
        assert_eq!(
            literal::upper_value_as_string(&model, tail).unwrap().as_deref(),
            Some("*")
        );
    }

    #[test]
    fn test_short_profile_kind_names_resolve() {
        let (model, result) = replay(
            r#"
            [[step]]
            op = "create"
            id = "shop"
            kind = "Container"

            [[step]]
            op = "create"
            id = "db"
            kind = "Database"

            [[step]]
            op = "owner_container"
            element = "db"
            container = "shop"
            "#,
        );
        let bindings = result.unwrap();

        assert!(model.is_a(bindings["db"], c4model::kinds::CONTAINER));
        assert_eq!(
            model.get(bindings["db"], c4model::relations::OWNER_CONTAINER).unwrap(),
            Some(bindings["shop"])
        );
    }

    #[test]
    fn test_unknown_id_stops_replay() {
        let (model, result) = replay(
            r#"
            [[step]]
            op = "create"
            id = "order"
            kind = "Class"

            [[step]]
            op = "dependency"
            client = "order"
            supplier = "missing"
            "#,
        );

        let err = result.unwrap_err();
        assert!(matches!(&err, ScriptError::UnknownId { step: 2, id, .. } if id == "missing"));
        assert!(err.help().is_some());
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let (model, result) = replay(
            r#"
            [[step]]
            op = "create"
            id = "order"
            kind = "Class"

            [[step]]
            op = "create"
            id = "order"
            kind = "Interface"
            "#,
        );

        assert!(matches!(result, Err(ScriptError::DuplicateId { step: 2, .. })));
        assert_eq!(model.elements_of(kinds::INTERFACE).count(), 0);
    }

    #[test]
    fn test_recipe_failure_carries_step_span() {
        let source = r#"
[[step]]
op = "create"
id = "order"
kind = "Class"

[[step]]
op = "lower"
element = "order"
value = "many"
"#;
        let (_, result) = replay(source);

        let err = result.unwrap_err();
        assert!(matches!(
            &err,
            ScriptError::Recipe {
                step: 2,
                op: "lower",
                source: RecipeError::InvalidLiteral { .. },
                ..
            }
        ));
        let span = err.span().unwrap();
        assert!(span.start < span.end && span.end <= source.len());
    }

    #[test]
    fn test_unknown_kind() {
        let (_, result) = replay(
            r#"
            [[step]]
            op = "create"
            id = "thing"
            kind = "Gizmo"
            "#,
        );

        assert!(matches!(result, Err(ScriptError::UnknownKind { kind, .. }) if kind == "Gizmo"));
    }
}
