//! Relationship construction.
//!
//! Every constructor checks that its operands come from the model it is
//! asked to change and that they are of a fitting kind, then builds the
//! minimal paired structure.

use std::fmt;

use log::debug;

use astrolabe_core::{
    metamodel::Kind,
    model::{ElementId, Model},
    uml::{attributes as attr, kinds, literals, relations as rel},
};

use super::{
    ensure_kind, ensure_same_model,
    navigability::{Navigability, set_navigability},
};
use crate::error::RecipeError;

/// Kind of a connector, derived from the roles it connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Assembly,
    Delegation,
}

impl ConnectorKind {
    /// `Delegation` when exactly one role is a port and the other a plain
    /// property, `Assembly` otherwise.
    pub fn between(model: &Model, role_a: ElementId, role_b: ElementId) -> Self {
        let is_port = |role| model.is_a(role, kinds::PORT);
        let is_plain_property = |role| model.is_a(role, kinds::PROPERTY) && !is_port(role);
        if (is_port(role_a) && is_plain_property(role_b))
            || (is_plain_property(role_a) && is_port(role_b))
        {
            Self::Delegation
        } else {
            Self::Assembly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assembly => literals::ASSEMBLY,
            Self::Delegation => literals::DELEGATION,
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creates a `Dependency` from `client` to `supplier`.
pub fn create_dependency(
    model: &mut Model,
    supplier: ElementId,
    client: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Supplier and Client", &[supplier, client])?;
    create_directed(model, Kind::new(kinds::DEPENDENCY), supplier, client)
}

/// Creates a dependency of `kind` (any `Dependency` specialization) with
/// both ends set.
fn create_directed(
    model: &mut Model,
    kind: Kind,
    supplier: ElementId,
    client: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_kind(model, supplier, kinds::NAMED_ELEMENT)?;
    ensure_kind(model, client, kinds::NAMED_ELEMENT)?;
    let dependency = model.create(kind)?;
    model.set(dependency, rel::SUPPLIER, Some(supplier))?;
    model.set(dependency, rel::CLIENT, Some(client))?;
    debug!(kind:% = kind, supplier:% = supplier, client:% = client; "Dependency created");
    Ok(dependency)
}

/// Creates a `Realization` of the component `abstraction` by
/// `realizing_classifier`.
pub fn create_realization(
    model: &mut Model,
    realizing_classifier: ElementId,
    abstraction: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(
        model,
        "Realizing classifier and Abstraction",
        &[realizing_classifier, abstraction],
    )?;
    ensure_kind(model, realizing_classifier, kinds::CLASSIFIER)?;
    ensure_kind(model, abstraction, kinds::COMPONENT)?;
    let realization = model.create(kinds::REALIZATION)?;
    model.set(
        realization,
        rel::REALIZING_CLASSIFIER,
        Some(realizing_classifier),
    )?;
    model.set(realization, rel::ABSTRACTION, Some(abstraction))?;
    Ok(realization)
}

/// Creates a `Generalization` making `specific` a specialization of
/// `general`. The generalization is owned by `specific`.
pub fn create_generalization(
    model: &mut Model,
    general: ElementId,
    specific: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "General and Specific", &[general, specific])?;
    ensure_kind(model, general, kinds::CLASSIFIER)?;
    ensure_kind(model, specific, kinds::CLASSIFIER)?;
    let generalization = model.create(kinds::GENERALIZATION)?;
    model.set(generalization, rel::GENERAL, Some(general))?;
    model.set(generalization, rel::SPECIFIC, Some(specific))?;
    Ok(generalization)
}

/// Creates an `Association` with two fresh ends typed `type_a` and
/// `type_b`. Both ends start with unknown navigability.
pub fn create_association(
    model: &mut Model,
    type_a: ElementId,
    type_b: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Head and Tail end", &[type_a, type_b])?;
    ensure_kind(model, type_a, kinds::TYPE)?;
    ensure_kind(model, type_b, kinds::TYPE)?;

    let association = model.create(kinds::ASSOCIATION)?;
    let end_a = model.create(kinds::PROPERTY)?;
    let end_b = model.create(kinds::PROPERTY)?;
    model.set(end_a, rel::ASSOCIATION, Some(association))?;
    model.set(end_b, rel::ASSOCIATION, Some(association))?;
    model.set(end_a, rel::TYPE, Some(type_a))?;
    model.set(end_b, rel::TYPE, Some(type_b))?;

    set_navigability(model, association, end_a, Navigability::Unknown)?;
    set_navigability(model, association, end_b, Navigability::Unknown)?;
    debug!(association:% = association, head:% = type_a, tail:% = type_b; "Association created");
    Ok(association)
}

/// Creates a `Connector` whose two ends play `role_a` and `role_b`.
pub fn create_connector(
    model: &mut Model,
    role_a: ElementId,
    role_b: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Head and Tail end", &[role_a, role_b])?;
    ensure_kind(model, role_a, kinds::CONNECTABLE_ELEMENT)?;
    ensure_kind(model, role_b, kinds::CONNECTABLE_ELEMENT)?;

    let connector = model.create(kinds::CONNECTOR)?;
    let end_a = model.create(kinds::CONNECTOR_END)?;
    let end_b = model.create(kinds::CONNECTOR_END)?;
    model.add(connector, rel::END, end_a)?;
    model.add(connector, rel::END, end_b)?;
    model.set(end_a, rel::ROLE, Some(role_a))?;
    model.set(end_b, rel::ROLE, Some(role_b))?;

    let kind = ConnectorKind::between(model, role_a, role_b);
    model.set_attribute(connector, attr::KIND, Some(kind.as_str().into()))?;
    debug!(connector:% = connector, kind:% = kind; "Connector created");
    Ok(connector)
}

/// The dependency kind to materialize between `client` and `supplier`.
///
/// - `Usage` when the supplier is an interface,
/// - `Realization` when the supplier is a component and the client a
///   classifier other than a component,
/// - a plain `Dependency` otherwise.
pub fn dependency_type(
    model: &Model,
    client: ElementId,
    supplier: ElementId,
) -> Result<Kind, RecipeError> {
    model.kind(client)?;
    model.kind(supplier)?;
    // Interface is a Classifier too, so it goes first.
    let kind = if model.is_a(supplier, kinds::INTERFACE) {
        kinds::USAGE
    } else if model.is_a(supplier, kinds::COMPONENT)
        && model.is_a(client, kinds::CLASSIFIER)
        && !model.is_a(client, kinds::COMPONENT)
    {
        kinds::REALIZATION
    } else {
        kinds::DEPENDENCY
    };
    Ok(Kind::new(kind))
}

/// Creates the dependency [`dependency_type`] picks for `client` and
/// `supplier`. Realizations also get their realizing classifier and
/// abstraction set.
pub fn create_inferred_dependency(
    model: &mut Model,
    client: ElementId,
    supplier: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Supplier and Client", &[supplier, client])?;
    let kind = dependency_type(model, client, supplier)?;
    let dependency = create_directed(model, kind, supplier, client)?;
    if kind == Kind::new(kinds::REALIZATION) {
        model.set(dependency, rel::REALIZING_CLASSIFIER, Some(client))?;
        model.set(dependency, rel::ABSTRACTION, Some(supplier))?;
    }
    Ok(dependency)
}

/// Creates a new message with fresh occurrence specifications covering the
/// same lifelines as `message`. An inverted clone runs the other way: the
/// copy of the receive event becomes the send event and vice versa.
pub fn clone_message(
    model: &mut Model,
    message: ElementId,
    inverted: bool,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Message", &[message])?;
    ensure_kind(model, message, kinds::MESSAGE)?;
    let send_event = model.get(message, rel::SEND_EVENT)?;
    let receive_event = model.get(message, rel::RECEIVE_EVENT)?;

    let clone = model.create(kinds::MESSAGE)?;
    let send = clone_event(model, send_event)?;
    let receive = clone_event(model, receive_event)?;

    let (send, receive) = if inverted {
        (receive, send)
    } else {
        (send, receive)
    };
    model.set(clone, rel::SEND_EVENT, send)?;
    model.set(clone, rel::RECEIVE_EVENT, receive)?;
    Ok(clone)
}

fn clone_event(
    model: &mut Model,
    event: Option<ElementId>,
) -> Result<Option<ElementId>, RecipeError> {
    let Some(event) = event else {
        return Ok(None);
    };
    let covered = model.get(event, rel::COVERED)?;
    let clone = model.create(kinds::MESSAGE_OCCURRENCE_SPECIFICATION)?;
    model.set(clone, rel::COVERED, covered)?;
    Ok(Some(clone))
}

/// The member ends of `association`, in order.
pub fn association_ends(
    model: &Model,
    association: ElementId,
) -> Result<Vec<ElementId>, RecipeError> {
    ensure_kind(model, association, kinds::ASSOCIATION)?;
    Ok(model.related(association, rel::MEMBER_END)?)
}

/// The other member end of the association `end` belongs to.
pub fn opposite_end(model: &Model, end: ElementId) -> Result<Option<ElementId>, RecipeError> {
    let Some(association) = model.get(end, rel::ASSOCIATION)? else {
        return Ok(None);
    };
    Ok(model
        .related(association, rel::MEMBER_END)?
        .into_iter()
        .find(|member| *member != end))
}
