//! The element graph.
//!
//! A [`Model`] is an arena of elements whose kinds, attributes and relations
//! are described by a [`Metamodel`]. Elements are addressed by [`ElementId`]
//! handles; a handle carries the identity of the model that created it so
//! that links between models are rejected.
//!
//! Links are only ever changed through [`Model::set`], [`Model::add`],
//! [`Model::remove`] and [`Model::unlink`], which keep both sides of an
//! opposite-paired relation in sync.

use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use indexmap::{IndexMap, IndexSet};
use log::trace;

use crate::{
    error::ModelError,
    identifier::Id,
    metamodel::{Kind, Metamodel, RelationDefinition, RelationKey, Upper},
    uml,
    value::AttributeValue,
};

static NEXT_MODEL_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Handle of an element inside a [`Model`].
///
/// Handles stay valid as values after the element is unlinked; every access
/// through a dead handle reports [`ModelError::Unlinked`]. Slots are never
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    model: ModelId,
    index: u32,
}

impl ElementId {
    /// The model that created the element.
    pub fn model(&self) -> ModelId {
        self.model
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.index)
    }
}

/// A change applied to a model, delivered to subscribers after the fact.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    ElementCreated {
        element: ElementId,
        kind: Kind,
    },
    ElementDeleted {
        element: ElementId,
        kind: Kind,
    },
    AssociationAdded {
        element: ElementId,
        relation: Id,
        target: ElementId,
    },
    AssociationDeleted {
        element: ElementId,
        relation: Id,
        target: ElementId,
    },
    AttributeUpdated {
        element: ElementId,
        attribute: Id,
        old: Option<AttributeValue>,
        new: Option<AttributeValue>,
    },
}

/// Token returned by [`Model::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Handler = Box<dyn FnMut(&ModelEvent)>;

#[derive(Debug, Clone)]
struct ElementData {
    kind: Kind,
    attributes: IndexMap<Id, AttributeValue>,
    links: IndexMap<RelationKey, Vec<ElementId>>,
}

impl ElementData {
    fn links(&self, key: RelationKey) -> &[ElementId] {
        self.links.get(&key).map(Vec::as_slice).unwrap_or_default()
    }
}

/// An arena of elements conforming to a [`Metamodel`].
pub struct Model {
    id: ModelId,
    metamodel: &'static Metamodel,
    elements: Vec<Option<ElementData>>,
    live: usize,
    subscribers: Vec<Option<Handler>>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("elements", &self.live)
            .field("subscribers", &self.subscribers.iter().flatten().count())
            .finish()
    }
}

impl Model {
    /// Creates an empty model over `metamodel`.
    pub fn new(metamodel: &'static Metamodel) -> Self {
        let id = ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed));
        trace!(model:% = id; "Model created");
        Self {
            id,
            metamodel,
            elements: Vec::new(),
            live: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn metamodel(&self) -> &'static Metamodel {
        self.metamodel
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` is a live element of this model.
    pub fn contains(&self, id: ElementId) -> bool {
        self.data(id).is_ok()
    }

    fn data(&self, id: ElementId) -> Result<&ElementData, ModelError> {
        if id.model != self.id {
            return Err(ModelError::ForeignElement {
                element: id,
                model: self.id,
            });
        }
        self.elements
            .get(id.index as usize)
            .and_then(Option::as_ref)
            .ok_or(ModelError::Unlinked(id))
    }

    fn data_mut(&mut self, id: ElementId) -> Result<&mut ElementData, ModelError> {
        if id.model != self.id {
            return Err(ModelError::ForeignElement {
                element: id,
                model: self.id,
            });
        }
        self.elements
            .get_mut(id.index as usize)
            .and_then(Option::as_mut)
            .ok_or(ModelError::Unlinked(id))
    }

    /// Allocates a new element of a concrete `kind`.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownKind`] if the kind is not registered and
    /// [`ModelError::AbstractKind`] if it cannot be instantiated.
    pub fn create(&mut self, kind: impl Into<Kind>) -> Result<ElementId, ModelError> {
        let kind = kind.into();
        let definition = self
            .metamodel
            .definition(kind)
            .ok_or(ModelError::UnknownKind(kind))?;
        if definition.is_abstract() {
            return Err(ModelError::AbstractKind(kind));
        }

        let element = ElementId {
            model: self.id,
            index: self.elements.len() as u32,
        };
        self.elements.push(Some(ElementData {
            kind,
            attributes: IndexMap::new(),
            links: IndexMap::new(),
        }));
        self.live += 1;

        trace!(element:% = element, kind:% = kind; "Element created");
        self.emit(ModelEvent::ElementCreated { element, kind });
        Ok(element)
    }

    pub fn kind(&self, id: ElementId) -> Result<Kind, ModelError> {
        self.data(id).map(|data| data.kind)
    }

    /// Whether `id` is a live element whose kind is `base` or specializes it.
    pub fn is_a(&self, id: ElementId, base: impl Into<Kind>) -> bool {
        self.kind(id)
            .is_ok_and(|kind| self.metamodel.is_a(kind, base))
    }

    /// Live elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| ElementId {
                model: self.id,
                index: index as u32,
            })
    }

    /// Live elements matching `predicate`, in creation order.
    pub fn select<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = ElementId> + 'a
    where
        P: FnMut(ElementId) -> bool + 'a,
    {
        self.elements().filter(move |id| predicate(*id))
    }

    /// Live elements of `kind` or any of its specializations.
    pub fn elements_of(&self, kind: impl Into<Kind>) -> impl Iterator<Item = ElementId> + '_ {
        let kind = kind.into();
        self.select(move |id| self.is_a(id, kind))
    }

    fn relation_definition(
        &self,
        id: ElementId,
        relation: Id,
    ) -> Result<&'static RelationDefinition, ModelError> {
        let kind = self.kind(id)?;
        let metamodel: &'static Metamodel = self.metamodel;
        metamodel
            .relation(kind, relation)
            .ok_or(ModelError::UnknownRelation { kind, relation })
    }

    /// Elements linked to `id` through `relation`.
    ///
    /// Derived unions are computed from their subsets, without duplicates.
    pub fn related(
        &self,
        id: ElementId,
        relation: impl Into<Id>,
    ) -> Result<Vec<ElementId>, ModelError> {
        let definition = self.relation_definition(id, relation.into())?;
        let data = self.data(id)?;
        if !definition.is_derived() {
            return Ok(data.links(definition.key()).to_vec());
        }
        let mut collected = IndexSet::new();
        self.collect_union(data, definition, &mut collected);
        Ok(collected.into_iter().collect())
    }

    fn collect_union(
        &self,
        data: &ElementData,
        union: &RelationDefinition,
        collected: &mut IndexSet<ElementId>,
    ) {
        for key in union.subsets() {
            let subset = self.metamodel.relation_at(*key);
            if subset.is_derived() {
                self.collect_union(data, subset, collected);
            } else {
                collected.extend(data.links(*key).iter().copied());
            }
        }
    }

    /// The single element linked through an upper-one `relation`, or the
    /// first one for a many-valued relation.
    pub fn get(
        &self,
        id: ElementId,
        relation: impl Into<Id>,
    ) -> Result<Option<ElementId>, ModelError> {
        self.related(id, relation)
            .map(|related| related.first().copied())
    }

    pub fn contains_link(
        &self,
        id: ElementId,
        relation: impl Into<Id>,
        target: ElementId,
    ) -> Result<bool, ModelError> {
        self.related(id, relation)
            .map(|related| related.contains(&target))
    }

    /// Replaces the target of an upper-one `relation`.
    ///
    /// The previous target is detached on both sides first. `None` clears the
    /// relation.
    ///
    /// # Errors
    ///
    /// Fails without touching the model when either element is foreign or
    /// unlinked, the relation is unknown, derived or many-valued, or the
    /// target kind does not conform to the relation.
    pub fn set(
        &mut self,
        id: ElementId,
        relation: impl Into<Id>,
        target: Option<ElementId>,
    ) -> Result<(), ModelError> {
        let definition = self.writable(id, relation.into())?;
        if definition.upper() != Upper::One {
            return Err(ModelError::ManyValued {
                relation: definition.name(),
            });
        }
        if let Some(target) = target {
            self.check_target(definition, target)?;
        }
        self.replace(id, definition, target);
        Ok(())
    }

    /// Adds `target` to `relation`. Adding a present target is a no-op; on an
    /// upper-one relation this behaves like [`set`](Self::set).
    pub fn add(
        &mut self,
        id: ElementId,
        relation: impl Into<Id>,
        target: ElementId,
    ) -> Result<(), ModelError> {
        let definition = self.writable(id, relation.into())?;
        self.check_target(definition, target)?;
        match definition.upper() {
            Upper::One => self.replace(id, definition, Some(target)),
            Upper::Many => {
                if !self.data(id)?.links(definition.key()).contains(&target) {
                    self.connect(id, definition, target);
                }
            }
        }
        Ok(())
    }

    /// Removes `target` from `relation` on both sides. Removing an absent
    /// target is a no-op.
    pub fn remove(
        &mut self,
        id: ElementId,
        relation: impl Into<Id>,
        target: ElementId,
    ) -> Result<(), ModelError> {
        let definition = self.writable(id, relation.into())?;
        if target.model != self.id {
            return Err(ModelError::ForeignElement {
                element: target,
                model: self.id,
            });
        }
        if self.data(id)?.links(definition.key()).contains(&target) {
            self.disconnect(id, definition, target);
        }
        Ok(())
    }

    fn writable(
        &self,
        id: ElementId,
        relation: Id,
    ) -> Result<&'static RelationDefinition, ModelError> {
        let definition = self.relation_definition(id, relation)?;
        if definition.is_derived() {
            return Err(ModelError::DerivedRelation { relation });
        }
        Ok(definition)
    }

    fn check_target(
        &self,
        definition: &RelationDefinition,
        target: ElementId,
    ) -> Result<(), ModelError> {
        let found = self.kind(target)?;
        if !self.metamodel.is_a(found, definition.target()) {
            return Err(ModelError::IncompatibleTarget {
                relation: definition.name(),
                expected: definition.target(),
                found,
            });
        }
        Ok(())
    }

    fn replace(
        &mut self,
        id: ElementId,
        definition: &'static RelationDefinition,
        target: Option<ElementId>,
    ) {
        let current = self
            .data(id)
            .ok()
            .and_then(|data| data.links(definition.key()).first().copied());
        if current == target {
            return;
        }
        if let Some(current) = current {
            self.disconnect(id, definition, current);
        }
        if let Some(target) = target {
            self.connect(id, definition, target);
        }
    }

    /// Links `source` to `target` and mirrors the link through the opposite.
    /// An upper-one opposite first releases its previous occupant.
    fn connect(
        &mut self,
        source: ElementId,
        definition: &'static RelationDefinition,
        target: ElementId,
    ) {
        self.insert_link(source, definition, target);
        let Some(opposite_key) = definition.opposite() else {
            return;
        };
        let metamodel: &'static Metamodel = self.metamodel;
        let opposite = metamodel.relation_at(opposite_key);
        if opposite.upper() == Upper::One {
            let previous = self
                .data(target)
                .ok()
                .and_then(|data| data.links(opposite_key).first().copied());
            match previous {
                Some(previous) if previous == source => return,
                Some(previous) => self.disconnect(target, opposite, previous),
                None => {}
            }
        }
        self.insert_link(target, opposite, source);
    }

    fn disconnect(
        &mut self,
        source: ElementId,
        definition: &'static RelationDefinition,
        target: ElementId,
    ) {
        self.remove_link(source, definition, target);
        if let Some(opposite_key) = definition.opposite() {
            let metamodel: &'static Metamodel = self.metamodel;
            self.remove_link(target, metamodel.relation_at(opposite_key), source);
        }
    }

    fn insert_link(
        &mut self,
        element: ElementId,
        definition: &RelationDefinition,
        target: ElementId,
    ) {
        let Ok(data) = self.data_mut(element) else {
            return;
        };
        let links = data.links.entry(definition.key()).or_default();
        if links.contains(&target) {
            return;
        }
        links.push(target);
        trace!(
            element:% = element,
            relation:% = definition.name(),
            target:% = target;
            "Link added"
        );
        self.emit(ModelEvent::AssociationAdded {
            element,
            relation: definition.name(),
            target,
        });
    }

    fn remove_link(
        &mut self,
        element: ElementId,
        definition: &RelationDefinition,
        target: ElementId,
    ) {
        let Ok(data) = self.data_mut(element) else {
            return;
        };
        let Some(links) = data.links.get_mut(&definition.key()) else {
            return;
        };
        let Some(position) = links.iter().position(|linked| *linked == target) else {
            return;
        };
        links.remove(position);
        trace!(
            element:% = element,
            relation:% = definition.name(),
            target:% = target;
            "Link removed"
        );
        self.emit(ModelEvent::AssociationDeleted {
            element,
            relation: definition.name(),
            target,
        });
    }

    /// Reads an attribute, falling back to its declared default.
    pub fn attribute(
        &self,
        id: ElementId,
        name: impl Into<Id>,
    ) -> Result<Option<AttributeValue>, ModelError> {
        let name = name.into();
        let data = self.data(id)?;
        let definition =
            self.metamodel
                .attribute(data.kind, name)
                .ok_or(ModelError::UnknownAttribute {
                    kind: data.kind,
                    attribute: name,
                })?;
        Ok(data
            .attributes
            .get(&name)
            .or(definition.default())
            .cloned())
    }

    /// Sets or clears an attribute after checking the value against the
    /// declared type.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: impl Into<Id>,
        value: Option<AttributeValue>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        let kind = self.kind(id)?;
        let definition =
            self.metamodel
                .attribute(kind, name)
                .ok_or(ModelError::UnknownAttribute {
                    kind,
                    attribute: name,
                })?;
        if let Some(value) = value.as_ref().filter(|value| !definition.ty().accepts(value)) {
            return Err(ModelError::AttributeType {
                attribute: name,
                expected: definition.ty().clone(),
                value: value.clone(),
            });
        }

        let data = self.data_mut(id)?;
        let old = match &value {
            Some(value) => data.attributes.insert(name, value.clone()),
            None => data.attributes.shift_remove(&name),
        };
        if old != value {
            trace!(element:% = id, attribute:% = name; "Attribute updated");
            self.emit(ModelEvent::AttributeUpdated {
                element: id,
                attribute: name,
                old,
                new: value,
            });
        }
        Ok(())
    }

    /// The `name` of a named element; `None` for unnamed or unnamable ones.
    pub fn name(&self, id: ElementId) -> Option<String> {
        self.attribute(id, uml::attributes::NAME)
            .ok()
            .flatten()
            .and_then(|value| value.as_str().map(str::to_string))
    }

    pub fn set_name(&mut self, id: ElementId, name: &str) -> Result<(), ModelError> {
        self.set_attribute(id, uml::attributes::NAME, Some(name.into()))
    }

    /// Removes an element from the model.
    ///
    /// Every link of the element is severed on both sides, references held
    /// by relations without an opposite are cleared, and elements owned
    /// through composite relations are unlinked as well. Unlinking a dead
    /// element is a no-op.
    pub fn unlink(&mut self, id: ElementId) -> Result<(), ModelError> {
        match self.data(id) {
            Ok(_) => {}
            Err(ModelError::Unlinked(_)) => return Ok(()),
            Err(err) => return Err(err),
        }

        let metamodel: &'static Metamodel = self.metamodel;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Ok(data) = self.data(current) else {
                continue;
            };
            let links: Vec<(RelationKey, Vec<ElementId>)> = data
                .links
                .iter()
                .map(|(key, targets)| (*key, targets.clone()))
                .collect();

            for (key, targets) in links {
                let definition = metamodel.relation_at(key);
                for target in targets {
                    self.disconnect(current, definition, target);
                    if definition.is_composite() {
                        pending.push(target);
                    }
                }
            }

            self.clear_references_to(current);

            let Some(data) = self
                .elements
                .get_mut(current.index as usize)
                .and_then(Option::take)
            else {
                continue;
            };
            self.live -= 1;
            trace!(element:% = current, kind:% = data.kind; "Element unlinked");
            self.emit(ModelEvent::ElementDeleted {
                element: current,
                kind: data.kind,
            });
        }
        Ok(())
    }

    /// Drops one-sided references to `element` held by other elements.
    fn clear_references_to(&mut self, element: ElementId) {
        let metamodel: &'static Metamodel = self.metamodel;
        let holders: Vec<(ElementId, RelationKey)> = self
            .elements()
            .filter(|holder| *holder != element)
            .flat_map(|holder| {
                self.data(holder)
                    .into_iter()
                    .flat_map(|data| data.links.iter())
                    .filter(|(_, targets)| targets.contains(&element))
                    .map(move |(key, _)| (holder, *key))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (holder, key) in holders {
            self.remove_link(holder, metamodel.relation_at(key), element);
        }
    }

    /// Registers `handler` for every subsequent [`ModelEvent`].
    pub fn subscribe(&mut self, handler: impl FnMut(&ModelEvent) + 'static) -> SubscriptionId {
        self.subscribers.push(Some(Box::new(handler)));
        SubscriptionId(self.subscribers.len() - 1)
    }

    /// Drops a handler. Returns whether it was still registered.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.subscribers
            .get_mut(subscription.0)
            .and_then(Option::take)
            .is_some()
    }

    fn emit(&mut self, event: ModelEvent) {
        for handler in self.subscribers.iter_mut().flatten() {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, sync::OnceLock};

    use super::*;
    use crate::uml::{attributes as attr, kinds, relations as rel};

    fn metamodel() -> &'static Metamodel {
        static METAMODEL: OnceLock<Metamodel> = OnceLock::new();
        METAMODEL.get_or_init(|| {
            crate::uml::builder()
                .build()
                .expect("UML declarations are consistent")
        })
    }

    fn model() -> Model {
        Model::new(metamodel())
    }

    #[test]
    fn test_create_rejects_unknown_and_abstract_kinds() {
        let mut model = model();

        assert_eq!(
            model.create("Gadget"),
            Err(ModelError::UnknownKind(Kind::new("Gadget")))
        );
        assert_eq!(
            model.create(kinds::CLASSIFIER),
            Err(ModelError::AbstractKind(Kind::new(kinds::CLASSIFIER)))
        );
        assert!(model.is_empty());
    }

    #[test]
    fn test_set_mirrors_opposite() {
        let mut model = model();
        let class = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();

        model.set(property, rel::CLASS, Some(class)).unwrap();

        assert_eq!(model.related(class, rel::OWNED_ATTRIBUTE).unwrap(), vec![property]);
        assert_eq!(model.get(property, rel::CLASS).unwrap(), Some(class));
    }

    #[test]
    fn test_set_replaces_previous_target() {
        let mut model = model();
        let first = model.create(kinds::CLASS).unwrap();
        let second = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();

        model.set(property, rel::CLASS, Some(first)).unwrap();
        model.set(property, rel::CLASS, Some(second)).unwrap();

        assert!(model.related(first, rel::OWNED_ATTRIBUTE).unwrap().is_empty());
        assert_eq!(model.related(second, rel::OWNED_ATTRIBUTE).unwrap(), vec![property]);

        model.set(property, rel::CLASS, None).unwrap();
        assert!(model.related(second, rel::OWNED_ATTRIBUTE).unwrap().is_empty());
    }

    #[test]
    fn test_add_steals_upper_one_opposite() {
        let mut model = model();
        let first = model.create(kinds::CLASS).unwrap();
        let second = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();

        model.add(first, rel::OWNED_ATTRIBUTE, property).unwrap();
        model.add(second, rel::OWNED_ATTRIBUTE, property).unwrap();

        assert!(model.related(first, rel::OWNED_ATTRIBUTE).unwrap().is_empty());
        assert_eq!(model.get(property, rel::CLASS).unwrap(), Some(second));
    }

    #[test]
    fn test_add_twice_is_a_noop() {
        let mut model = model();
        let association = model.create(kinds::ASSOCIATION).unwrap();
        let end = model.create(kinds::PROPERTY).unwrap();

        model.add(association, rel::MEMBER_END, end).unwrap();
        model.add(association, rel::MEMBER_END, end).unwrap();

        assert_eq!(model.related(association, rel::MEMBER_END).unwrap(), vec![end]);
    }

    #[test]
    fn test_derived_unions() {
        let mut model = model();
        let package = model.create(kinds::PACKAGE).unwrap();
        let class = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();
        let lower = model.create(kinds::LITERAL_INTEGER).unwrap();

        model.add(package, rel::PACKAGED_ELEMENT, class).unwrap();
        model.add(class, rel::OWNED_ATTRIBUTE, property).unwrap();
        model.set(property, rel::LOWER_VALUE, Some(lower)).unwrap();

        assert_eq!(model.get(class, rel::OWNER).unwrap(), Some(package));
        assert_eq!(model.get(class, rel::NAMESPACE).unwrap(), Some(package));
        assert_eq!(model.get(property, rel::OWNER).unwrap(), Some(class));
        assert_eq!(model.get(lower, rel::OWNER).unwrap(), Some(property));
        assert_eq!(model.related(property, rel::OWNED_ELEMENT).unwrap(), vec![lower]);
        assert_eq!(model.related(class, rel::OWNED_MEMBER).unwrap(), vec![property]);
    }

    #[test]
    fn test_derived_union_is_read_only() {
        let mut model = model();
        let package = model.create(kinds::PACKAGE).unwrap();
        let class = model.create(kinds::CLASS).unwrap();

        assert_eq!(
            model.set(class, rel::OWNER, Some(package)),
            Err(ModelError::DerivedRelation {
                relation: Id::new(rel::OWNER)
            })
        );
    }

    #[test]
    fn test_many_valued_set_is_rejected() {
        let mut model = model();
        let association = model.create(kinds::ASSOCIATION).unwrap();
        let end = model.create(kinds::PROPERTY).unwrap();

        assert_eq!(
            model.set(association, rel::MEMBER_END, Some(end)),
            Err(ModelError::ManyValued {
                relation: Id::new(rel::MEMBER_END)
            })
        );
    }

    #[test]
    fn test_incompatible_target_is_rejected() {
        let mut model = model();
        let property = model.create(kinds::PROPERTY).unwrap();
        let dependency = model.create(kinds::DEPENDENCY).unwrap();

        let result = model.set(property, rel::TYPE, Some(dependency));

        assert!(matches!(result, Err(ModelError::IncompatibleTarget { .. })));
        assert_eq!(model.get(property, rel::TYPE).unwrap(), None);
    }

    #[test]
    fn test_foreign_elements_are_rejected() {
        let mut left = model();
        let mut right = model();
        let class = left.create(kinds::CLASS).unwrap();
        let property = right.create(kinds::PROPERTY).unwrap();

        let result = right.set(property, rel::TYPE, Some(class));

        assert_eq!(
            result,
            Err(ModelError::ForeignElement {
                element: class,
                model: right.id(),
            })
        );
        assert!(!right.contains(class));
    }

    #[test]
    fn test_unlink_cascades_over_composites() {
        let mut model = model();
        let class = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();
        let upper = model.create(kinds::LITERAL_UNLIMITED_NATURAL).unwrap();

        model.add(class, rel::OWNED_ATTRIBUTE, property).unwrap();
        model.set(property, rel::UPPER_VALUE, Some(upper)).unwrap();
        model.unlink(class).unwrap();

        assert!(!model.contains(class));
        assert!(!model.contains(property));
        assert!(!model.contains(upper));
        assert!(model.is_empty());
        assert_eq!(model.kind(property), Err(ModelError::Unlinked(property)));
    }

    #[test]
    fn test_unlink_clears_one_sided_references() {
        let mut model = model();
        let class = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();

        model.set(property, rel::TYPE, Some(class)).unwrap();
        model.unlink(class).unwrap();

        assert!(model.contains(property));
        assert_eq!(model.get(property, rel::TYPE).unwrap(), None);
        assert!(model.unlink(class).is_ok());
    }

    #[test]
    fn test_attribute_defaults_and_type_checks() {
        let mut model = model();
        let property = model.create(kinds::PROPERTY).unwrap();

        assert_eq!(
            model.attribute(property, attr::AGGREGATION).unwrap(),
            Some("none".into())
        );
        assert_eq!(model.attribute(property, attr::NAVIGABILITY).unwrap(), None);

        let result = model.set_attribute(property, attr::AGGREGATION, Some("several".into()));
        assert!(matches!(result, Err(ModelError::AttributeType { .. })));

        model
            .set_attribute(property, attr::AGGREGATION, Some("composite".into()))
            .unwrap();
        assert_eq!(
            model.attribute(property, attr::AGGREGATION).unwrap(),
            Some("composite".into())
        );

        assert!(matches!(
            model.attribute(property, "color"),
            Err(ModelError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_names() {
        let mut model = model();
        let class = model.create(kinds::CLASS).unwrap();
        let slot = model.create(kinds::SLOT).unwrap();

        assert_eq!(model.name(class), None);
        model.set_name(class, "Order").unwrap();
        assert_eq!(model.name(class).as_deref(), Some("Order"));
        assert_eq!(model.name(slot), None);
    }

    #[test]
    fn test_select_skips_unlinked_elements() {
        let mut model = model();
        let class = model.create(kinds::CLASS).unwrap();
        let component = model.create(kinds::COMPONENT).unwrap();
        let interface = model.create(kinds::INTERFACE).unwrap();
        model.unlink(class).unwrap();

        let classes: Vec<ElementId> = model.elements_of(kinds::CLASS).collect();
        assert_eq!(classes, vec![component]);

        let classifiers: Vec<ElementId> = model.elements_of(kinds::CLASSIFIER).collect();
        assert_eq!(classifiers, vec![component, interface]);
    }

    #[test]
    fn test_subscribers_observe_changes() {
        let mut model = model();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = model.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let class = model.create(kinds::CLASS).unwrap();
        let property = model.create(kinds::PROPERTY).unwrap();
        model.set(property, rel::CLASS, Some(class)).unwrap();

        {
            let events = events.borrow();
            assert_eq!(
                events[0],
                ModelEvent::ElementCreated {
                    element: class,
                    kind: Kind::new(kinds::CLASS)
                }
            );
            assert!(events.contains(&ModelEvent::AssociationAdded {
                element: class,
                relation: Id::new(rel::OWNED_ATTRIBUTE),
                target: property,
            }));
            assert!(events.contains(&ModelEvent::AssociationAdded {
                element: property,
                relation: Id::new(rel::CLASS),
                target: class,
            }));
        }

        assert!(model.unsubscribe(subscription));
        let before = events.borrow().len();
        model.create(kinds::CLASS).unwrap();
        assert_eq!(events.borrow().len(), before);
    }
}
