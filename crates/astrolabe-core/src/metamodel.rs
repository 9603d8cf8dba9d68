//! The metamodel registry.
//!
//! A [`Metamodel`] describes which element kinds exist, how they generalize
//! each other, which scalar attributes they carry and which relations link
//! them. It is assembled once with a [`MetamodelBuilder`] and is immutable
//! afterwards; every [`Model`](crate::model::Model) borrows one for its whole
//! lifetime.
//!
//! # Overview
//!
//! - [`Kind`] / [`KindDefinition`] - registered element kinds and their
//!   ancestor closure.
//! - [`RelationSpec`] / [`RelationDefinition`] - relations with resolved
//!   opposites and derived unions.
//! - [`AttributeDefinition`] - typed scalar attributes.
//!
//! Domain profiles extend the registry without touching the base
//! declarations: they add kinds on top of existing ones and register their
//! relations as further subsets of existing derived unions with
//! [`MetamodelBuilder::add_subset`].

mod attribute;
mod builder;
mod kind;
mod relation;

pub use attribute::AttributeDefinition;
pub use builder::MetamodelBuilder;
pub use kind::{Kind, KindDefinition};
pub use relation::{RelationDefinition, RelationKey, RelationSpec, Upper};

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::identifier::Id;

/// An immutable registry of element kinds.
#[derive(Debug)]
pub struct Metamodel {
    kinds: IndexMap<Kind, KindDefinition>,
    relations: Vec<RelationDefinition>,
    short_names: HashMap<Id, Kind>,
}

impl Metamodel {
    /// Starts an empty declaration.
    pub fn builder() -> MetamodelBuilder {
        MetamodelBuilder::new()
    }

    /// Looks a kind up by its full name, falling back to the unqualified
    /// name. When several kinds share an unqualified name, the one
    /// registered first wins.
    pub fn kind(&self, name: &str) -> Option<Kind> {
        let kind = Kind::new(name);
        if self.kinds.contains_key(&kind) {
            return Some(kind);
        }
        self.short_names.get(&Id::new(name)).copied()
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.kinds.contains_key(&kind)
    }

    pub fn definition(&self, kind: Kind) -> Option<&KindDefinition> {
        self.kinds.get(&kind)
    }

    /// All registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindDefinition> {
        self.kinds.values()
    }

    /// Whether `kind` is `base` or one of its specializations.
    pub fn is_a(&self, kind: Kind, base: impl Into<Kind>) -> bool {
        let base = base.into();
        self.kinds
            .get(&kind)
            .is_some_and(|definition| definition.ancestors.contains(&base))
    }

    /// `kind` followed by its ancestors, nearest first. Empty for
    /// unregistered kinds.
    pub fn ancestors(&self, kind: Kind) -> impl Iterator<Item = Kind> + '_ {
        self.kinds
            .get(&kind)
            .into_iter()
            .flat_map(|definition| definition.ancestors())
    }

    /// Finds the relation `name` visible on `kind`, searching the kind first
    /// and then its ancestors.
    pub fn relation(&self, kind: Kind, name: impl Into<Id>) -> Option<&RelationDefinition> {
        let name = name.into();
        self.ancestors(kind).find_map(|ancestor| {
            self.kinds[&ancestor]
                .relations
                .get(&name)
                .map(|key| &self.relations[key.0])
        })
    }

    pub fn relation_by_key(&self, key: RelationKey) -> Option<&RelationDefinition> {
        self.relations.get(key.0)
    }

    /// Every relation visible on `kind`; redeclared names resolve to the
    /// nearest declaration.
    pub fn relations(&self, kind: Kind) -> Vec<&RelationDefinition> {
        let mut seen: IndexMap<Id, &RelationDefinition> = IndexMap::new();
        for ancestor in self.ancestors(kind) {
            for (name, key) in &self.kinds[&ancestor].relations {
                seen.entry(*name).or_insert(&self.relations[key.0]);
            }
        }
        seen.into_values().collect()
    }

    /// Finds the attribute `name` visible on `kind`.
    pub fn attribute(&self, kind: Kind, name: impl Into<Id>) -> Option<&AttributeDefinition> {
        let name = name.into();
        self.ancestors(kind)
            .find_map(|ancestor| self.kinds[&ancestor].attributes.get(&name))
    }

    /// Every attribute visible on `kind`, nearest declaration first.
    pub fn attributes(&self, kind: Kind) -> Vec<&AttributeDefinition> {
        let mut seen: IndexMap<Id, &AttributeDefinition> = IndexMap::new();
        for ancestor in self.ancestors(kind) {
            for (name, attribute) in &self.kinds[&ancestor].attributes {
                seen.entry(*name).or_insert(attribute);
            }
        }
        seen.into_values().collect()
    }

    pub(crate) fn relation_at(&self, key: RelationKey) -> &RelationDefinition {
        &self.relations[key.0]
    }
}
