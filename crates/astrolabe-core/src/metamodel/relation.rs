//! Relation (association end) declarations.
//!
//! A relation is one navigable end of a metamodel association: it lives on an
//! owner kind, points at a target kind and may name an opposite relation on
//! the target side. Opposites are kept in sync by the model's link
//! primitives, never by callers.

use crate::{identifier::Id, metamodel::Kind};

/// Index of a relation inside its metamodel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey(pub(super) usize);

/// Multiplicity upper bound of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upper {
    One,
    Many,
}

/// Declaration of a relation, as handed to the
/// [`MetamodelBuilder`](crate::metamodel::MetamodelBuilder).
///
/// # Examples
///
/// ```
/// use astrolabe_core::metamodel::RelationSpec;
///
/// let member_end = RelationSpec::many("memberEnd", "Property").opposite("association");
/// let owned_end = RelationSpec::many("ownedEnd", "Property")
///     .composite()
///     .opposite("owningAssociation");
/// ```
#[derive(Debug, Clone)]
pub struct RelationSpec {
    pub(super) name: Id,
    pub(super) target: Kind,
    pub(super) upper: Upper,
    pub(super) composite: bool,
    pub(super) opposite: Option<Id>,
    pub(super) derived: bool,
}

impl RelationSpec {
    fn new(name: &str, target: impl Into<Kind>, upper: Upper) -> Self {
        Self {
            name: Id::new(name),
            target: target.into(),
            upper,
            composite: false,
            opposite: None,
            derived: false,
        }
    }

    /// A relation holding at most one element.
    pub fn one(name: &str, target: impl Into<Kind>) -> Self {
        Self::new(name, target, Upper::One)
    }

    /// A relation holding an ordered collection of elements.
    pub fn many(name: &str, target: impl Into<Kind>) -> Self {
        Self::new(name, target, Upper::Many)
    }

    /// Linked elements are owned: unlinking the owner unlinks them too.
    pub fn composite(mut self) -> Self {
        self.composite = true;
        self
    }

    /// Names the relation on the target kind that mirrors this one.
    pub fn opposite(mut self, name: &str) -> Self {
        self.opposite = Some(Id::new(name));
        self
    }

    /// A read-only union of the relations registered as its subsets.
    pub fn derived_union(mut self) -> Self {
        self.derived = true;
        self
    }
}

/// A relation resolved by [`Metamodel`](crate::metamodel::Metamodel).
#[derive(Debug, Clone)]
pub struct RelationDefinition {
    pub(super) key: RelationKey,
    pub(super) owner: Kind,
    pub(super) name: Id,
    pub(super) target: Kind,
    pub(super) upper: Upper,
    pub(super) composite: bool,
    pub(super) opposite: Option<RelationKey>,
    pub(super) derived: bool,
    pub(super) subsets: Vec<RelationKey>,
}

impl RelationDefinition {
    pub fn key(&self) -> RelationKey {
        self.key
    }

    /// The kind declaring the relation.
    pub fn owner(&self) -> Kind {
        self.owner
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn target(&self) -> Kind {
        self.target
    }

    pub fn upper(&self) -> Upper {
        self.upper
    }

    pub fn is_composite(&self) -> bool {
        self.composite
    }

    pub fn opposite(&self) -> Option<RelationKey> {
        self.opposite
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Relations whose links make up this derived union.
    pub fn subsets(&self) -> &[RelationKey] {
        &self.subsets
    }
}
