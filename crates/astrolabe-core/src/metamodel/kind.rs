//! Element kinds and their registered definitions.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::{identifier::Id, metamodel::RelationKey, metamodel::attribute::AttributeDefinition};

/// Handle of a registered element kind.
///
/// Kinds are identified by their (possibly qualified) name. Built-in UML kinds
/// use plain names such as `"Class"`; profile kinds are usually qualified,
/// e.g. `"C4Model::Container"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Kind(Id);

impl Kind {
    pub fn new(name: &str) -> Self {
        Self(Id::new(name))
    }

    /// The full, possibly qualified, identifier.
    pub fn id(&self) -> Id {
        self.0
    }

    /// The unqualified kind name.
    pub fn name(&self) -> Id {
        self.0.last_segment()
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Id> for Kind {
    fn from(id: Id) -> Self {
        Self(id)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A kind as registered in a [`Metamodel`](crate::metamodel::Metamodel).
#[derive(Debug, Clone)]
pub struct KindDefinition {
    pub(super) kind: Kind,
    pub(super) bases: Vec<Kind>,
    pub(super) is_abstract: bool,
    pub(super) attributes: IndexMap<Id, AttributeDefinition>,
    pub(super) relations: IndexMap<Id, RelationKey>,
    /// The kind itself followed by every ancestor, nearest first.
    pub(super) ancestors: IndexSet<Kind>,
}

impl KindDefinition {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Direct generalizations, in declaration order.
    pub fn bases(&self) -> &[Kind] {
        &self.bases
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Attributes declared on this kind (not inherited ones).
    pub fn own_attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.values()
    }

    /// The kind followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Kind> + '_ {
        self.ancestors.iter().copied()
    }
}
