//! Error types for metamodel registration and model mutation.

use thiserror::Error;

use crate::{
    identifier::Id,
    metamodel::Kind,
    model::{ElementId, ModelId},
    value::{AttributeType, AttributeValue},
};

/// Mistakes in a metamodel declaration, reported by
/// [`MetamodelBuilder::build`](crate::metamodel::MetamodelBuilder::build).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetamodelError {
    #[error("kind `{0}` is registered twice")]
    DuplicateKind(Kind),

    #[error("kind `{0}` is not registered")]
    UnknownKind(Kind),

    #[error("kind `{kind}` generalizes unknown kind `{base}`")]
    UnknownBase { kind: Kind, base: Kind },

    #[error("kind `{0}` is its own ancestor")]
    CyclicGeneralization(Kind),

    #[error("relation `{kind}.{relation}` is declared twice")]
    DuplicateRelation { kind: Kind, relation: Id },

    #[error("relation `{kind}.{relation}` targets unknown kind `{target}`")]
    UnknownTarget {
        kind: Kind,
        relation: Id,
        target: Kind,
    },

    #[error("opposite `{opposite}` of `{kind}.{relation}` is not declared on `{target}`")]
    UnresolvedOpposite {
        kind: Kind,
        relation: Id,
        target: Kind,
        opposite: Id,
    },

    #[error("`{kind}.{relation}` and its opposite `{opposite}` do not point back at each other")]
    MismatchedOpposite {
        kind: Kind,
        relation: Id,
        opposite: Id,
    },

    #[error("`{kind}.{relation}` is not a derived union")]
    NotDerived { kind: Kind, relation: Id },

    #[error("`{kind}.{relation}` is not declared")]
    UnknownRelation { kind: Kind, relation: Id },
}

/// Failures of model queries and mutations.
///
/// Every check runs before the model is touched, so an `Err` leaves the
/// element graph unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown element kind `{0}`")]
    UnknownKind(Kind),

    #[error("element kind `{0}` is abstract")]
    AbstractKind(Kind),

    #[error("`{kind}` has no relation `{relation}`")]
    UnknownRelation { kind: Kind, relation: Id },

    #[error("`{kind}` has no attribute `{attribute}`")]
    UnknownAttribute { kind: Kind, attribute: Id },

    #[error("attribute `{attribute}` expects {expected}, got `{value}`")]
    AttributeType {
        attribute: Id,
        expected: AttributeType,
        value: AttributeValue,
    },

    #[error("relation `{relation}` is a derived union and cannot be modified")]
    DerivedRelation { relation: Id },

    #[error("relation `{relation}` holds many elements; add or remove them one by one")]
    ManyValued { relation: Id },

    #[error("relation `{relation}` expects `{expected}`, got `{found}`")]
    IncompatibleTarget {
        relation: Id,
        expected: Kind,
        found: Kind,
    },

    #[error("element {element} does not belong to model {model}")]
    ForeignElement { element: ElementId, model: ModelId },

    #[error("element {0} has been unlinked")]
    Unlinked(ElementId),
}
