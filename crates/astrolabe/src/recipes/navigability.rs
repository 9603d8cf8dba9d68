//! Association end navigability.
//!
//! The navigability of an end is stored on the end itself, in its
//! `navigability` attribute. Where the end lives is derived from that value
//! and from the type on the opposite side (the owner):
//!
//! | navigability   | collection                                                 |
//! |----------------|------------------------------------------------------------|
//! | navigable      | `owner.ownedAttribute`, or `association.navigableOwnedEnd` |
//! |                | when the owner cannot own attributes                       |
//! | unknown        | `association.ownedEnd`                                     |
//! | non-navigable  | none, the end is only a `memberEnd`                        |
//!
//! [`set_navigability`] records the value and recomputes the collections, so
//! repeating it is harmless. [`reindex_association`] recomputes them after an
//! end's type has changed.

use std::fmt;

use log::debug;
use serde::Deserialize;

use astrolabe_core::{
    model::{ElementId, Model},
    uml::{attributes as attr, kinds, literals, relations as rel},
};

use super::{ensure_kind, ensure_same_model, relationship::opposite_end};
use crate::error::RecipeError;

/// Kinds whose instances hold navigable ends as owned attributes.
const TYPES_WITH_OWNED_ATTRIBUTE: [&str; 5] = [
    kinds::ARTIFACT,
    kinds::CLASS,
    kinds::DATA_TYPE,
    kinds::INTERFACE,
    kinds::STRUCTURED_CLASSIFIER,
];

/// Back references from a property to the classifiers able to own it.
const OWNED_ATTRIBUTE_OWNERS: [&str; 5] = [
    rel::ARTIFACT,
    rel::CLASS,
    rel::DATA_TYPE,
    rel::INTERFACE,
    rel::STRUCTURED_CLASSIFIER,
];

/// Navigability of an association end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Navigability {
    Navigable,
    NonNavigable,
    Unknown,
}

impl Navigability {
    /// The literal stored in the `navigability` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigable => literals::NAVIGABLE,
            Self::NonNavigable => literals::NON_NAVIGABLE,
            Self::Unknown => literals::UNKNOWN,
        }
    }

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            literals::NAVIGABLE => Some(Self::Navigable),
            literals::NON_NAVIGABLE => Some(Self::NonNavigable),
            literals::UNKNOWN => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl From<Option<bool>> for Navigability {
    fn from(navigable: Option<bool>) -> Self {
        match navigable {
            Some(true) => Self::Navigable,
            Some(false) => Self::NonNavigable,
            None => Self::Unknown,
        }
    }
}

impl From<Navigability> for Option<bool> {
    fn from(navigability: Navigability) -> Self {
        match navigability {
            Navigability::Navigable => Some(true),
            Navigability::NonNavigable => Some(false),
            Navigability::Unknown => None,
        }
    }
}

impl fmt::Display for Navigability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `element` is a classifier holding navigable ends as owned
/// attributes.
pub fn has_owned_attribute(model: &Model, element: ElementId) -> bool {
    TYPES_WITH_OWNED_ATTRIBUTE
        .iter()
        .any(|kind| model.is_a(element, *kind))
}

/// Sets the navigability of `end` within `association`.
///
/// # Errors
///
/// - [`RecipeError::DifferentModels`] when the elements come from different
///   models.
/// - [`RecipeError::NotAMemberEnd`] when `end` belongs to another
///   association.
/// - [`RecipeError::MissingOpposite`] when the association has no other end.
///
/// All are detected before the model changes.
pub fn set_navigability(
    model: &mut Model,
    association: ElementId,
    end: ElementId,
    navigability: Navigability,
) -> Result<(), RecipeError> {
    ensure_same_model(model, "Association and end", &[association, end])?;
    ensure_kind(model, association, kinds::ASSOCIATION)?;
    ensure_kind(model, end, kinds::PROPERTY)?;
    if !model.contains_link(association, rel::MEMBER_END, end)? {
        return Err(RecipeError::NotAMemberEnd { association, end });
    }
    if opposite_end(model, end)?.is_none() {
        return Err(RecipeError::MissingOpposite { end });
    }

    model.set_attribute(end, attr::NAVIGABILITY, Some(navigability.as_str().into()))?;
    reindex_end(model, association, end)?;
    debug!(
        association:% = association,
        end:% = end,
        navigability:% = navigability;
        "Navigability set"
    );
    Ok(())
}

/// The navigability of `end`.
///
/// Ends whose navigability was never recorded are classified by the
/// collection currently holding them.
pub fn navigability(model: &Model, end: ElementId) -> Result<Navigability, RecipeError> {
    let recorded = model
        .attribute(end, attr::NAVIGABILITY)?
        .and_then(|value| value.as_str().and_then(Navigability::from_literal));
    if let Some(navigability) = recorded {
        return Ok(navigability);
    }

    let Some(association) = model.get(end, rel::ASSOCIATION)? else {
        return Ok(Navigability::Unknown);
    };
    if model.contains_link(association, rel::OWNED_END, end)? {
        return Ok(Navigability::Unknown);
    }
    let owned_by_classifier = OWNED_ATTRIBUTE_OWNERS
        .iter()
        .map(|relation| model.get(end, *relation))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .any(|owner| owner.is_some());
    if owned_by_classifier || model.contains_link(association, rel::NAVIGABLE_OWNED_END, end)? {
        return Ok(Navigability::Navigable);
    }
    Ok(Navigability::NonNavigable)
}

/// Recomputes where every end of `association` lives, e.g. after the type
/// of one of its ends changed.
pub fn reindex_association(model: &mut Model, association: ElementId) -> Result<(), RecipeError> {
    ensure_kind(model, association, kinds::ASSOCIATION)?;
    for end in model.related(association, rel::MEMBER_END)? {
        if opposite_end(model, end)?.is_some() {
            reindex_end(model, association, end)?;
        }
    }
    Ok(())
}

/// Moves `end` into the collection its navigability calls for.
fn reindex_end(
    model: &mut Model,
    association: ElementId,
    end: ElementId,
) -> Result<(), RecipeError> {
    let navigability = navigability(model, end)?;
    let owner = match opposite_end(model, end)? {
        Some(opposite) => model.get(opposite, rel::TYPE)?,
        None => None,
    };

    for relation in OWNED_ATTRIBUTE_OWNERS {
        if model.get(end, relation)?.is_some() {
            model.set(end, relation, None)?;
        }
    }
    model.remove(association, rel::OWNED_END, end)?;
    model.remove(association, rel::NAVIGABLE_OWNED_END, end)?;

    match navigability {
        Navigability::Navigable => match owner {
            Some(owner) if has_owned_attribute(model, owner) => {
                model.add(owner, rel::OWNED_ATTRIBUTE, end)?;
            }
            _ => model.add(association, rel::NAVIGABLE_OWNED_END, end)?,
        },
        Navigability::Unknown => model.add(association, rel::OWNED_END, end)?,
        Navigability::NonNavigable => {}
    }
    Ok(())
}
