//! UML model recipes.
//!
//! Functions collected in this module create the richer UML structures
//! (associations, extensions, stereotype applications, slots, literal
//! values) out of the element graph primitives, keeping the UML
//! well-formedness rules intact. They are the sanctioned way for an editor
//! to change a model.
//!
//! # Overview
//!
//! - [`stereotype`] - stereotype application and extension lookup.
//! - [`slot`] - slots of instance specifications.
//! - [`relationship`] - dependencies, associations, connectors, messages.
//! - [`navigability`] - association end navigability.
//! - [`literal`] - literal value specifications for defaults and
//!   multiplicities.
//! - [`owner`] - walking up the ownership tree.
//!
//! Every recipe checks its preconditions before touching the model. Recipes
//! composed of several mutations are not transactional: when a later step
//! fails, the earlier steps stay applied.

pub mod literal;
pub mod navigability;
pub mod owner;
pub mod relationship;
pub mod slot;
pub mod stereotype;

use astrolabe_core::{
    metamodel::Kind,
    model::{ElementId, Model},
};

use crate::error::RecipeError;

/// Fails unless every element in `elements` was created by `model`.
fn ensure_same_model(
    model: &Model,
    what: &'static str,
    elements: &[ElementId],
) -> Result<(), RecipeError> {
    if elements.iter().any(|element| element.model() != model.id()) {
        return Err(RecipeError::DifferentModels { what });
    }
    Ok(())
}

/// Fails unless `element` is a live `expected` (or a specialization).
fn ensure_kind(model: &Model, element: ElementId, expected: &str) -> Result<(), RecipeError> {
    let found = model.kind(element)?;
    let expected = Kind::new(expected);
    if !model.metamodel().is_a(found, expected) {
        return Err(RecipeError::WrongKind { expected, found });
    }
    Ok(())
}
