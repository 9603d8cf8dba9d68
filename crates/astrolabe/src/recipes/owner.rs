//! Walking up the ownership tree.

use astrolabe_core::{
    metamodel::Kind,
    model::{ElementId, Model},
    uml::{kinds, relations as rel},
};

use crate::error::RecipeError;

/// The nearest element of `kind` among `element` and its owners, starting
/// with `element` itself.
pub fn owner_of_kind(
    model: &Model,
    element: Option<ElementId>,
    kind: impl Into<Kind>,
) -> Result<Option<ElementId>, RecipeError> {
    let kind = kind.into();
    let mut current = element;
    while let Some(element) = current {
        if model.is_a(element, kind) {
            return Ok(Some(element));
        }
        current = model.get(element, rel::OWNER)?;
    }
    Ok(None)
}

/// The package `element` lives in, or `element` itself when it is a package.
pub fn owner_package(
    model: &Model,
    element: Option<ElementId>,
) -> Result<Option<ElementId>, RecipeError> {
    owner_of_kind(model, element, kinds::PACKAGE)
}
