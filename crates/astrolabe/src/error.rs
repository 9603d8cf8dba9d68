//! Error types for Astrolabe operations.
//!
//! [`RecipeError`] is returned by the model recipes; [`AstrolabeError`] wraps
//! every failure a caller of this crate can observe.

use std::io;

use thiserror::Error;

use astrolabe_core::{MetamodelError, ModelError, metamodel::Kind, model::ElementId};

use crate::script::ScriptError;

/// Failures of the model recipes.
///
/// Precondition violations are detected before the model is touched, so a
/// recipe returning one of them leaves the model unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecipeError {
    #[error("{what} are from different models")]
    DifferentModels { what: &'static str },

    #[error("association end {end} has no opposite end")]
    MissingOpposite { end: ElementId },

    #[error("{end} is not a member end of association {association}")]
    NotAMemberEnd {
        association: ElementId,
        end: ElementId,
    },

    #[error("`{value}` is not a valid {ty} literal")]
    InvalidLiteral { ty: &'static str, value: String },

    #[error("expected a `{expected}`, found `{found}`")]
    WrongKind { expected: Kind, found: Kind },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The main error type for Astrolabe operations.
///
/// # Diagnostic Variants
///
/// The `Script` variant keeps the script source next to the error, so its
/// span can be shown in context.
#[derive(Debug, Error)]
pub enum AstrolabeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Script { err: ScriptError, src: String },

    #[error("Metamodel error: {0}")]
    Metamodel(#[from] MetamodelError),

    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AstrolabeError {
    /// Create a new `Script` error with the associated script source.
    pub fn new_script_error(err: ScriptError, src: impl Into<String>) -> Self {
        Self::Script {
            err,
            src: src.into(),
        }
    }
}
