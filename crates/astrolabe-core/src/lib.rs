//! Astrolabe Core Types and Definitions
//!
//! This crate provides the foundational types of the Astrolabe model layer.
//! It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Values**: Scalar attribute values and `UnlimitedNatural` ([`value`] module)
//! - **Metamodel**: The registry of element kinds, attributes and relations
//!   ([`metamodel::Metamodel`])
//! - **Model**: The element graph with opposite-synchronized links
//!   ([`model::Model`])
//! - **UML**: The built-in UML kinds ([`uml`] module)

pub mod error;
pub mod identifier;
pub mod metamodel;
pub mod model;
pub mod uml;
pub mod value;

pub use error::{MetamodelError, ModelError};
