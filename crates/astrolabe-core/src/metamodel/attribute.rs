//! Scalar attribute declarations.

use crate::{
    identifier::Id,
    value::{AttributeType, AttributeValue},
};

/// A typed scalar attribute with an optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    name: Id,
    ty: AttributeType,
    default: Option<AttributeValue>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<Id>, ty: AttributeType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// Sets the value reported while the attribute is unset.
    pub fn with_default(mut self, default: impl Into<AttributeValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn ty(&self) -> &AttributeType {
        &self.ty
    }

    pub fn default(&self) -> Option<&AttributeValue> {
        self.default.as_ref()
    }
}
