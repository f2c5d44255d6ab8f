//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record.
//! - Validate identity and display fields before persistence.
//!
//! # Invariants
//! - `serial_code` is unique per record and never reused.
//! - `name` is the sort key of every listing.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Unique identity key of a product.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type SerialCode = String;

/// Canonical catalog record.
///
/// Serialized with camelCase field names to match the remote payload schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identity key. Generated locally for user-added records,
    /// supplied by the payload for imported ones.
    pub serial_code: SerialCode,
    /// Display name; listings order by this field.
    pub name: String,
}

/// Validation failures for [`Product`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptySerialCode,
    EmptyName,
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySerialCode => write!(f, "product serial code must not be empty"),
            Self::EmptyName => write!(f, "product name must not be empty"),
        }
    }
}

impl Error for ProductValidationError {}

impl Product {
    /// Creates a product with a freshly generated serial code.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            serial_code: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Creates a product with a caller-provided serial code.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_serial_code(
        serial_code: impl Into<SerialCode>,
        name: impl Into<String>,
    ) -> Result<Self, ProductValidationError> {
        let product = Self {
            serial_code: serial_code.into(),
            name: name.into(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Checks field invariants. Write paths call this before SQL mutations.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.serial_code.trim().is_empty() {
            return Err(ProductValidationError::EmptySerialCode);
        }
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        Ok(())
    }
}
