//! Domain error model.

use thiserror::Error;

use crate::violations::Violations;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Message reported against the `sku` field when the SKU is already taken.
pub const DUPLICATE_SKU_MESSAGE: &str = "SKU already exists";

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// uniqueness, unknown variants). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// One or more payload fields failed validation.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// Another product already uses this SKU.
    #[error("duplicate sku: {0}")]
    DuplicateSku(String),

    /// The product type name is not registered.
    #[error("unknown product type: {0}")]
    UnknownVariant(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(violations: Violations) -> Self {
        Self::Validation(violations)
    }

    /// Single-field validation failure.
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.insert(field, msg);
        Self::Validation(violations)
    }

    pub fn duplicate_sku(sku: impl Into<String>) -> Self {
        Self::DuplicateSku(sku.into())
    }

    pub fn unknown_variant(name: impl Into<String>) -> Self {
        Self::UnknownVariant(name.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Field-attributed view of this error, suitable for a `field -> message` response.
    ///
    /// Returns `None` for errors that cannot be pinned to a payload field.
    pub fn violations(&self) -> Option<Violations> {
        match self {
            Self::Validation(v) => Some(v.clone()),
            Self::DuplicateSku(_) => {
                let mut v = Violations::new();
                v.insert("sku", DUPLICATE_SKU_MESSAGE);
                Some(v)
            }
            Self::UnknownVariant(name) => {
                let mut v = Violations::new();
                v.insert("productType", format!("Unknown product type {name:?}"));
                Some(v)
            }
            Self::InvalidId(_) | Self::NotFound => None,
        }
    }
}
