//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant names the invariant that rejected the operation, so callers can
/// turn it into a specific user-facing message. Failed operations never leave a
/// partially-applied change behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record with this code already exists.
    #[error("duplicate product code: {0}")]
    DuplicateCode(String),

    /// No record matches the given code.
    #[error("product not found: {0}")]
    NotFound(String),

    /// A stock-out would drive the quantity below zero.
    #[error("insufficient quantity for {code} (available: {available}, requested: {requested})")]
    InsufficientQuantity {
        code: String,
        available: u64,
        requested: u64,
    },

    /// The sort criterion is not one of the supported keys.
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    /// A value failed validation (e.g. blank name, negative price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store could not be reached (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode(code.into())
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound(code.into())
    }

    pub fn insufficient_quantity(code: impl Into<String>, available: u64, requested: u64) -> Self {
        Self::InsufficientQuantity {
            code: code.into(),
            available,
            requested,
        }
    }

    pub fn invalid_sort_key(key: impl Into<String>) -> Self {
        Self::InvalidSortKey(key.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Stable, machine-readable kind of this error (for logs and tests).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "duplicate_code",
            Self::NotFound(_) => "not_found",
            Self::InsufficientQuantity { .. } => "insufficient_quantity",
            Self::InvalidSortKey(_) => "invalid_sort_key",
            Self::Validation(_) => "validation",
            Self::Unavailable(_) => "unavailable",
        }
    }
}
