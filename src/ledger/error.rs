//! Ledger error types.

use thiserror::Error;

/// Result type returned by ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors returned by rejected ledger calls.
///
/// Every error is raised before any write is staged, so a rejected call has
/// no side effects and may be retried freely.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Product name must not be empty")]
    EmptyName,

    #[error("Product name is {len} bytes, maximum is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("Product not found")]
    ProductNotFound,

    #[error("Invalid status")]
    InvalidStatus,

    #[error("Invalid status transition")]
    InvalidTransition,

    #[error("Caller is not the product owner")]
    Unauthorized,

    #[error("Note is {len} bytes, maximum is {max}")]
    NoteTooLong { len: usize, max: usize },
}

impl LedgerError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyName => "EmptyName",
            Self::NameTooLong { .. } => "NameTooLong",
            Self::ProductNotFound => "ProductNotFound",
            Self::InvalidStatus => "InvalidStatus",
            Self::InvalidTransition => "InvalidTransition",
            Self::Unauthorized => "Unauthorized",
            Self::NoteTooLong { .. } => "NoteTooLong",
        }
    }
}
