//! Ways a stored product ledger can fail verification.

use crate::core::{ProductId, Sequence, Status};
use thiserror::Error;

/// A single inconsistency found while auditing a product's ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditViolation {
    #[error("Product {product_id} does not exist")]
    MissingProduct { product_id: ProductId },

    #[error("Product {product_id} has no history entries recorded")]
    EmptyHistory { product_id: ProductId },

    #[error("History entry {sequence} is missing")]
    MissingEntry { sequence: Sequence },

    #[error("History entry stored at {sequence} claims sequence {recorded}")]
    SequenceMismatch { sequence: Sequence, recorded: Sequence },

    #[error("History entry {sequence} exists beyond the sequence count")]
    UntrackedEntry { sequence: Sequence },

    #[error("First history entry is not a registration entry")]
    InvalidRegistrationEntry,

    #[error("History entry {sequence} moves from {from} to {to}, which is not allowed")]
    IllegalTransition {
        sequence: Sequence,
        from: Status,
        to: Status,
    },

    #[error("History entry {sequence} was written by a party other than the owner")]
    ForeignActor { sequence: Sequence },

    #[error("History entry {sequence} is timestamped before its predecessor")]
    TimestampRegression { sequence: Sequence },

    #[error("Product status is {current} but the latest history entry records {recorded}")]
    StatusMismatch { recorded: Status, current: Status },

    #[error("Product timestamps disagree with its history")]
    TimestampMismatch,
}
