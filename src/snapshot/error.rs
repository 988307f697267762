//! Snapshot error types.

use crate::audit::AuditViolation;
use crate::core::ProductId;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or restoring a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The allocator position would hand out an id below the first product id
    #[error("Next product id {next} is below the first product id")]
    InvalidAllocatorPosition { next: ProductId },

    /// A product id is at or beyond the snapshot's next allocatable id
    #[error("Product {product_id} is outside the allocated id range")]
    UnallocatedProduct { product_id: ProductId },

    /// The same product appears more than once
    #[error("Product {product_id} appears more than once")]
    DuplicateProduct { product_id: ProductId },

    /// A restored product ledger failed its audit
    #[error("Product {product_id} failed audit: {violations:?}")]
    AuditFailed {
        product_id: ProductId,
        violations: Vec<AuditViolation>,
    },
}
