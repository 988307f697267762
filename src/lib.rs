//! Product Ledger: lifecycle tracking with a tamper-evident audit trail
//!
//! A product moves through six statuses along a fixed transition graph.
//! Every accepted move is appended to an immutable, sequence-numbered history
//! that only the registering party can extend.
//!
//! The crate follows a "pure core, imperative shell" layout:
//!
//! - **core**: statuses, the transition table, product and history records
//! - **ledger**: registration, status updates and read accessors over a store
//! - **audit**: re-verification of stored ledgers, reporting every violation
//! - **snapshot**: versioned export and restore of whole ledgers
//!
//! # Example
//!
//! ```rust
//! use product_ledger::core::Status;
//! use product_ledger::ledger::{CallContext, Ledger, LedgerError, MemoryStore};
//!
//! let mut ledger = Ledger::new(MemoryStore::new());
//! let ctx = CallContext::at_now("acme");
//!
//! let id = ledger.register("Test Product", &ctx).unwrap();
//! for next in [
//!     Status::InProduction,
//!     Status::QualityCheck,
//!     Status::Shipped,
//!     Status::Delivered,
//! ] {
//!     ledger.update_status(id, next, "", &ctx).unwrap();
//! }
//!
//! assert_eq!(ledger.product(id).unwrap().status, Status::Delivered);
//! assert_eq!(ledger.sequence_count(id), 5);
//! assert_eq!(
//!     ledger.update_status(id, Status::Shipped, "", &ctx),
//!     Err(LedgerError::InvalidTransition)
//! );
//! ```

pub mod audit;
pub mod config;
pub mod core;
pub mod ledger;
pub mod snapshot;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{
    is_valid_status, is_valid_transition, status_display_name, HistoryEntry, PartyId, Product,
    ProductId, Status, StatusCode,
};
pub use config::LedgerConfig;
pub use ledger::{CallContext, Ledger, LedgerError, LedgerStore, MemoryStore};
