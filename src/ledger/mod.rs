//! The imperative shell around the pure core.
//!
//! [`Ledger`] applies the lifecycle rules from [`crate::core`] to records held
//! in a [`LedgerStore`]:
//!
//! - **Registration** allocates an id and opens the product's history
//! - **Status updates** validate, then append exactly one history entry
//! - **Accessors** read records without mutating anything
//!
//! Caller identity and time are never ambient; every mutating call takes a
//! [`CallContext`].

mod allocator;
mod context;
mod error;
mod manager;
mod store;

pub use allocator::IdAllocator;
pub use context::CallContext;
pub use error::{LedgerError, LedgerResult};
pub use manager::Ledger;
pub use store::{LedgerStore, MemoryStore, WriteBatch, WriteOp};
