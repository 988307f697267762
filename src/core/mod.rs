//! Pure domain types and rules.
//!
//! This module contains the functional core of the ledger:
//! - Lifecycle statuses and their display names
//! - The transition table and its validator
//! - Product records and history entries
//!
//! Nothing here touches storage.

mod history;
mod product;
mod status;
mod transitions;

pub use history::{
    HistoryEntry, ProductHistory, Sequence, FIRST_SEQUENCE, REGISTRATION_NOTE,
};
pub use product::{PartyId, Product, ProductId};
pub use status::{
    is_valid_status, status_display_name, Status, StatusCode, UNKNOWN_STATUS_NAME,
};
pub use transitions::{is_valid_transition, successors};
