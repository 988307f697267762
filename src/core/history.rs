//! Append-only product history.
//!
//! Each accepted mutation of a product writes one [`HistoryEntry`] keyed by
//! `(product id, sequence)`. Sequences start at 1 with the registration entry
//! and grow by exactly one per accepted status update.

use super::product::{PartyId, ProductId};
use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Position of an entry in a product's history.
pub type Sequence = u64;

/// Sequence number of the registration entry.
pub const FIRST_SEQUENCE: Sequence = 1;

/// Note recorded on every registration entry.
pub const REGISTRATION_NOTE: &str = "Product created";

/// Record of a single accepted mutation.
///
/// Entries are immutable once written.
///
/// # Example
///
/// ```rust
/// use product_ledger::core::{HistoryEntry, PartyId, Status, REGISTRATION_NOTE};
/// use chrono::Utc;
///
/// let entry = HistoryEntry::registration(PartyId::new("acme"), Utc::now());
/// assert_eq!(entry.sequence, 1);
/// assert_eq!(entry.status, Status::Created);
/// assert_eq!(entry.note, REGISTRATION_NOTE);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the product's history, starting at 1
    pub sequence: Sequence,
    /// Status the product entered with this mutation
    pub status: Status,
    /// When the mutation was committed
    pub timestamp: DateTime<Utc>,
    /// Party that performed the mutation
    pub actor: PartyId,
    /// Free-text note supplied with the mutation
    pub note: String,
}

impl HistoryEntry {
    /// The entry written when a product is registered.
    pub fn registration(actor: PartyId, timestamp: DateTime<Utc>) -> Self {
        Self {
            sequence: FIRST_SEQUENCE,
            status: Status::Created,
            timestamp,
            actor,
            note: REGISTRATION_NOTE.to_string(),
        }
    }
}

/// Ordered view over a product's history entries.
///
/// `record` returns a new history rather than mutating in place.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProductHistory {
    product_id: ProductId,
    entries: Vec<HistoryEntry>,
}

impl ProductHistory {
    /// Create an empty history for a product.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            entries: Vec::new(),
        }
    }

    /// Record an entry, returning a new history.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self {
            product_id: self.product_id,
            entries,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// All entries in sequence order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Statuses in the order the product entered them.
    ///
    /// ```rust
    /// use product_ledger::core::{HistoryEntry, PartyId, ProductHistory, ProductId, Status};
    /// use chrono::Utc;
    ///
    /// let owner = PartyId::new("acme");
    /// let history = ProductHistory::new(ProductId::FIRST)
    ///     .record(HistoryEntry::registration(owner.clone(), Utc::now()))
    ///     .record(HistoryEntry {
    ///         sequence: 2,
    ///         status: Status::InProduction,
    ///         timestamp: Utc::now(),
    ///         actor: owner,
    ///         note: "line 4".to_string(),
    ///     });
    ///
    /// assert_eq!(history.path(), vec![Status::Created, Status::InProduction]);
    /// ```
    pub fn path(&self) -> Vec<Status> {
        self.entries.iter().map(|entry| entry.status).collect()
    }

    /// Time elapsed between the first and last entry.
    ///
    /// Returns `None` for an empty history or if timestamps run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
