//! Export and restore of complete ledgers.
//!
//! A snapshot carries every product record, its full history and the id
//! allocator position. Restoring re-audits every product, so a snapshot that
//! was edited in transit is rejected instead of silently loaded.

use crate::audit;
use crate::core::{HistoryEntry, Product, ProductId, Sequence, FIRST_SEQUENCE};
use crate::ledger::{LedgerStore, MemoryStore, WriteBatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// One product and every history entry written for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product: Product,
    pub history: Vec<HistoryEntry>,
}

/// Serializable copy of a whole ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Id the next registration would have received
    pub next_product_id: ProductId,

    /// Every product, in id order
    pub products: Vec<ProductSnapshot>,
}

impl LedgerSnapshot {
    /// Copy every allocated product out of `store`.
    pub fn capture<S: LedgerStore>(store: &S, taken_at: DateTime<Utc>) -> Self {
        let next_product_id = store.next_product_id();
        let products = (ProductId::FIRST.get()..next_product_id.get())
            .map(ProductId)
            .filter_map(|id| {
                let product = store.product(id)?;
                let count = store.sequence_count(id).unwrap_or(0);
                let history = (FIRST_SEQUENCE..=count)
                    .filter_map(|sequence| store.history_entry(id, sequence))
                    .collect();
                Some(ProductSnapshot { product, history })
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            taken_at,
            next_product_id,
            products,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: LedgerSnapshot = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: LedgerSnapshot = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

impl MemoryStore {
    /// Rebuild a store from a snapshot, auditing every product.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;

        let next = snapshot.next_product_id;
        if next < ProductId::FIRST {
            return Err(SnapshotError::InvalidAllocatorPosition { next });
        }
        let mut seen = BTreeSet::new();
        let mut batch = WriteBatch::new();

        for ProductSnapshot { product, history } in snapshot.products {
            let product_id = product.id;
            if product_id < ProductId::FIRST || product_id >= next {
                return Err(SnapshotError::UnallocatedProduct { product_id });
            }
            if !seen.insert(product_id) {
                return Err(SnapshotError::DuplicateProduct { product_id });
            }

            batch.put_sequence_count(product_id, history.len() as Sequence);
            for entry in history {
                batch.append_history(product_id, entry);
            }
            batch.put_product(product);
        }
        batch.put_next_product_id(next);

        let mut store = MemoryStore::new();
        store.commit(batch);

        for id in ProductId::FIRST.get()..next.get() {
            let product_id = ProductId(id);
            if let Validation::Failure(violations) = audit::verify_product(&store, product_id) {
                tracing::warn!(%product_id, "snapshot restore rejected");
                return Err(SnapshotError::AuditFailed {
                    product_id,
                    violations: violations.iter().cloned().collect(),
                });
            }
        }

        tracing::info!(
            snapshot_id = %snapshot.id,
            products = store.product_len(),
            "ledger restored from snapshot"
        );
        Ok(store)
    }
}
