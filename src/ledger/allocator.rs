//! Product id allocation.

use super::store::{LedgerStore, WriteBatch};
use crate::core::ProductId;

/// Hands out sequential product ids.
///
/// The allocator keeps no position of its own. Every reservation reads the
/// position persisted in the store and stages the advanced position into the
/// same batch as the registration, so an id is consumed only if that batch
/// commits and every ledger over the store sees the same sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    floor: ProductId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Allocator whose ids never go below [`ProductId::FIRST`].
    pub fn new() -> Self {
        Self {
            floor: ProductId::FIRST,
        }
    }

    /// The id the next reservation against `store` will return.
    pub fn peek<S: LedgerStore>(&self, store: &S) -> ProductId {
        store.next_product_id().max(self.floor)
    }

    /// Reserve the next id, staging the advanced position into `batch`.
    pub fn reserve<S: LedgerStore>(&self, store: &S, batch: &mut WriteBatch) -> ProductId {
        let id = self.peek(store);
        batch.put_next_product_id(id.next());
        id
    }
}
