//! Storage collaborator for the ledger.
//!
//! The ledger owns no data itself. It reads through [`LedgerStore`] and
//! stages every write of one call into a [`WriteBatch`], which the store
//! applies as a single indivisible unit.

use crate::core::{HistoryEntry, Product, ProductId, Sequence};
use std::collections::BTreeMap;

/// One staged write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    PutProduct(Product),
    AppendHistory {
        product_id: ProductId,
        entry: HistoryEntry,
    },
    PutSequenceCount {
        product_id: ProductId,
        count: Sequence,
    },
    PutNextProductId(ProductId),
}

/// Writes staged by a single ledger call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_product(&mut self, product: Product) {
        self.ops.push(WriteOp::PutProduct(product));
    }

    pub fn append_history(&mut self, product_id: ProductId, entry: HistoryEntry) {
        self.ops.push(WriteOp::AppendHistory { product_id, entry });
    }

    pub fn put_sequence_count(&mut self, product_id: ProductId, count: Sequence) {
        self.ops.push(WriteOp::PutSequenceCount { product_id, count });
    }

    pub fn put_next_product_id(&mut self, next: ProductId) {
        self.ops.push(WriteOp::PutNextProductId(next));
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Ordered key-value storage backing the ledger.
///
/// Implementations must apply a committed batch atomically: either every
/// write is visible afterwards or none is, and no other commit interleaves
/// with it. History entries are never replaced once written.
pub trait LedgerStore {
    /// Product record by id.
    fn product(&self, id: ProductId) -> Option<Product>;

    /// History entry by `(id, sequence)`.
    fn history_entry(&self, id: ProductId, sequence: Sequence) -> Option<HistoryEntry>;

    /// Lowest sequence above `after` holding a history entry for the product.
    fn next_history_sequence(&self, id: ProductId, after: Sequence) -> Option<Sequence>;

    /// Number of history entries written for a product.
    fn sequence_count(&self, id: ProductId) -> Option<Sequence>;

    /// The next product id to allocate. [`ProductId::FIRST`] on an empty store.
    fn next_product_id(&self) -> ProductId;

    /// Apply every write in `batch` as one unit.
    fn commit(&mut self, batch: WriteBatch);
}

/// In-memory [`LedgerStore`] over ordered maps.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    pub(crate) products: BTreeMap<ProductId, Product>,
    pub(crate) history: BTreeMap<(ProductId, Sequence), HistoryEntry>,
    pub(crate) counters: BTreeMap<ProductId, Sequence>,
    pub(crate) next_product_id: ProductId,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: BTreeMap::new(),
            history: BTreeMap::new(),
            counters: BTreeMap::new(),
            next_product_id: ProductId::FIRST,
        }
    }

    /// Number of product records held.
    pub fn product_len(&self) -> usize {
        self.products.len()
    }

    /// Number of history entries held across all products.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl LedgerStore for MemoryStore {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }

    fn history_entry(&self, id: ProductId, sequence: Sequence) -> Option<HistoryEntry> {
        self.history.get(&(id, sequence)).cloned()
    }

    fn next_history_sequence(&self, id: ProductId, after: Sequence) -> Option<Sequence> {
        let start = after.checked_add(1)?;
        self.history
            .range((id, start)..=(id, Sequence::MAX))
            .next()
            .map(|((_, sequence), _)| *sequence)
    }

    fn sequence_count(&self, id: ProductId) -> Option<Sequence> {
        self.counters.get(&id).copied()
    }

    fn next_product_id(&self) -> ProductId {
        self.next_product_id
    }

    fn commit(&mut self, batch: WriteBatch) {
        for op in batch.into_ops() {
            match op {
                WriteOp::PutProduct(product) => {
                    self.products.insert(product.id, product);
                }
                WriteOp::AppendHistory { product_id, entry } => {
                    self.history
                        .entry((product_id, entry.sequence))
                        .or_insert(entry);
                }
                WriteOp::PutSequenceCount { product_id, count } => {
                    self.counters.insert(product_id, count);
                }
                WriteOp::PutNextProductId(next) => {
                    self.next_product_id = next;
                }
            }
        }
    }
}
