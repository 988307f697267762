//! The ledger: registration, status updates and read accessors.

use super::allocator::IdAllocator;
use super::context::CallContext;
use super::error::{LedgerError, LedgerResult};
use super::store::{LedgerStore, WriteBatch};
use crate::audit::{self, AuditViolation};
use crate::config::LedgerConfig;
use crate::core::{
    is_valid_transition, HistoryEntry, Product, ProductHistory, ProductId, Sequence, Status,
    StatusCode, FIRST_SEQUENCE,
};
use crate::snapshot::LedgerSnapshot;
use chrono::{DateTime, Utc};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Product lifecycle ledger over a [`LedgerStore`].
///
/// Mutating calls validate everything first, then stage all of their writes
/// into one [`WriteBatch`] and commit it once. A rejected call writes nothing.
///
/// # Example
///
/// ```rust
/// use product_ledger::core::Status;
/// use product_ledger::ledger::{CallContext, Ledger, LedgerError, MemoryStore};
///
/// let mut ledger = Ledger::new(MemoryStore::new());
/// let acme = CallContext::at_now("acme");
///
/// let id = ledger.register("Test Product", &acme).unwrap();
/// ledger
///     .update_status(id, Status::InProduction, "line 4", &acme)
///     .unwrap();
///
/// let rival = CallContext::at_now("rival");
/// assert_eq!(
///     ledger.update_status(id, Status::QualityCheck, "", &rival),
///     Err(LedgerError::Unauthorized)
/// );
/// assert_eq!(ledger.sequence_count(id), 2);
/// ```
pub struct Ledger<S: LedgerStore> {
    store: S,
    allocator: IdAllocator,
    config: LedgerConfig,
}

impl<S: LedgerStore> Ledger<S> {
    /// Open a ledger over `store` with default bounds.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Open a ledger over `store`. Id allocation continues from the
    /// position persisted in the store.
    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            allocator: IdAllocator::new(),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Register a new product owned by the caller.
    ///
    /// Writes the product in `Created`, its registration history entry, a
    /// sequence count of 1 and the advanced id allocator, all in one commit.
    pub fn register(&mut self, name: &str, ctx: &CallContext) -> LedgerResult<ProductId> {
        if let Err(err) = self.check_name(name) {
            tracing::debug!(error = err.kind(), caller = %ctx.caller, "registration rejected");
            return Err(err);
        }

        let mut batch = WriteBatch::new();
        let id = self.allocator.reserve(&self.store, &mut batch);

        batch.put_product(Product {
            id,
            name: name.to_string(),
            owner: ctx.caller.clone(),
            status: Status::Created,
            created_at: ctx.now,
            updated_at: ctx.now,
        });
        batch.append_history(id, HistoryEntry::registration(ctx.caller.clone(), ctx.now));
        batch.put_sequence_count(id, FIRST_SEQUENCE);

        self.store.commit(batch);

        tracing::info!(product_id = %id, owner = %ctx.caller, "product registered");
        Ok(id)
    }

    /// Move a product to `target`, appending a history entry.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// existence, status validity, transition validity, then ownership.
    pub fn update_status(
        &mut self,
        id: ProductId,
        target: impl Into<StatusCode>,
        note: &str,
        ctx: &CallContext,
    ) -> LedgerResult<()> {
        let target = target.into();
        let (mut product, target) = match self.check_update(id, target, note, ctx) {
            Ok(checked) => checked,
            Err(err) => {
                tracing::debug!(
                    product_id = %id,
                    target = %target,
                    caller = %ctx.caller,
                    error = err.kind(),
                    "status update rejected"
                );
                return Err(err);
            }
        };

        let from = product.status;
        let sequence = self.sequence_count(id) + 1;

        product.status = target;
        product.updated_at = ctx.now;

        let mut batch = WriteBatch::new();
        batch.put_product(product);
        batch.append_history(
            id,
            HistoryEntry {
                sequence,
                status: target,
                timestamp: ctx.now,
                actor: ctx.caller.clone(),
                note: note.to_string(),
            },
        );
        batch.put_sequence_count(id, sequence);
        self.store.commit(batch);

        tracing::info!(
            product_id = %id,
            actor = %ctx.caller,
            from = %from,
            to = %target,
            sequence,
            "status updated"
        );
        Ok(())
    }

    fn check_name(&self, name: &str) -> LedgerResult<()> {
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if name.len() > self.config.max_name_len {
            return Err(LedgerError::NameTooLong {
                len: name.len(),
                max: self.config.max_name_len,
            });
        }
        Ok(())
    }

    fn check_update(
        &self,
        id: ProductId,
        target: StatusCode,
        note: &str,
        ctx: &CallContext,
    ) -> LedgerResult<(Product, Status)> {
        let product = self.store.product(id).ok_or(LedgerError::ProductNotFound)?;
        let target = target.status().ok_or(LedgerError::InvalidStatus)?;

        if !is_valid_transition(product.status, target) {
            return Err(LedgerError::InvalidTransition);
        }
        if !product.is_owned_by(&ctx.caller) {
            return Err(LedgerError::Unauthorized);
        }
        if note.len() > self.config.max_note_len {
            return Err(LedgerError::NoteTooLong {
                len: note.len(),
                max: self.config.max_note_len,
            });
        }

        Ok((product, target))
    }

    /// Product record by id.
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.store.product(id)
    }

    /// History entry at `sequence` for a product.
    pub fn history_entry(&self, id: ProductId, sequence: Sequence) -> Option<HistoryEntry> {
        self.store.history_entry(id, sequence)
    }

    /// Number of history entries written for a product, 0 if unknown.
    pub fn sequence_count(&self, id: ProductId) -> Sequence {
        self.store.sequence_count(id).unwrap_or(0)
    }

    /// Whether the product's current status may move to `target`.
    ///
    /// False for unknown products and invalid status codes. Ownership is
    /// not considered.
    pub fn can_transition(&self, id: ProductId, target: impl Into<StatusCode>) -> bool {
        match (self.store.product(id), target.into().status()) {
            (Some(product), Some(target)) => is_valid_transition(product.status, target),
            _ => false,
        }
    }

    /// The id the next registration will receive.
    pub fn next_product_id(&self) -> ProductId {
        self.allocator.peek(&self.store)
    }

    /// Number of products ever registered.
    pub fn product_count(&self) -> u64 {
        self.next_product_id()
            .get()
            .saturating_sub(ProductId::FIRST.get())
    }

    /// Every history entry of a product, in sequence order.
    ///
    /// Stops at the first missing sequence; [`Ledger::audit`] reports gaps.
    pub fn history(&self, id: ProductId) -> Option<ProductHistory> {
        self.store.product(id)?;
        let history = (FIRST_SEQUENCE..=self.sequence_count(id))
            .map_while(|sequence| self.store.history_entry(id, sequence))
            .fold(ProductHistory::new(id), |history, entry| {
                history.record(entry)
            });
        Some(history)
    }

    /// Verify a product's ledger, reporting every violation found.
    pub fn audit(&self, id: ProductId) -> Validation<(), NonEmptyVec<AuditViolation>> {
        audit::verify_product(&self.store, id)
    }

    /// Capture every product and its history.
    pub fn snapshot(&self, taken_at: DateTime<Utc>) -> LedgerSnapshot {
        LedgerSnapshot::capture(&self.store, taken_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PartyId;
    use crate::ledger::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::new(MemoryStore::new())
    }

    fn owner() -> CallContext {
        CallContext::at_now("acme")
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let mut ledger = ledger();
        let ctx = owner();

        assert_eq!(ledger.next_product_id(), ProductId(1));
        assert_eq!(ledger.register("a", &ctx), Ok(ProductId(1)));
        assert_eq!(ledger.register("b", &ctx), Ok(ProductId(2)));
        assert_eq!(ledger.next_product_id(), ProductId(3));
        assert_eq!(ledger.product_count(), 2);
    }

    #[test]
    fn register_writes_product_counter_and_first_entry() {
        let mut ledger = ledger();
        let ctx = owner();
        let id = ledger.register("Widget", &ctx).unwrap();

        let product = ledger.product(id).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.owner, PartyId::new("acme"));
        assert_eq!(product.status, Status::Created);
        assert_eq!(product.created_at, ctx.now);
        assert_eq!(product.updated_at, ctx.now);

        assert_eq!(ledger.sequence_count(id), 1);
        let entry = ledger.history_entry(id, 1).unwrap();
        assert_eq!(entry.status, Status::Created);
        assert_eq!(entry.note, "Product created");
        assert_eq!(entry.actor, ctx.caller);
    }

    #[test]
    fn empty_name_is_rejected_without_writes() {
        let mut ledger = ledger();

        assert_eq!(ledger.register("", &owner()), Err(LedgerError::EmptyName));
        assert_eq!(ledger.next_product_id(), ProductId::FIRST);
        assert!(ledger.product(ProductId::FIRST).is_none());
        assert_eq!(ledger.sequence_count(ProductId::FIRST), 0);
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut ledger = Ledger::with_config(
            MemoryStore::new(),
            LedgerConfig::default().max_name_len(4),
        );

        assert_eq!(
            ledger.register("Widget", &owner()),
            Err(LedgerError::NameTooLong { len: 6, max: 4 })
        );
        assert_eq!(ledger.register("Wdgt", &owner()), Ok(ProductId(1)));
    }

    #[test]
    fn accepted_update_advances_sequence() {
        let mut ledger = ledger();
        let ctx = owner();
        let id = ledger.register("Widget", &ctx).unwrap();

        ledger
            .update_status(id, Status::InProduction, "line 4", &ctx)
            .unwrap();

        assert_eq!(ledger.sequence_count(id), 2);
        let entry = ledger.history_entry(id, 2).unwrap();
        assert_eq!(entry.status, Status::InProduction);
        assert_eq!(entry.note, "line 4");
        assert_eq!(ledger.product(id).unwrap().status, Status::InProduction);
    }

    #[test]
    fn missing_product_is_reported_first() {
        let mut ledger = ledger();

        let result = ledger.update_status(ProductId(999), 77u8, "", &owner());
        assert_eq!(result, Err(LedgerError::ProductNotFound));
    }

    #[test]
    fn invalid_status_precedes_transition_and_ownership() {
        let mut ledger = ledger();
        let id = ledger.register("Widget", &owner()).unwrap();

        let stranger = CallContext::at_now("stranger");
        assert_eq!(
            ledger.update_status(id, 6u8, "", &stranger),
            Err(LedgerError::InvalidStatus)
        );
    }

    #[test]
    fn invalid_transition_precedes_ownership() {
        let mut ledger = ledger();
        let id = ledger.register("Widget", &owner()).unwrap();

        let stranger = CallContext::at_now("stranger");
        assert_eq!(
            ledger.update_status(id, Status::Delivered, "", &stranger),
            Err(LedgerError::InvalidTransition)
        );
        assert_eq!(
            ledger.update_status(id, Status::InProduction, "", &stranger),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn overlong_note_is_checked_after_ownership() {
        let mut ledger = Ledger::with_config(
            MemoryStore::new(),
            LedgerConfig::default().max_note_len(3),
        );
        let id = ledger.register("Widget", &owner()).unwrap();

        let stranger = CallContext::at_now("stranger");
        assert_eq!(
            ledger.update_status(id, Status::InProduction, "too long", &stranger),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            ledger.update_status(id, Status::InProduction, "too long", &owner()),
            Err(LedgerError::NoteTooLong { len: 8, max: 3 })
        );
        assert_eq!(ledger.sequence_count(id), 1);
    }

    #[test]
    fn can_transition_uses_stored_status() {
        let mut ledger = ledger();
        let ctx = owner();
        let id = ledger.register("Widget", &ctx).unwrap();

        assert!(ledger.can_transition(id, Status::InProduction));
        assert!(!ledger.can_transition(id, Status::Shipped));
        assert!(!ledger.can_transition(id, 9u8));
        assert!(!ledger.can_transition(ProductId(2), Status::InProduction));

        ledger
            .update_status(id, Status::InProduction, "", &ctx)
            .unwrap();
        assert!(ledger.can_transition(id, Status::QualityCheck));
        assert!(!ledger.can_transition(id, Status::InProduction));
    }

    #[test]
    fn history_lists_every_entry_in_order() {
        let mut ledger = ledger();
        let ctx = owner();
        let id = ledger.register("Widget", &ctx).unwrap();
        ledger
            .update_status(id, Status::InProduction, "", &ctx)
            .unwrap();
        ledger
            .update_status(id, Status::Recalled, "defect", &ctx)
            .unwrap();

        let history = ledger.history(id).unwrap();
        assert_eq!(
            history.path(),
            vec![Status::Created, Status::InProduction, Status::Recalled]
        );
        assert_eq!(history.latest().map(|e| e.note.as_str()), Some("defect"));
        assert!(ledger.history(ProductId(5)).is_none());
    }

    #[test]
    fn ledger_resumes_allocation_from_store() {
        let mut ledger = ledger();
        ledger.register("a", &owner()).unwrap();
        ledger.register("b", &owner()).unwrap();

        let reopened = Ledger::new(ledger.into_store());
        assert_eq!(reopened.next_product_id(), ProductId(3));
    }

    /// Store handle shared by several ledgers.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl LedgerStore for SharedStore {
        fn product(&self, id: ProductId) -> Option<Product> {
            self.0.borrow().product(id)
        }

        fn history_entry(&self, id: ProductId, sequence: Sequence) -> Option<HistoryEntry> {
            self.0.borrow().history_entry(id, sequence)
        }

        fn next_history_sequence(&self, id: ProductId, after: Sequence) -> Option<Sequence> {
            self.0.borrow().next_history_sequence(id, after)
        }

        fn sequence_count(&self, id: ProductId) -> Option<Sequence> {
            self.0.borrow().sequence_count(id)
        }

        fn next_product_id(&self) -> ProductId {
            self.0.borrow().next_product_id()
        }

        fn commit(&mut self, batch: WriteBatch) {
            self.0.borrow_mut().commit(batch);
        }
    }

    #[test]
    fn ledgers_sharing_a_store_never_reuse_ids() {
        let store = SharedStore::default();
        let mut left = Ledger::new(store.clone());
        let mut right = Ledger::new(store.clone());

        let a = left.register("Left", &CallContext::at_now("A")).unwrap();
        let b = right.register("Right", &CallContext::at_now("B")).unwrap();

        assert_eq!((a, b), (ProductId(1), ProductId(2)));
        assert_eq!(left.next_product_id(), ProductId(3));
        assert_eq!(left.product(a).unwrap().owner, PartyId::new("A"));
        assert_eq!(right.product(b).unwrap().owner, PartyId::new("B"));
        assert!(left.audit(a).is_success());
        assert!(right.audit(b).is_success());
    }

    #[test]
    fn product_count_is_zero_below_first_id() {
        let mut store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put_next_product_id(ProductId(0));
        store.commit(batch);

        let mut ledger = Ledger::new(store);
        assert_eq!(ledger.product_count(), 0);
        assert_eq!(ledger.next_product_id(), ProductId::FIRST);
        assert_eq!(ledger.register("Widget", &owner()), Ok(ProductId::FIRST));
        assert_eq!(ledger.product_count(), 1);
    }

    #[test]
    fn ledger_produced_state_passes_audit() {
        let mut ledger = ledger();
        let ctx = owner();
        let id = ledger.register("Widget", &ctx).unwrap();
        ledger
            .update_status(id, Status::InProduction, "", &ctx)
            .unwrap();

        assert!(ledger.audit(id).is_success());
    }
}
