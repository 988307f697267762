//! Tamper-evidence checks over stored ledgers.
//!
//! An audit re-derives every invariant the ledger maintains from what is
//! actually in storage. It uses Stillwater's `Validation` to report every
//! violation in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use product_ledger::audit::verify_product;
//! use product_ledger::core::Status;
//! use product_ledger::ledger::{CallContext, Ledger, MemoryStore};
//!
//! let mut ledger = Ledger::new(MemoryStore::new());
//! let ctx = CallContext::at_now("acme");
//! let id = ledger.register("Crate of bolts", &ctx).unwrap();
//! ledger
//!     .update_status(id, Status::Recalled, "supplier defect", &ctx)
//!     .unwrap();
//!
//! assert!(verify_product(ledger.store(), id).is_success());
//! ```

mod violations;

pub use violations::AuditViolation;

use crate::core::{
    is_valid_transition, HistoryEntry, ProductId, Status, FIRST_SEQUENCE, REGISTRATION_NOTE,
};
use crate::ledger::LedgerStore;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of an audit.
pub type AuditResult = Validation<(), NonEmptyVec<AuditViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> AuditViolation) -> AuditResult {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Verify one product's record, sequence count and history.
pub fn verify_product<S: LedgerStore>(store: &S, id: ProductId) -> AuditResult {
    let Some(product) = store.product(id) else {
        return Validation::fail(AuditViolation::MissingProduct { product_id: id });
    };

    let count = store.sequence_count(id).unwrap_or(0);
    let mut checks: Vec<AuditResult> = Vec::new();

    checks.push(check(count >= FIRST_SEQUENCE, || {
        AuditViolation::EmptyHistory { product_id: id }
    }));

    let mut previous: Option<HistoryEntry> = None;
    for sequence in FIRST_SEQUENCE..=count {
        let Some(entry) = store.history_entry(id, sequence) else {
            checks.push(Validation::fail(AuditViolation::MissingEntry { sequence }));
            previous = None;
            continue;
        };

        checks.push(check(entry.sequence == sequence, || {
            AuditViolation::SequenceMismatch {
                sequence,
                recorded: entry.sequence,
            }
        }));
        checks.push(check(product.is_owned_by(&entry.actor), || {
            AuditViolation::ForeignActor { sequence }
        }));

        if sequence == FIRST_SEQUENCE {
            checks.push(check(
                entry.status == Status::Created
                    && entry.note == REGISTRATION_NOTE
                    && entry.timestamp == product.created_at,
                || AuditViolation::InvalidRegistrationEntry,
            ));
        }

        if let Some(prev) = &previous {
            checks.push(check(is_valid_transition(prev.status, entry.status), || {
                AuditViolation::IllegalTransition {
                    sequence,
                    from: prev.status,
                    to: entry.status,
                }
            }));
            checks.push(check(entry.timestamp >= prev.timestamp, || {
                AuditViolation::TimestampRegression { sequence }
            }));
        }

        if sequence == count {
            checks.push(check(entry.status == product.status, || {
                AuditViolation::StatusMismatch {
                    recorded: entry.status,
                    current: product.status,
                }
            }));
            checks.push(check(entry.timestamp == product.updated_at, || {
                AuditViolation::TimestampMismatch
            }));
        }

        previous = Some(entry);
    }

    if let Some(sequence) = store.next_history_sequence(id, count) {
        checks.push(Validation::fail(AuditViolation::UntrackedEntry { sequence }));
    }

    let result = Validation::all_vec(checks).map(|_| ());
    if let Validation::Failure(violations) = &result {
        tracing::warn!(
            product_id = %id,
            violations = violations.len(),
            "product ledger failed audit"
        );
    }
    result
}

/// Verify every product the store has allocated an id for.
pub fn verify_store<S: LedgerStore>(store: &S) -> AuditResult {
    let checks: Vec<AuditResult> = (ProductId::FIRST.get()..store.next_product_id().get())
        .map(|id| verify_product(store, ProductId(id)))
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
