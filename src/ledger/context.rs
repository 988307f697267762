//! Environment values threaded into every mutating call.

use crate::core::PartyId;
use chrono::{DateTime, Utc};

/// Who is calling, and when.
///
/// The ledger never reads a clock or resolves an identity on its own; both
/// come from the execution environment through this context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: PartyId,
    pub now: DateTime<Utc>,
}

impl CallContext {
    pub fn new(caller: impl Into<PartyId>, now: DateTime<Utc>) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }

    /// Context stamped with the current wall-clock time.
    pub fn at_now(caller: impl Into<PartyId>) -> Self {
        Self::new(caller, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_supplied_time() {
        let at = Utc::now() - chrono::Duration::days(3);
        let ctx = CallContext::new("acme", at);

        assert_eq!(ctx.caller, PartyId::new("acme"));
        assert_eq!(ctx.now, at);
    }
}
