//! Transition validation for the product lifecycle.
//!
//! The lifecycle graph is static and finite, so it lives in a constant
//! adjacency table indexed by status code. Validation is a pure lookup.

use super::status::Status;

/// Allowed successors for each status, indexed by [`Status::code`].
///
/// `Recalled` is reachable from every other status and has no successors.
const ADJACENCY: [&[Status]; 6] = [
    // Created
    &[Status::InProduction, Status::Recalled],
    // InProduction
    &[Status::QualityCheck, Status::Recalled],
    // QualityCheck
    &[Status::Shipped, Status::InProduction, Status::Recalled],
    // Shipped
    &[Status::Delivered, Status::Recalled],
    // Delivered
    &[Status::Recalled],
    // Recalled
    &[],
];

/// Statuses reachable in one step from `current`.
pub fn successors(current: Status) -> &'static [Status] {
    ADJACENCY[usize::from(current.code())]
}

/// Whether `current -> target` is an edge of the lifecycle graph.
///
/// Self-transitions are never valid.
///
/// # Example
///
/// ```rust
/// use product_ledger::core::{is_valid_transition, Status};
///
/// assert!(is_valid_transition(Status::Created, Status::InProduction));
/// assert!(is_valid_transition(Status::QualityCheck, Status::InProduction));
/// assert!(!is_valid_transition(Status::Created, Status::Delivered));
/// assert!(!is_valid_transition(Status::Recalled, Status::Created));
/// ```
pub fn is_valid_transition(current: Status, target: Status) -> bool {
    successors(current).contains(&target)
}
