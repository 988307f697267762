//! Product lifecycle statuses.
//!
//! A product is always in exactly one of six statuses. Statuses have a stable
//! one-byte wire code so callers can submit raw values; out-of-range codes are
//! representable as a [`StatusCode`] but never as a [`Status`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name returned for codes outside the status set.
pub const UNKNOWN_STATUS_NAME: &str = "Unknown";

/// Lifecycle stage of a physical product.
///
/// # Example
///
/// ```rust
/// use product_ledger::core::Status;
///
/// assert_eq!(Status::QualityCheck.name(), "Quality Check");
/// assert_eq!(Status::from_code(3), Some(Status::Shipped));
/// assert_eq!(Status::from_code(6), None);
/// assert!(Status::Recalled.is_terminal());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Created,
    InProduction,
    QualityCheck,
    Shipped,
    Delivered,
    Recalled,
}

impl Status {
    /// Every status, ordered by wire code.
    pub const ALL: [Status; 6] = [
        Status::Created,
        Status::InProduction,
        Status::QualityCheck,
        Status::Shipped,
        Status::Delivered,
        Status::Recalled,
    ];

    /// Wire code of this status.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code, `None` if it names no status.
    pub fn from_code(code: u8) -> Option<Status> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::InProduction => "In Production",
            Self::QualityCheck => "Quality Check",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Recalled => "Recalled",
        }
    }

    /// Whether no further transitions are possible from this status.
    pub fn is_terminal(self) -> bool {
        super::transitions::successors(self).is_empty()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw, unvalidated status value as submitted by a caller.
///
/// Both typed statuses and bare bytes convert into a `StatusCode`, which lets
/// the ledger report `InvalidStatus` for codes outside the status set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u8);

impl StatusCode {
    /// The status this code names, if any.
    pub fn status(self) -> Option<Status> {
        Status::from_code(self.0)
    }
}

impl From<Status> for StatusCode {
    fn from(status: Status) -> Self {
        StatusCode(status.code())
    }
}

impl From<u8> for StatusCode {
    fn from(code: u8) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Membership check performed before any transition validation.
pub fn is_valid_status(code: impl Into<StatusCode>) -> bool {
    code.into().status().is_some()
}

/// Display name for a status value, `"Unknown"` for out-of-range codes.
///
/// # Example
///
/// ```rust
/// use product_ledger::core::{status_display_name, Status};
///
/// assert_eq!(status_display_name(Status::InProduction), "In Production");
/// assert_eq!(status_display_name(42u8), "Unknown");
/// ```
pub fn status_display_name(code: impl Into<StatusCode>) -> &'static str {
    code.into()
        .status()
        .map(Status::name)
        .unwrap_or(UNKNOWN_STATUS_NAME)
}
