//! Identifiers and sampled-time types used throughout the runtime.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Correlates a `SupervisionRequest` with its eventual `SupervisionResponse`.
///
/// UUID v4, rendered in the canonical 8-4-4-4-12 layout. Uniqueness only
/// needs to hold for the lifetime of the pending [`Deferred`](crate::deferred::Deferred)
/// registered against it — see `ExecutorPool::insert_deferred_supervision_request`.
///
/// # Example
/// ```rust
/// use nexus_rt::util::SupervisionId;
///
/// let a = SupervisionId::new();
/// let b = SupervisionId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupervisionId(Uuid);

impl SupervisionId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SupervisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SupervisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock sample returned from `ExecutorContext::tick`, and from a
/// no-op resume step when an Executor finds nothing pending.
///
/// Kept distinct from a bare `DateTime<Utc>` so call sites document intent:
/// a `Tick` means "I sampled the clock because I had nothing else to do",
/// not "this event happened at this instant".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick(pub DateTime<Utc>);

impl Tick {
    pub fn now(wallclock: DateTime<Utc>) -> Self {
        Self(wallclock)
    }

    pub fn wallclock(&self) -> DateTime<Utc> {
        self.0
    }
}
