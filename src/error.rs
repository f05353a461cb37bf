//! Crate-wide error taxonomy.
//!
//! Two families of error live side by side here, deliberately kept distinct
//! (§7 of the design docs): [`InvariantError`] marks a runtime bug — an
//! illegal FSM transition, a double-insert in the pool, a double-resolve on
//! a [`Deferred`](crate::deferred::Deferred) — and is never something a
//! caller should retry around. [`HostError`] is the ordinary, sometimes
//! recoverable error surface returned from [`Host`](crate::host::Host)
//! operations; it wraps `InvariantError` as one of its variants so callers
//! can still match on the distinction.

use thiserror::Error;

use crate::executor::ExecutorState;
use crate::reference::Reference;

/// The module that detected an invariant violation.
///
/// Mirrors the distilled design's `kind` discriminator so a log line or a
/// test assertion can filter by subsystem without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    Fsm,
    Executor,
    Host,
    Pool,
    Deferred,
    Unreachable,
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fsm => "fsm",
            Self::Executor => "executor",
            Self::Host => "host",
            Self::Pool => "pool",
            Self::Deferred => "deferred",
            Self::Unreachable => "unreachable",
        };
        f.write_str(s)
    }
}

/// A violated internal invariant: a runtime bug, not a user error.
///
/// These never travel through the supervision protocol — a behavior's
/// `reason` value is a user error; an `InvariantError` means the runtime
/// itself is in a state it declared could not happen.
#[derive(Error, Debug, Clone)]
#[error("[{kind}] invariant violated: {message}")]
pub struct InvariantError {
    pub kind: InvariantKind,
    pub message: String,
}

impl InvariantError {
    pub fn new(kind: InvariantKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn fsm(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Fsm, message)
    }

    pub fn executor(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Executor, message)
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Host, message)
    }

    pub fn pool(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Pool, message)
    }

    pub fn deferred(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Deferred, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(InvariantKind::Unreachable, message)
    }

    /// A declared transition failed to match the allowed-transition table.
    pub fn illegal_transition(from: ExecutorState, to: ExecutorState) -> Self {
        Self::fsm(format!("illegal transition from {from:?} to {to:?}"))
    }
}

/// Errors surfaced from [`Reference`] construction and derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("reference url must be absolute: {0}")]
    NotAbsolute(String),

    #[error("cannot append empty path segment to reference")]
    EmptySegment,

    #[error("reference has no parent: {0}")]
    NoParent(String),
}

/// Errors returned by a [`Behavior`](crate::executor::Behavior) implementation.
///
/// These are user errors — they travel through the supervision protocol as
/// the `reason` carried by a `SupervisionRequest`, and are never themselves
/// an `InvariantError`.
#[derive(Error, Debug)]
#[error("behavior error: {0}")]
pub struct BehaviorError(pub String);

impl BehaviorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Top-level error type returned by [`Host`](crate::host::Host) operations.
///
/// Structured variants with `is_fatal`/`is_retryable` helpers rather than
/// a single opaque string.
#[derive(Error, Debug)]
pub enum HostError {
    /// A process reference has no locally-registered Executor.
    #[error("process not found: {0}")]
    ProcessNotFound(Reference),

    /// A packet targeted a Reference this Host does not own.
    #[error("reference not owned by this host: {0}")]
    NotOwned(Reference),

    /// An internal invariant was violated; see [`InvariantError`] for detail.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// A reference could not be constructed or derived.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The transport (`HostContext`) failed to acquire/release/publish.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The cross-Host supervision await exceeded `HostConfig::supervision_timeout`.
    #[error("supervision request {0} timed out")]
    SupervisionTimeout(crate::util::ids::SupervisionId),

    /// `SchedulingCreate` would push this Host past `HostConfig::max_processes`.
    #[error("process limit reached: {current} at or above max_processes={max}")]
    ProcessLimitReached { current: usize, max: usize },
}

impl HostError {
    /// Fatal errors indicate the Host cannot continue serving the affected
    /// process and the caller should not retry the same operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HostError::Invariant(_) | HostError::SupervisionTimeout(_)
        )
    }

    /// Retryable errors are transient by nature (e.g. a transport hiccup, or
    /// a process-limit rejection that may clear once another process ends).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HostError::Transport(_) | HostError::ProcessLimitReached { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_error_display_includes_kind_and_message() {
        let err = InvariantError::executor("double push after end");
        let rendered = err.to_string();
        assert!(rendered.contains("executor"));
        assert!(rendered.contains("double push after end"));
    }

    #[test]
    fn illegal_transition_cites_both_states() {
        let err = InvariantError::illegal_transition(ExecutorState::End, ExecutorState::Sleeping);
        assert!(err.message.contains("End"));
        assert!(err.message.contains("Sleeping"));
    }

    #[test]
    fn host_error_fatal_classification() {
        let fatal = HostError::Invariant(InvariantError::host("pool desync"));
        assert!(fatal.is_fatal());
        assert!(!fatal.is_retryable());

        let retryable = HostError::Transport("connection reset".into());
        assert!(!retryable.is_fatal());
        assert!(retryable.is_retryable());
    }

    #[test]
    fn process_limit_reached_is_retryable_not_fatal() {
        let err = HostError::ProcessLimitReached { current: 4, max: 4 };
        assert!(!err.is_fatal());
        assert!(err.is_retryable());
    }
}
