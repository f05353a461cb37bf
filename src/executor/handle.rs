//! `ExecutorHandle`: the object-safe boundary the [`ExecutorPool`](crate::pool::ExecutorPool)
//! stores, so one Host can host many different `Executor<B>` instantiations
//! behind a single `Reference`-keyed map.
//!
//! `Executor<B>` stays fully generic internally — this trait only exists at
//! the erasure seam, mirroring `ractor`'s `ActorCell` wrapping a concrete,
//! type-erased actor loop.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::state::ExecutorState;
use crate::error::InvariantError;
use crate::packet::{Message, SupervisionRequest};
use crate::reference::Reference;

/// Object-safe operations the pool needs on any Executor, regardless of its
/// concrete state/behavior type parameters.
#[async_trait]
pub trait ExecutorHandle: Send + Sync + 'static {
    fn self_ref(&self) -> &Reference;

    fn state(&self) -> ExecutorState;

    /// Current depth of the pending-message queue. Used by `Host` to raise
    /// `HostEventKind::QueueBacklog` against `HostConfig::default_queue_capacity`.
    fn queue_depth(&self) -> usize;

    /// Enqueue a message. Asserts `state != End` and `message.receiver == self_ref`.
    async fn push_message(&self, message: Message) -> Result<(), InvariantError>;

    /// Enqueue a supervision request. Asserts `state != End`.
    async fn push_supervision_request(
        &self,
        request: SupervisionRequest,
    ) -> Result<(), InvariantError>;

    /// Schedule a resume step if currently idle. Idempotent across
    /// concurrent callers.
    fn wake(&self);

    /// Set the termination flag and wake.
    fn kill(&self, reason: Vec<u8>);
}
