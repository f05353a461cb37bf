//! `ExecutorContext`: the async trait an [`Executor`](super::Executor) uses
//! to call back into its owning `Host` (§4.4). `Host` implements this and
//! binds its own methods once at construction, so the Executor sees a flat
//! implementation and is never handed a `Host` reference directly.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::error::HostError;
use crate::packet::{Effect, Message, SupervisionRequest, SupervisionResponse};
use crate::reference::Reference;
use crate::util::ids::Tick;

/// The surface a [`Behavior`](super::Behavior) dispatch, and the Executor's
/// own resume loop, use to reach back into the owning Host.
#[async_trait]
pub trait ExecutorContext: Send + Sync + 'static {
    /// Derive `child = parent.child(name)`, publish `SchedulingCreate`, and
    /// return the new child's `Reference`. Construction happens when the
    /// packet is delivered, possibly to a different Host.
    async fn create_process(
        &self,
        parent: &Reference,
        stance: Vec<u8>,
        name: &str,
    ) -> Result<Reference, HostError>;

    /// Remove `target` from the local pool. Local-only; errors here are
    /// invariant violations, never ordinary failures.
    async fn release_process(&self, target: &Reference) -> Result<(), HostError>;

    /// Publish a `Message` verbatim.
    async fn dispatch_message(&self, message: Message) -> Result<(), HostError>;

    /// Publish a `SupervisionResponse` verbatim.
    async fn dispatch_supervision_response(
        &self,
        response: SupervisionResponse,
    ) -> Result<(), HostError>;

    /// Register a fresh `Deferred` against the child's pool entry, publish
    /// `request`, and await the matching response. The only cross-Host
    /// suspension point in the protocol.
    async fn supervise(&self, request: SupervisionRequest) -> Result<Effect, HostError>;

    /// Publish `SchedulingTerminate(target, reason)`.
    async fn terminate_process(&self, target: &Reference, reason: Vec<u8>) -> Result<(), HostError>;

    /// Sample the wall clock.
    async fn tick(&self) -> Tick;
}
