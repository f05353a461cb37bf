//! `HostContext`: the transport-provided surface a [`Host`](super::Host)
//! consumes (§4.6). Distinct from [`ExecutorContext`](crate::executor::ExecutorContext),
//! which is the surface `Host` itself provides to its Executors.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::error::HostError;
use crate::packet::Packet;
use crate::reference::Reference;

/// What a `Host` needs from the surrounding transport/cluster layer.
///
/// A `Host` never decides whether a `Reference` is local or remote — it
/// asks `HostContext`. `publish` is fire-and-forget: local delivery loops
/// back into `Host::receive`, remote delivery goes over the wire.
#[async_trait]
pub trait HostContext: Send + Sync + 'static {
    /// Sample the wall clock.
    async fn wallclock(&self) -> DateTime<Utc>;

    /// Route and deliver `packet` to whichever Host currently owns its
    /// `Packet::target()`.
    async fn publish(&self, packet: Packet) -> Result<(), HostError>;

    /// Claim a Host identity in the cluster (e.g. register in a directory).
    async fn acquire(&self, reference: &Reference) -> Result<(), HostError>;

    /// Release a previously acquired Host identity.
    async fn release(&self, reference: &Reference) -> Result<(), HostError>;
}
