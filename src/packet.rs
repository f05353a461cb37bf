//! The wire taxonomy that flows between Hosts (§6, §4.6 External Interfaces).
//!
//! Every variant carries opaque `Vec<u8>` payloads — the crate never
//! inspects message or stance bytes, it only routes them. Typed, in-process
//! state stays typed until the moment a [`Host`](crate::host::Host) hands a
//! packet to `HostContext::publish`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::reference::Reference;
use crate::util::ids::SupervisionId;

/// The outcome a parent Executor's supervise strategy hands back to a
/// failed child, carried on a [`Packet::SupervisionResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Let the child resume normal operation (re-enter `Sleeping`).
    Resume,
    /// The child must terminate.
    Stop,
}

/// A point-to-point application message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Reference,
    pub receiver: Reference,
    pub payload: Vec<u8>,
}

/// A child reporting failure up to its parent for a supervision decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisionRequest {
    pub id: SupervisionId,
    pub child: Reference,
    pub reason: Vec<u8>,
}

/// A parent's supervision decision, correlated back to the request by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisionResponse {
    pub id: SupervisionId,
    pub child: Reference,
    pub effect: Effect,
}

/// Instructs the owning Host to instantiate a new Executor.
///
/// `stance` is a pre-serialized state snapshot paired with a behavior
/// identifier the receiving Host resolves against its own registered
/// behavior factories; this crate never deserializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingCreate {
    pub child: Reference,
    pub stance: Vec<u8>,
}

/// Instructs the owning Host to kill an Executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingTerminate {
    pub target: Reference,
    pub reason: Vec<u8>,
}

/// A unit of routable traffic between Hosts.
///
/// Each variant knows its own routing target via [`Packet::target`] —
/// `HostContext::publish` uses this to resolve which Host currently owns
/// the destination path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Packet {
    Message(Message),
    SupervisionRequest(SupervisionRequest),
    SupervisionResponse(SupervisionResponse),
    SchedulingCreate(SchedulingCreate),
    SchedulingTerminate(SchedulingTerminate),
}

impl Packet {
    /// The `Reference` path this packet routes to.
    ///
    /// For `SupervisionRequest` this is the child's *parent*, not the
    /// child itself — the request escalates up one level.
    pub fn target(&self) -> Result<Reference, crate::error::ReferenceError> {
        match self {
            Packet::Message(m) => Ok(m.receiver.clone()),
            Packet::SupervisionRequest(r) => r.child.parent(),
            Packet::SupervisionResponse(r) => Ok(r.child.clone()),
            Packet::SchedulingCreate(c) => Ok(c.child.clone()),
            Packet::SchedulingTerminate(t) => Ok(t.target.clone()),
        }
    }
}
