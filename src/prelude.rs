//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! building distributed actor systems with nexus-rt. Import this module to
//! get started quickly:
//!
//! ```rust
//! use nexus_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Identity & Protocol
//! - [`Reference`] - Host/Process identity
//! - [`ReferenceKind`] - Host vs Process discriminant
//! - [`Packet`] - wire taxonomy between Hosts
//! - [`Effect`] - supervision decision (Resume/Stop)
//!
//! ## Executor
//! - [`Executor`] - per-process engine
//! - [`ExecutorState`] - declared lifecycle states
//! - [`Behavior`] - user handler/supervision-strategy contract
//! - [`ExecutorCtx`] - state handed to `Behavior` callbacks
//! - [`ExecutorContext`] - surface `Host` provides to Executors
//! - [`ExecutorHandle`] - object-safe pool handle
//!
//! ## Host
//! - [`Host`] - orchestrator binding transport, pool, and Executors
//! - [`HostConfig`] / [`HostConfigBuilder`] - validated runtime configuration
//! - [`HostContext`] - transport-provided surface a `Host` consumes
//! - [`ExecutorPool`] - Host-local Executor index
//!
//! ## Coordination primitives
//! - [`Fsm`] - generic declared-transition state machine
//! - [`Deferred`] - single-shot cross-Host rendezvous
//!
//! ## Monitoring
//! - [`Monitor`] - core monitoring trait
//! - [`InMemoryMonitor`] - bounded in-memory monitor
//! - [`NoopMonitor`] - zero-overhead no-op monitor
//! - [`MonitoringEvent`] - trait for events
//! - [`EventSeverity`] - event severity levels
//! - [`HostEvent`] / [`ExecutorEvent`] / [`SchedulingEvent`] / [`SupervisionEvent`] - event families
//!
//! ## Errors
//! - [`InvariantError`] - programmer-error class (pool/queue misuse)
//! - [`HostError`] - orchestration-level failures
//! - [`ReferenceError`] - malformed/mismatched references
//! - [`BehaviorError`] - user `Behavior` callback failures
//!
//! ## Utilities
//! - [`SupervisionId`] - correlation id for a supervision round trip
//! - [`Tick`] - sampled wall-clock reading
//!
//! # Example
//!
//! ```rust,ignore
//! use nexus_rt::prelude::*;
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Behavior for Echo {
//!     type State = u32;
//!
//!     async fn handle(
//!         &self,
//!         ctx: &ExecutorCtx<u32>,
//!         _payload: Vec<u8>,
//!     ) -> Result<u32, BehaviorError> {
//!         Ok(ctx.state() + 1)
//!     }
//!
//!     async fn supervise(
//!         &self,
//!         _ctx: &ExecutorCtx<u32>,
//!         _request: &SupervisionRequest,
//!     ) -> Result<Effect, BehaviorError> {
//!         Ok(Effect::Resume)
//!     }
//! }
//! ```

// Identity & protocol
pub use crate::packet::{
    Effect, Message, Packet, SchedulingCreate, SchedulingTerminate, SupervisionRequest,
    SupervisionResponse,
};
pub use crate::reference::{Reference, ReferenceKind};

// Executor
pub use crate::executor::{
    Behavior, Executor, ExecutorContext, ExecutorCtx, ExecutorHandle, ExecutorState, Stance,
};

// Host
pub use crate::host::{Host, HostConfig, HostConfigBuilder, HostContext};
pub use crate::pool::ExecutorPool;

// Coordination primitives
pub use crate::deferred::Deferred;
pub use crate::fsm::Fsm;

// Monitoring
pub use crate::monitoring::{
    EventSeverity, ExecutorEvent, HostEvent, InMemoryMonitor, Monitor, MonitoringEvent,
    NoopMonitor, SchedulingEvent, SupervisionEvent,
};

// Errors
pub use crate::error::{BehaviorError, HostError, InvariantError, ReferenceError};

// Utilities
pub use crate::util::{SupervisionId, Tick};
