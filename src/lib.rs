//! # nexus-rt - Distributed Actor Runtime
//!
//! A local-first actor runtime: a precise per-process state machine (the
//! `Executor`), a `Host` that owns a pool of Executors and mediates their
//! interaction with the wider cluster, and a uniform `Packet` protocol that
//! makes local and remote delivery interchangeable.
//!
//! # Quick Start
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
//!
//! # Core Concepts
//!
//! - [`Reference`] — URL-keyed identity for a Host or a Process.
//! - [`Packet`] — the wire taxonomy that flows between Hosts.
//! - [`Fsm`] — the generic finite state machine backing `ExecutorState`.
//! - [`Deferred`] — a single-shot promise used to rendezvous a supervision
//!   round trip.
//! - [`Executor`] and [`Behavior`] — the per-process engine and the user's
//!   handler/supervision-strategy pair.
//! - [`ExecutorPool`] — the Host-local `Reference -> Executor` index.
//! - [`Host`] — the orchestrator binding transport, pool, and Executors
//!   together.
//!
//! # Module Organization
//!
//! - [`reference`] - Host/Process identity
//! - [`packet`] - the wire protocol between Hosts
//! - [`fsm`] - generic declared-transition state machine
//! - [`deferred`] - single-shot cross-Host rendezvous
//! - [`executor`] - per-process state, behavior contract, and engine
//! - [`pool`] - Host-local Executor index
//! - [`host`] - orchestration, configuration, and the transport boundary
//! - [`monitoring`] - structured internal event stream for observability
//! - [`error`] - crate-wide error taxonomy
//! - [`util`] - identifiers, sampled time, and small serde helpers
//!
//! # Standards Compliance
//!
//! - 3-layer import organization (std -> third-party -> internal)
//! - `chrono::DateTime<Utc>` for all timestamps
//! - `thiserror`-based canonical error structs with `is_fatal`/`is_retryable`
//!   helpers where the distinction matters
//! - No `unwrap`/`expect`/`panic` in non-test code (enforced via
//!   `#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]` at
//!   the workspace level)

pub mod deferred;
pub mod error;
pub mod executor;
pub mod fsm;
pub mod host;
pub mod monitoring;
pub mod packet;
pub mod pool;
pub mod reference;
pub mod util;

pub mod prelude;

pub use deferred::Deferred;
pub use error::{BehaviorError, HostError, InvariantError, InvariantKind, ReferenceError};
pub use executor::{Behavior, Executor, ExecutorContext, ExecutorCtx, ExecutorHandle, ExecutorState, Stance};
pub use fsm::Fsm;
pub use host::{Host, HostConfig, HostContext};
pub use monitoring::{
    EventSeverity, ExecutorEvent, ExecutorEventKind, HostEvent, HostEventKind, InMemoryMonitor,
    Monitor, MonitoringConfig, MonitoringError, MonitoringEvent, MonitoringSnapshot, NoopMonitor,
    SchedulingEvent, SchedulingEventKind, SupervisionEvent, SupervisionEventKind,
};
pub use packet::{
    Effect, Message, Packet, SchedulingCreate, SchedulingTerminate, SupervisionRequest,
    SupervisionResponse,
};
pub use pool::ExecutorPool;
pub use reference::{Reference, ReferenceKind};
pub use util::{SupervisionId, Tick};
