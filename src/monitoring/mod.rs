//! Structured internal event stream for observability.
//!
//! A generic `Monitor<E>` trait over any event type, with a zero-cost
//! [`NoopMonitor`] and a ring-buffer [`InMemoryMonitor`]
//! rather than a direct dependency on a logging backend. `Host` and
//! `Executor` take a `Monitor<...>` so a deployment wires metrics/logging
//! without coupling the core to one.
//!
//! Four event families, one per subsystem: [`types::ExecutorEvent`] (spawned,
//! transitioned, terminated), [`types::SupervisionEvent`] (raised, response
//! dispatched, effect applied), [`types::SchedulingEvent`] (create,
//! terminate), and [`types::HostEvent`] (packet received/published, queue
//! backlog, invariant violated).

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ExecutorEvent, ExecutorEventKind, HostEvent, HostEventKind, MonitoringConfig,
    MonitoringSnapshot, SchedulingEvent, SchedulingEventKind, SupervisionEvent,
    SupervisionEventKind,
};
