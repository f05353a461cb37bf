//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::executor::ExecutorState;
use crate::packet::Effect;
use crate::reference::Reference;
use crate::util::ids::SupervisionId;

/// Configuration for monitoring behavior.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub max_history_size: usize,
    pub severity_filter: EventSeverity,
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    pub timestamp: DateTime<Utc>,
    pub total_events: u64,
    pub trace_count: u64,
    pub debug_count: u64,
    pub info_count: u64,
    pub warning_count: u64,
    pub error_count: u64,
    pub critical_count: u64,
    pub recent_events: Vec<E>,
}

// ============================================================================
// Executor Events
// ============================================================================

/// Events related to one Executor's lifecycle.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutorEvent {
    pub timestamp: DateTime<Utc>,
    pub process: Reference,
    pub event_kind: ExecutorEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ExecutorEvent {
    const EVENT_TYPE: &'static str = "executor";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ExecutorEventKind::Spawned => EventSeverity::Debug,
            ExecutorEventKind::Transitioned { .. } => EventSeverity::Trace,
            ExecutorEventKind::Terminated { .. } => EventSeverity::Info,
            ExecutorEventKind::InvariantViolated { .. } => EventSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ExecutorEventKind {
    /// Executor constructed and inserted into the pool.
    Spawned,
    /// FSM moved from one declared state to another.
    Transitioned {
        from: ExecutorState,
        to: ExecutorState,
    },
    /// Executor reached `End` and was released from the pool.
    Terminated { reason: String },
    /// An internal invariant was violated inside the resume loop (e.g.
    /// `release_process` failed during `terminate`).
    InvariantViolated { message: String },
}

// ============================================================================
// Supervision Events
// ============================================================================

/// Events related to the supervision request/response protocol.
#[derive(Debug, Clone, Serialize)]
pub struct SupervisionEvent {
    pub timestamp: DateTime<Utc>,
    pub child: Reference,
    pub event_kind: SupervisionEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SupervisionEvent {
    const EVENT_TYPE: &'static str = "supervision";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SupervisionEventKind::Raised { .. } => EventSeverity::Warning,
            SupervisionEventKind::ResponseDispatched { .. } => EventSeverity::Info,
            SupervisionEventKind::EffectApplied { .. } => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SupervisionEventKind {
    /// A child raised a `SupervisionRequest` after failing.
    Raised { id: SupervisionId, reason: String },
    /// A `SupervisionResponse` was published back to the child's Host.
    ResponseDispatched { id: SupervisionId, effect: Effect },
    /// The child applied the parent's verdict.
    EffectApplied { id: SupervisionId, effect: Effect },
}

// ============================================================================
// Scheduling Events
// ============================================================================

/// Events related to Executor creation and termination scheduling.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulingEvent {
    pub timestamp: DateTime<Utc>,
    pub target: Reference,
    pub event_kind: SchedulingEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SchedulingEvent {
    const EVENT_TYPE: &'static str = "scheduling";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SchedulingEventKind::Create => EventSeverity::Debug,
            SchedulingEventKind::Terminate { .. } => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SchedulingEventKind {
    Create,
    Terminate { reason: String },
}

// ============================================================================
// Host Events
// ============================================================================

/// Events at the Host boundary: inbound/outbound packet traffic and
/// invariant violations observed while dispatching.
#[derive(Debug, Clone, Serialize)]
pub struct HostEvent {
    pub timestamp: DateTime<Utc>,
    pub event_kind: HostEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for HostEvent {
    const EVENT_TYPE: &'static str = "host";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            HostEventKind::PacketReceived { .. } => EventSeverity::Trace,
            HostEventKind::PacketPublished { .. } => EventSeverity::Trace,
            HostEventKind::QueueBacklog { .. } => EventSeverity::Warning,
            HostEventKind::InvariantViolated { .. } => EventSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum HostEventKind {
    PacketReceived { kind: String },
    PacketPublished { kind: String },
    /// A process's queue crossed `HostConfig::default_queue_capacity` (soft
    /// high-water-mark; queues stay unbounded, this is advisory only).
    QueueBacklog { process: Reference, depth: usize },
    InvariantViolated { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitoring_config_default() {
        let config = MonitoringConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_history_size, 1000);
        assert_eq!(config.severity_filter, EventSeverity::Info);
    }

    #[test]
    fn executor_event_severity_by_kind() {
        let process = Reference::process("proc://a").unwrap();
        let event = ExecutorEvent {
            timestamp: Utc::now(),
            process,
            event_kind: ExecutorEventKind::Terminated {
                reason: "behavior failed".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Info);
        assert_eq!(ExecutorEvent::EVENT_TYPE, "executor");
    }

    #[test]
    fn supervision_event_raised_is_warning() {
        let child = Reference::process("proc://a/x").unwrap();
        let event = SupervisionEvent {
            timestamp: Utc::now(),
            child,
            event_kind: SupervisionEventKind::Raised {
                id: SupervisionId::new(),
                reason: "handle failed".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
    }

    #[test]
    fn host_event_invariant_is_critical() {
        let event = HostEvent {
            timestamp: Utc::now(),
            event_kind: HostEventKind::InvariantViolated {
                message: "pool desync".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Critical);
    }

    #[test]
    fn monitoring_snapshot_creation() {
        let snapshot = MonitoringSnapshot::<HostEvent> {
            timestamp: Utc::now(),
            total_events: 5,
            trace_count: 1,
            debug_count: 1,
            info_count: 1,
            warning_count: 1,
            error_count: 0,
            critical_count: 1,
            recent_events: vec![],
        };
        assert_eq!(snapshot.total_events, 5);
        assert_eq!(snapshot.critical_count, 1);
    }
}
