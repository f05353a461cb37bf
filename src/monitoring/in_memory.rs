//! In-memory monitor implementation with lock-free atomic counters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::error::MonitoringError;
use super::traits::{EventSeverity, Monitor, MonitoringEvent};
use super::types::{MonitoringConfig, MonitoringSnapshot};

/// In-memory monitor implementation with lock-free atomic counters.
///
/// Uses `Arc<Inner>` so cloning is cheap: atomic counters for lock-free
/// event counting, an `RwLock`-guarded ring buffer for recent history,
/// bounded to `MonitoringConfig::max_history_size`.
///
/// # Examples
/// ```
/// use nexus_rt::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, HostEvent, HostEventKind};
/// use chrono::Utc;
/// use std::collections::HashMap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let monitor = InMemoryMonitor::new(MonitoringConfig::default());
/// let event = HostEvent {
///     timestamp: Utc::now(),
///     event_kind: HostEventKind::PacketReceived { kind: "message".into() },
///     metadata: HashMap::new(),
/// };
/// monitor.record(event).await?;
/// let snapshot = monitor.snapshot().await?;
/// assert_eq!(snapshot.total_events, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryMonitor<E: MonitoringEvent> {
    inner: Arc<InMemoryMonitorInner<E>>,
}

#[derive(Debug)]
struct InMemoryMonitorInner<E: MonitoringEvent> {
    config: MonitoringConfig,
    total_events: AtomicU64,
    trace_count: AtomicU64,
    debug_count: AtomicU64,
    info_count: AtomicU64,
    warning_count: AtomicU64,
    error_count: AtomicU64,
    critical_count: AtomicU64,
    history: RwLock<VecDeque<E>>,
}

impl<E: MonitoringEvent> InMemoryMonitor<E> {
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            inner: Arc::new(InMemoryMonitorInner {
                config,
                total_events: AtomicU64::new(0),
                trace_count: AtomicU64::new(0),
                debug_count: AtomicU64::new(0),
                info_count: AtomicU64::new(0),
                warning_count: AtomicU64::new(0),
                error_count: AtomicU64::new(0),
                critical_count: AtomicU64::new(0),
                history: RwLock::new(VecDeque::new()),
            }),
        }
    }

    fn increment_severity_counter(&self, severity: EventSeverity) {
        match severity {
            EventSeverity::Trace => self.inner.trace_count.fetch_add(1, Ordering::Relaxed),
            EventSeverity::Debug => self.inner.debug_count.fetch_add(1, Ordering::Relaxed),
            EventSeverity::Info => self.inner.info_count.fetch_add(1, Ordering::Relaxed),
            EventSeverity::Warning => self.inner.warning_count.fetch_add(1, Ordering::Relaxed),
            EventSeverity::Error => self.inner.error_count.fetch_add(1, Ordering::Relaxed),
            EventSeverity::Critical => self.inner.critical_count.fetch_add(1, Ordering::Relaxed),
        };
    }
}

impl<E: MonitoringEvent> Clone for InMemoryMonitor<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<E: MonitoringEvent> Monitor<E> for InMemoryMonitor<E> {
    async fn record(&self, event: E) -> Result<(), MonitoringError> {
        if !self.inner.config.enabled {
            return Ok(());
        }

        let severity = event.severity();
        if severity < self.inner.config.severity_filter {
            return Ok(());
        }

        self.inner.total_events.fetch_add(1, Ordering::Relaxed);
        self.increment_severity_counter(severity);

        let mut history = self
            .inner
            .history
            .write()
            .map_err(|e| MonitoringError::record(format!("failed to acquire write lock: {e}")))?;

        if history.len() >= self.inner.config.max_history_size {
            history.pop_front();
        }
        history.push_back(event);

        Ok(())
    }

    async fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError> {
        let total_events = self.inner.total_events.load(Ordering::Relaxed);
        let trace_count = self.inner.trace_count.load(Ordering::Relaxed);
        let debug_count = self.inner.debug_count.load(Ordering::Relaxed);
        let info_count = self.inner.info_count.load(Ordering::Relaxed);
        let warning_count = self.inner.warning_count.load(Ordering::Relaxed);
        let error_count = self.inner.error_count.load(Ordering::Relaxed);
        let critical_count = self.inner.critical_count.load(Ordering::Relaxed);

        let history = self
            .inner
            .history
            .read()
            .map_err(|e| MonitoringError::snapshot(format!("failed to acquire read lock: {e}")))?;
        let recent_events = history.iter().cloned().collect();

        Ok(MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events,
            trace_count,
            debug_count,
            info_count,
            warning_count,
            error_count,
            critical_count,
            recent_events,
        })
    }

    async fn reset(&self) -> Result<(), MonitoringError> {
        self.inner.total_events.store(0, Ordering::Relaxed);
        self.inner.trace_count.store(0, Ordering::Relaxed);
        self.inner.debug_count.store(0, Ordering::Relaxed);
        self.inner.info_count.store(0, Ordering::Relaxed);
        self.inner.warning_count.store(0, Ordering::Relaxed);
        self.inner.error_count.store(0, Ordering::Relaxed);
        self.inner.critical_count.store(0, Ordering::Relaxed);

        let mut history = self
            .inner
            .history
            .write()
            .map_err(|e| MonitoringError::reset(format!("failed to acquire write lock: {e}")))?;
        history.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::monitoring::types::{HostEvent, HostEventKind};

    fn event(kind: HostEventKind) -> HostEvent {
        HostEvent {
            timestamp: Utc::now(),
            event_kind: kind,
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let monitor = InMemoryMonitor::<HostEvent>::new(MonitoringConfig::default());
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
    }

    #[tokio::test]
    async fn records_increment_total_and_severity_counters() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        monitor
            .record(event(HostEventKind::PacketReceived {
                kind: "message".into(),
            }))
            .await
            .unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 1);
        assert_eq!(snapshot.trace_count, 1);
    }

    #[tokio::test]
    async fn history_is_bounded_by_max_history_size() {
        let config = MonitoringConfig {
            max_history_size: 2,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);
        for _ in 0..5 {
            monitor
                .record(event(HostEventKind::PacketReceived {
                    kind: "message".into(),
                }))
                .await
                .unwrap();
        }
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 5);
        assert_eq!(snapshot.recent_events.len(), 2);
    }

    #[tokio::test]
    async fn severity_filter_drops_events_below_threshold() {
        let config = MonitoringConfig {
            severity_filter: EventSeverity::Critical,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);
        monitor
            .record(event(HostEventKind::PacketReceived {
                kind: "message".into(),
            }))
            .await
            .unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
    }

    #[tokio::test]
    async fn reset_clears_counters_and_history() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        monitor
            .record(event(HostEventKind::InvariantViolated {
                message: "pool desync".into(),
            }))
            .await
            .unwrap();
        monitor.reset().await.unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
        assert_eq!(snapshot.critical_count, 0);
    }

    #[tokio::test]
    async fn disabled_monitor_never_records() {
        let config = MonitoringConfig {
            enabled: false,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);
        monitor
            .record(event(HostEventKind::InvariantViolated {
                message: "x".into(),
            }))
            .await
            .unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
    }
}
