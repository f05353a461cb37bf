//! `HostConfig`: validated, builder-constructed runtime configuration (§4.6,
//! §5, §9), built from a `HostConfigBuilder` in the same validate-on-build
//! style as the rest of the runtime's configuration types.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Default soft queue depth above which a `HostEvent::QueueBacklog` is raised.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default maximum concurrent processes per Host (0 = unlimited).
pub const DEFAULT_MAX_PROCESSES: usize = 0;

/// Runtime configuration for one `Host`.
///
/// # Examples
///
/// ```rust
/// use nexus_rt::host::HostConfig;
/// use std::time::Duration;
///
/// let config = HostConfig::default();
/// assert_eq!(config.default_queue_capacity, 1000);
///
/// let config = HostConfig::builder()
///     .with_queue_capacity(500)
///     .with_supervision_timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.default_queue_capacity, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Soft high-water-mark for a process's queue depth (advisory only —
    /// queues stay unbounded; crossing it emits `HostEventKind::QueueBacklog`).
    pub default_queue_capacity: usize,

    /// Opt-in deadline on the cross-Host supervision await. `None` means
    /// `Host::supervise` can suspend indefinitely (see §9 for why this
    /// defaults off rather than to some hardcoded value).
    #[serde(with = "crate::util::option_duration_serde")]
    pub supervision_timeout: Option<Duration>,

    /// Opt-in deadline wrapped around user `Behavior::handle`/`supervise`
    /// calls via `tokio::time::timeout`. `None` means no deadline.
    #[serde(with = "crate::util::option_duration_serde")]
    pub behavior_timeout: Option<Duration>,

    /// Maximum concurrent processes this Host will host (0 = unlimited).
    pub max_processes: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            supervision_timeout: None,
            behavior_timeout: None,
            max_processes: DEFAULT_MAX_PROCESSES,
        }
    }
}

impl HostConfig {
    pub fn builder() -> HostConfigBuilder {
        HostConfigBuilder::default()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_queue_capacity == 0 {
            return Err("default_queue_capacity must be > 0".to_string());
        }
        if let Some(timeout) = self.supervision_timeout {
            if timeout.is_zero() {
                return Err("supervision_timeout must be > 0 when set".to_string());
            }
        }
        if let Some(timeout) = self.behavior_timeout {
            if timeout.is_zero() {
                return Err("behavior_timeout must be > 0 when set".to_string());
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`HostConfig`].
#[derive(Debug, Default)]
pub struct HostConfigBuilder {
    config: HostConfig,
}

impl HostConfigBuilder {
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.default_queue_capacity = capacity;
        self
    }

    pub fn with_supervision_timeout(mut self, timeout: Duration) -> Self {
        self.config.supervision_timeout = Some(timeout);
        self
    }

    pub fn with_behavior_timeout(mut self, timeout: Duration) -> Self {
        self.config.behavior_timeout = Some(timeout);
        self
    }

    pub fn with_max_processes(mut self, max: usize) -> Self {
        self.config.max_processes = max;
        self
    }

    pub fn build(self) -> Result<HostConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
