//! The orchestrator layer: `HostConfig`, the transport-facing `HostContext`
//! trait, and the `Host` that ties the `ExecutorPool` to both (§4.6).

mod config;
mod context;
mod engine;

pub use config::{HostConfig, HostConfigBuilder, DEFAULT_MAX_PROCESSES, DEFAULT_QUEUE_CAPACITY};
pub use context::HostContext;
pub use engine::Host;
