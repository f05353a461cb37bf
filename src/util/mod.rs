//! Small standalone utilities shared across the crate.

pub mod ids;
pub mod serde_helpers;

pub use ids::{SupervisionId, Tick};
pub use serde_helpers::{duration_serde, option_duration_serde};
