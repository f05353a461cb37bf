//! The per-process runtime: state machine, behavior contract, Host callback
//! surface, object-safe pool handle, and the engine that ties them together
//! (§3, §4.4).

mod context;
mod engine;
mod handle;
mod stance;
mod state;

pub use context::ExecutorContext;
pub use engine::Executor;
pub use handle::ExecutorHandle;
pub use stance::{Behavior, ExecutorCtx, Stance};
pub use state::{allowed_transitions, ExecutorState};
