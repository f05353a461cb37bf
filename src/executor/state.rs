//! The closed set of states an [`Executor`](super::Executor) moves through,
//! and the declared-transition table that gates every move (§3, §4.4).

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

/// A single Executor's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorState {
    /// Constructed, not yet entered the resume loop.
    Start,
    /// Idle; woken by a push or a kill.
    Sleeping,
    /// Dispatching one queued `Message` to the behavior.
    Receiving,
    /// Dispatching one queued `SupervisionRequest` to the behavior's strategy.
    Supervising,
    /// Escalating this Executor's own failure to its parent.
    Raising,
    /// Tearing down: releasing from the pool.
    Terminating,
    /// Terminal. No further events are accepted.
    End,
}

/// The allowed-transition table from §3 of the design docs, built once and
/// shared by every `Fsm<ExecutorState>`.
pub fn allowed_transitions() -> HashMap<ExecutorState, HashSet<ExecutorState>> {
    use ExecutorState::*;

    let mut table = HashMap::new();
    table.insert(Start, [Sleeping].into_iter().collect());
    table.insert(
        Sleeping,
        [Terminating, Supervising, Receiving, Raising]
            .into_iter()
            .collect(),
    );
    table.insert(Receiving, [Raising, Sleeping].into_iter().collect());
    table.insert(Supervising, [Raising, Sleeping].into_iter().collect());
    table.insert(Raising, [Terminating, Sleeping].into_iter().collect());
    table.insert(Terminating, [End].into_iter().collect());
    table.insert(End, HashSet::new());
    table
}
