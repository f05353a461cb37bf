//! Generic declared-transition state machine (§4.2).
//!
//! `Fsm<S>` is a pure current-state gate: no time, no history. Every branch
//! of the [`Executor`](crate::executor) resume loop opens with an `assert`
//! so illegal re-entries surface immediately as an [`InvariantError`]
//! rather than corrupting downstream state.

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::error::InvariantError;

/// A declared-transition finite state machine over states of type `S`.
///
/// # Example
/// ```rust
/// use nexus_rt::fsm::Fsm;
/// use std::collections::HashMap;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Light { Red, Green }
///
/// let mut allowed = HashMap::new();
/// allowed.insert(Light::Red, [Light::Green].into_iter().collect());
/// allowed.insert(Light::Green, [Light::Red].into_iter().collect());
///
/// let fsm = Fsm::new(Light::Red, allowed);
/// assert!(fsm.test(|s| *s == Light::Red));
/// fsm.transition_to(Light::Green).unwrap();
/// assert!(fsm.test(|s| *s == Light::Green));
/// assert!(fsm.transition_to(Light::Green).is_err());
/// ```
pub struct Fsm<S> {
    state: Mutex<S>,
    allowed: HashMap<S, HashSet<S>>,
}

impl<S> Fsm<S>
where
    S: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new(initial: S, allowed: HashMap<S, HashSet<S>>) -> Self {
        Self {
            state: Mutex::new(initial),
            allowed,
        }
    }

    /// The current state.
    pub fn state(&self) -> S {
        *self.state.lock()
    }

    /// Evaluate a predicate against the current state without mutating it.
    pub fn test(&self, pred: impl FnOnce(&S) -> bool) -> bool {
        pred(&self.state.lock())
    }

    /// Fail loudly (return an [`InvariantError`]) unless `pred` accepts the
    /// current state.
    pub fn assert(&self, pred: impl FnOnce(&S) -> bool, context: &str) -> Result<(), InvariantError> {
        let current = self.state();
        if pred(&current) {
            Ok(())
        } else {
            Err(InvariantError::fsm(format!(
                "{context}: unexpected state {current:?}"
            )))
        }
    }

    /// Move to `next` iff it is declared reachable from the current state.
    pub fn transition_to(&self, next: S) -> Result<(), InvariantError> {
        let mut guard = self.state.lock();
        let current = *guard;
        let reachable = self
            .allowed
            .get(&current)
            .map(|set| set.contains(&next))
            .unwrap_or(false);
        if !reachable {
            return Err(InvariantError::illegal_transition_generic(
                format!("{current:?}"),
                format!("{next:?}"),
            ));
        }
        *guard = next;
        Ok(())
    }
}

impl InvariantError {
    /// Generic counterpart of [`InvariantError::illegal_transition`] for any
    /// `Fsm<S>`, used when `S` is not `ExecutorState`.
    pub fn illegal_transition_generic(from: String, to: String) -> Self {
        Self::fsm(format!("illegal transition from {from} to {to}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Phase {
        A,
        B,
        C,
    }

    fn table() -> HashMap<Phase, HashSet<Phase>> {
        let mut m = HashMap::new();
        m.insert(Phase::A, [Phase::B].into_iter().collect());
        m.insert(Phase::B, [Phase::C].into_iter().collect());
        m.insert(Phase::C, HashSet::new());
        m
    }

    #[test]
    fn starts_in_initial_state() {
        let fsm = Fsm::new(Phase::A, table());
        assert_eq!(fsm.state(), Phase::A);
    }

    #[test]
    fn declared_transition_succeeds() {
        let fsm = Fsm::new(Phase::A, table());
        assert!(fsm.transition_to(Phase::B).is_ok());
        assert_eq!(fsm.state(), Phase::B);
    }

    #[test]
    fn undeclared_transition_is_invariant_error() {
        let fsm = Fsm::new(Phase::A, table());
        let err = fsm.transition_to(Phase::C).unwrap_err();
        assert!(err.message.contains("A"));
        assert!(err.message.contains("C"));
    }

    #[test]
    fn terminal_state_has_no_outgoing_transitions() {
        let fsm = Fsm::new(Phase::A, table());
        fsm.transition_to(Phase::B).unwrap();
        fsm.transition_to(Phase::C).unwrap();
        assert!(fsm.transition_to(Phase::A).is_err());
    }

    #[test]
    fn assert_passes_when_predicate_matches() {
        let fsm = Fsm::new(Phase::A, table());
        assert!(fsm.assert(|s| *s == Phase::A, "entry guard").is_ok());
    }

    #[test]
    fn assert_fails_when_predicate_rejects() {
        let fsm = Fsm::new(Phase::A, table());
        let err = fsm.assert(|s| *s == Phase::B, "entry guard").unwrap_err();
        assert!(err.message.contains("entry guard"));
    }
}
