//! `Behavior`, `Stance<B>`, and the per-dispatch `ExecutorCtx` user code sees
//! (§3 Stance, §4.4 Executor).

// Layer 1: Standard library imports
use std::collections::HashSet;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::context::ExecutorContext;
use crate::error::{BehaviorError, HostError};
use crate::packet::SupervisionRequest;
use crate::packet::{Effect, Message};
use crate::reference::Reference;

/// A process's handler function plus its supervision strategy, generic over
/// the opaque user state `S`.
///
/// A dispatch either replaces `State` wholesale (on success) or returns a
/// `BehaviorError` that the Executor turns into an escalation. There is no
/// in-place state mutation — `handle` returns the *next* `State`.
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;

    /// Handle one message, returning the state to adopt next.
    async fn handle(
        &self,
        ctx: &ExecutorCtx<Self::State>,
        payload: Vec<u8>,
    ) -> Result<Self::State, BehaviorError>;

    /// Decide the fate of a failed child.
    async fn supervise(
        &self,
        ctx: &ExecutorCtx<Self::State>,
        request: &SupervisionRequest,
    ) -> Result<Effect, BehaviorError>;
}

/// The mutable `{state, behavior}` pair an Executor owns. `state` is fully
/// replaced on each successful dispatch, never mutated in place; `behavior`
/// is fixed for an Executor's whole lifetime (see "stance narrowing" in the
/// design notes) — a dispatch cannot swap which `Arc<B>` is driving it, only
/// the `B::State` it carries.
pub struct Stance<B: Behavior> {
    pub state: B::State,
    pub behavior: Arc<B>,
}

impl<B: Behavior> Stance<B> {
    pub fn new(state: B::State, behavior: Arc<B>) -> Self {
        Self { state, behavior }
    }
}

/// The view a `Behavior::handle` call sees: identity, a read-only snapshot
/// of the current state, and the two operations valid only mid-dispatch
/// (`send`, `spawn`). Issued fresh per dispatch and dropped at its end, so
/// there is no way to call `send`/`spawn` outside `Receiving`.
pub struct ExecutorCtx<S> {
    self_ref: Reference,
    state: S,
    context: Arc<dyn ExecutorContext>,
    children: Arc<Mutex<HashSet<Reference>>>,
}

impl<S: Clone> ExecutorCtx<S> {
    pub(crate) fn new(
        self_ref: Reference,
        state: S,
        context: Arc<dyn ExecutorContext>,
        children: Arc<Mutex<HashSet<Reference>>>,
    ) -> Self {
        Self {
            self_ref,
            state,
            context,
            children,
        }
    }

    pub fn self_ref(&self) -> &Reference {
        &self.self_ref
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Send a message to `target`. Only reachable from within `handle`,
    /// which already restricts it to `Receiving` by construction.
    pub async fn send(&self, target: Reference, payload: Vec<u8>) -> Result<(), HostError> {
        self.context
            .dispatch_message(Message {
                sender: self.self_ref.clone(),
                receiver: target,
                payload,
            })
            .await
    }

    /// Spawn a child process. Adds the new child's `Reference` to this
    /// Executor's `children` set on success.
    pub async fn spawn(&self, stance: Vec<u8>, name: &str) -> Result<Reference, HostError> {
        let child = self
            .context
            .create_process(&self.self_ref, stance, name)
            .await?;
        self.children.lock().insert(child.clone());
        Ok(child)
    }
}
