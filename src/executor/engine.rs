//! `Executor<B>`: the per-process runtime engine (§4.4).
//!
//! Owns one process's identity, stance, queues, and FSM, and drives the
//! resume loop that arbitrates between termination, supervision, and
//! ordinary messages. Lives only in the `ExecutorPool`, reached from the
//! outside exclusively through [`ExecutorHandle`](super::ExecutorHandle).

// Layer 1: Standard library imports
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex as AsyncMutex, Notify, RwLock as AsyncRwLock};

// Layer 3: Internal module imports
use super::context::ExecutorContext;
use super::handle::ExecutorHandle;
use super::stance::{Behavior, ExecutorCtx, Stance};
use super::state::{allowed_transitions, ExecutorState};
use crate::error::{BehaviorError, InvariantError};
use crate::fsm::Fsm;
use crate::monitoring::{
    ExecutorEvent, ExecutorEventKind, Monitor, NoopMonitor, SupervisionEvent, SupervisionEventKind,
};
use crate::packet::{Effect, Message, SupervisionRequest, SupervisionResponse};
use crate::reference::Reference;
use crate::util::ids::SupervisionId;

/// The runtime engine driving one Process through its lifecycle.
///
/// Generic over `B: Behavior` so dispatch stays strongly typed end to end;
/// only [`ExecutorHandle`] (implemented below) is object-safe, and that is
/// the only way the [`ExecutorPool`](crate::pool::ExecutorPool) ever touches
/// an Executor whose concrete `B` it does not know.
pub struct Executor<B: Behavior> {
    self_ref: Reference,
    stance: AsyncRwLock<Stance<B>>,
    children: Arc<SyncMutex<HashSet<Reference>>>,
    messages: AsyncMutex<VecDeque<Message>>,
    message_depth: AtomicUsize,
    requests: AsyncMutex<VecDeque<SupervisionRequest>>,
    fsm: Fsm<ExecutorState>,
    termination: SyncMutex<Option<Vec<u8>>>,
    notify: Notify,
    dispatch_lock: AsyncMutex<()>,
    context: Arc<dyn ExecutorContext>,
    monitor: Arc<dyn Monitor<ExecutorEvent>>,
    supervision_monitor: Arc<dyn Monitor<SupervisionEvent>>,
    behavior_timeout: Option<Duration>,
}

impl<B: Behavior> Executor<B> {
    pub fn new(
        self_ref: Reference,
        stance: Stance<B>,
        context: Arc<dyn ExecutorContext>,
        monitor: Arc<dyn Monitor<ExecutorEvent>>,
    ) -> Arc<Self> {
        Self::with_behavior_timeout(self_ref, stance, context, monitor, None)
    }

    /// Same as [`Executor::new`], additionally wrapping every
    /// `Behavior::handle`/`Behavior::supervise` call in `tokio::time::timeout`
    /// when `behavior_timeout` is `Some` (see `HostConfig::behavior_timeout`).
    pub fn with_behavior_timeout(
        self_ref: Reference,
        stance: Stance<B>,
        context: Arc<dyn ExecutorContext>,
        monitor: Arc<dyn Monitor<ExecutorEvent>>,
        behavior_timeout: Option<Duration>,
    ) -> Arc<Self> {
        Self::with_monitors(
            self_ref,
            stance,
            context,
            monitor,
            Arc::new(NoopMonitor::new()),
            behavior_timeout,
        )
    }

    /// Full constructor: also takes the `SupervisionEvent` monitor used for
    /// `Raised`/`ResponseDispatched`/`EffectApplied` events.
    pub fn with_monitors(
        self_ref: Reference,
        stance: Stance<B>,
        context: Arc<dyn ExecutorContext>,
        monitor: Arc<dyn Monitor<ExecutorEvent>>,
        supervision_monitor: Arc<dyn Monitor<SupervisionEvent>>,
        behavior_timeout: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            self_ref,
            stance: AsyncRwLock::new(stance),
            children: Arc::new(SyncMutex::new(HashSet::new())),
            messages: AsyncMutex::new(VecDeque::new()),
            message_depth: AtomicUsize::new(0),
            requests: AsyncMutex::new(VecDeque::new()),
            fsm: Fsm::new(ExecutorState::Start, allowed_transitions()),
            termination: SyncMutex::new(None),
            notify: Notify::new(),
            dispatch_lock: AsyncMutex::new(()),
            context,
            monitor,
            supervision_monitor,
            behavior_timeout,
        })
    }

    /// Snapshot of the processes spawned by this Executor and not yet released.
    pub fn children(&self) -> HashSet<Reference> {
        self.children.lock().clone()
    }

    /// `Start -> Sleeping`, then spawn the background task the rest of the
    /// resume loop runs on.
    pub fn start(self: &Arc<Self>) -> Result<(), InvariantError> {
        self.fsm.transition_to(ExecutorState::Sleeping)?;
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run().await });
        Ok(())
    }

    async fn run(self: Arc<Self>) {
        loop {
            self.drain().await;
            if self.fsm.test(|s| *s == ExecutorState::End) {
                return;
            }
            self.notify.notified().await;
        }
    }

    /// Run resume-loop steps back to back until idle or `End`.
    async fn drain(self: &Arc<Self>) {
        loop {
            let _guard = self.dispatch_lock.lock().await;

            if !self.fsm.test(|s| *s == ExecutorState::Sleeping) {
                return;
            }

            let termination_reason = self.termination.lock().clone();
            if let Some(reason) = termination_reason {
                self.transition(ExecutorState::Terminating).await;
                self.terminate(reason).await;
                return;
            }

            let next_request = self.requests.lock().await.pop_front();
            if let Some(request) = next_request {
                self.transition(ExecutorState::Supervising).await;
                self.supervise_step(request).await;
                continue;
            }

            let next_message = self.messages.lock().await.pop_front();
            if let Some(message) = next_message {
                self.message_depth.fetch_sub(1, Ordering::SeqCst);
                self.transition(ExecutorState::Receiving).await;
                self.receive_step(message).await;
                continue;
            }

            let _ = self.context.tick().await;
            return;
        }
    }

    async fn transition(&self, to: ExecutorState) {
        let from = self.fsm.state();
        if let Err(err) = self.fsm.transition_to(to) {
            self.record_invariant(err.message).await;
            return;
        }
        let _ = self
            .monitor
            .record(ExecutorEvent {
                timestamp: Utc::now(),
                process: self.self_ref.clone(),
                event_kind: ExecutorEventKind::Transitioned { from, to },
                metadata: Default::default(),
            })
            .await;
    }

    async fn record_supervision_event(&self, child: Reference, kind: SupervisionEventKind) {
        let _ = self
            .supervision_monitor
            .record(SupervisionEvent {
                timestamp: Utc::now(),
                child,
                event_kind: kind,
                metadata: Default::default(),
            })
            .await;
    }

    async fn record_invariant(&self, message: String) {
        let _ = self
            .monitor
            .record(ExecutorEvent {
                timestamp: Utc::now(),
                process: self.self_ref.clone(),
                event_kind: ExecutorEventKind::InvariantViolated { message },
                metadata: Default::default(),
            })
            .await;
    }

    async fn snapshot_stance(&self) -> (B::State, Arc<B>) {
        let guard = self.stance.read().await;
        (guard.state.clone(), Arc::clone(&guard.behavior))
    }

    fn make_ctx(&self, state: B::State) -> ExecutorCtx<B::State> {
        ExecutorCtx::new(
            self.self_ref.clone(),
            state,
            Arc::clone(&self.context),
            Arc::clone(&self.children),
        )
    }

    /// Assert `Receiving` and atomically replace the stance's state.
    async fn become_(&self, new_state: B::State) {
        if let Err(err) = self.fsm.assert(|s| *s == ExecutorState::Receiving, "become_") {
            self.record_invariant(err.message).await;
            return;
        }
        self.stance.write().await.state = new_state;
    }

    /// Run a behavior call under `self.behavior_timeout` when one is
    /// configured, collapsing an elapsed deadline into the same
    /// `BehaviorError` path as an ordinary handler failure.
    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, BehaviorError>>,
    ) -> Result<T, BehaviorError> {
        match self.behavior_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .unwrap_or_else(|_elapsed| Err(BehaviorError::new("behavior call timed out"))),
            None => fut.await,
        }
    }

    async fn receive_step(self: &Arc<Self>, message: Message) {
        let (state, behavior) = self.snapshot_stance().await;
        let ctx = self.make_ctx(state);
        match self.with_timeout(behavior.handle(&ctx, message.payload)).await {
            Ok(new_state) => {
                self.become_(new_state).await;
                self.transition(ExecutorState::Sleeping).await;
            }
            Err(err) => {
                self.transition(ExecutorState::Raising).await;
                self.raise(err.0.into_bytes()).await;
            }
        }
    }

    async fn supervise_step(self: &Arc<Self>, request: SupervisionRequest) {
        let (state, behavior) = self.snapshot_stance().await;
        let ctx = self.make_ctx(state);
        let child = request.child.clone();
        match self.with_timeout(behavior.supervise(&ctx, &request)).await {
            Ok(effect) => {
                let response = SupervisionResponse {
                    id: request.id,
                    child: request.child,
                    effect,
                };
                self.record_supervision_event(
                    child,
                    SupervisionEventKind::ResponseDispatched {
                        id: response.id,
                        effect,
                    },
                )
                .await;
                if let Err(err) = self.context.dispatch_supervision_response(response).await {
                    self.transition(ExecutorState::Raising).await;
                    self.raise(err.to_string().into_bytes()).await;
                    return;
                }
                self.transition(ExecutorState::Sleeping).await;
            }
            Err(err) => {
                // Safe default: stop the failed child even though our own
                // strategy errored, then escalate our own failure.
                let response = SupervisionResponse {
                    id: request.id,
                    child: request.child,
                    effect: Effect::Stop,
                };
                self.record_supervision_event(
                    child,
                    SupervisionEventKind::ResponseDispatched {
                        id: response.id,
                        effect: Effect::Stop,
                    },
                )
                .await;
                let _ = self.context.dispatch_supervision_response(response).await;
                self.transition(ExecutorState::Raising).await;
                self.raise(err.0.into_bytes()).await;
            }
        }
    }

    /// Escalate this Executor's own failure to its parent and branch on the
    /// returned `Effect`.
    async fn raise(self: &Arc<Self>, reason: Vec<u8>) {
        let id = SupervisionId::new();
        let request = SupervisionRequest {
            id,
            child: self.self_ref.clone(),
            reason: reason.clone(),
        };
        self.record_supervision_event(
            self.self_ref.clone(),
            SupervisionEventKind::Raised {
                id,
                reason: String::from_utf8_lossy(&reason).into_owned(),
            },
        )
        .await;
        match self.context.supervise(request).await {
            Ok(effect @ Effect::Resume) => {
                self.record_supervision_event(
                    self.self_ref.clone(),
                    SupervisionEventKind::EffectApplied { id, effect },
                )
                .await;
                self.transition(ExecutorState::Sleeping).await;
            }
            Ok(effect @ Effect::Stop) => {
                self.record_supervision_event(
                    self.self_ref.clone(),
                    SupervisionEventKind::EffectApplied { id, effect },
                )
                .await;
                self.transition(ExecutorState::Terminating).await;
                self.terminate(reason).await;
            }
            Err(host_err) => {
                self.transition(ExecutorState::Terminating).await;
                self.terminate(host_err.to_string().into_bytes()).await;
            }
        }
    }

    async fn terminate(self: &Arc<Self>, reason: Vec<u8>) {
        if let Err(err) = self.context.release_process(&self.self_ref).await {
            self.record_invariant(format!("release_process failed: {err}"))
                .await;
        }
        self.transition(ExecutorState::End).await;
        let _ = self.context.tick().await;
        let _ = self
            .monitor
            .record(ExecutorEvent {
                timestamp: Utc::now(),
                process: self.self_ref.clone(),
                event_kind: ExecutorEventKind::Terminated {
                    reason: String::from_utf8_lossy(&reason).into_owned(),
                },
                metadata: Default::default(),
            })
            .await;
    }
}

#[async_trait]
impl<B: Behavior> ExecutorHandle for Executor<B> {
    fn self_ref(&self) -> &Reference {
        &self.self_ref
    }

    fn state(&self) -> ExecutorState {
        self.fsm.state()
    }

    async fn push_message(&self, message: Message) -> Result<(), InvariantError> {
        self.fsm
            .assert(|s| *s != ExecutorState::End, "push_message after End")?;
        if message.receiver != self.self_ref {
            return Err(InvariantError::executor(format!(
                "message receiver {} does not match self_ref {}",
                message.receiver, self.self_ref
            )));
        }
        self.messages.lock().await.push_back(message);
        self.message_depth.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn queue_depth(&self) -> usize {
        self.message_depth.load(Ordering::SeqCst)
    }

    async fn push_supervision_request(
        &self,
        request: SupervisionRequest,
    ) -> Result<(), InvariantError> {
        self.fsm.assert(
            |s| *s != ExecutorState::End,
            "push_supervision_request after End",
        )?;
        self.requests.lock().await.push_back(request);
        Ok(())
    }

    fn wake(&self) {
        self.notify.notify_one();
    }

    fn kill(&self, reason: Vec<u8>) {
        *self.termination.lock() = Some(reason);
        self.notify.notify_one();
    }
}
