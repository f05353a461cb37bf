//! `Host<B>`: the orchestrator that turns transport-delivered [`Packet`]s
//! into Executor events and vice versa, and owns the [`ExecutorPool`] (§4.6).
//!
//! Monomorphic over one [`Behavior`] type `B` — a single Host in this port
//! serves one behavior family, sharing one `Arc<B>` across every Executor it
//! creates. A deployment that needs heterogeneous behaviors per Host would
//! extend this with a keyed factory registry; see `DESIGN.md`.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

// Layer 3: Internal module imports
use super::config::HostConfig;
use super::context::HostContext;
use crate::deferred::Deferred;
use crate::error::{HostError, InvariantError};
use crate::executor::{Behavior, Executor, ExecutorContext, Stance};
use crate::monitoring::{
    ExecutorEvent, ExecutorEventKind, HostEvent, HostEventKind, Monitor, NoopMonitor,
    SchedulingEvent, SchedulingEventKind, SupervisionEvent, SupervisionEventKind,
};
use crate::packet::{
    Effect, Message, Packet, SchedulingCreate, SchedulingTerminate, SupervisionRequest,
    SupervisionResponse,
};
use crate::pool::ExecutorPool;
use crate::reference::Reference;
use crate::util::ids::Tick;

/// Boundary object: routes inbound packets into the local [`ExecutorPool`]
/// and publishes outbound packets on behalf of local Executors.
pub struct Host<B: Behavior> {
    self_ref: Reference,
    pool: ExecutorPool,
    transport: Arc<dyn HostContext>,
    config: HostConfig,
    behavior: Arc<B>,
    host_monitor: Arc<dyn Monitor<HostEvent>>,
    executor_monitor: Arc<dyn Monitor<ExecutorEvent>>,
    scheduling_monitor: Arc<dyn Monitor<SchedulingEvent>>,
    supervision_monitor: Arc<dyn Monitor<SupervisionEvent>>,
}

impl<B: Behavior> Host<B>
where
    B::State: Serialize + DeserializeOwned,
{
    pub fn new(
        self_ref: Reference,
        transport: Arc<dyn HostContext>,
        config: HostConfig,
        behavior: Arc<B>,
        host_monitor: Arc<dyn Monitor<HostEvent>>,
        executor_monitor: Arc<dyn Monitor<ExecutorEvent>>,
        scheduling_monitor: Arc<dyn Monitor<SchedulingEvent>>,
    ) -> Arc<Self> {
        Self::with_supervision_monitor(
            self_ref,
            transport,
            config,
            behavior,
            host_monitor,
            executor_monitor,
            scheduling_monitor,
            Arc::new(NoopMonitor::new()),
        )
    }

    /// Same as [`Host::new`], additionally taking the `SupervisionEvent`
    /// monitor shared by this Host and every Executor it spawns.
    #[allow(clippy::too_many_arguments)]
    pub fn with_supervision_monitor(
        self_ref: Reference,
        transport: Arc<dyn HostContext>,
        config: HostConfig,
        behavior: Arc<B>,
        host_monitor: Arc<dyn Monitor<HostEvent>>,
        executor_monitor: Arc<dyn Monitor<ExecutorEvent>>,
        scheduling_monitor: Arc<dyn Monitor<SchedulingEvent>>,
        supervision_monitor: Arc<dyn Monitor<SupervisionEvent>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            self_ref,
            pool: ExecutorPool::new(),
            transport,
            config,
            behavior,
            host_monitor,
            executor_monitor,
            scheduling_monitor,
            supervision_monitor,
        })
    }

    pub fn self_ref(&self) -> &Reference {
        &self.self_ref
    }

    pub fn pool(&self) -> &ExecutorPool {
        &self.pool
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    async fn record_host_event(&self, kind: HostEventKind) {
        let _ = self
            .host_monitor
            .record(HostEvent {
                timestamp: Utc::now(),
                event_kind: kind,
                metadata: HashMap::new(),
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
                metadata: HashMap::new(),
            })
            .await;
    }

    async fn record_scheduling_event(&self, target: Reference, kind: SchedulingEventKind) {
        let _ = self
            .scheduling_monitor
            .record(SchedulingEvent {
                timestamp: Utc::now(),
                target,
                event_kind: kind,
                metadata: HashMap::new(),
            })
            .await;
    }

    /// Turn one transport-delivered packet into the corresponding local
    /// effect: an Executor push, a pool mutation, or a fresh Executor.
    pub async fn receive(self: &Arc<Self>, packet: Packet) -> Result<(), HostError> {
        self.record_host_event(HostEventKind::PacketReceived {
            kind: packet_kind(&packet).to_string(),
        })
        .await;

        match packet {
            Packet::Message(message) => {
                let receiver = message.receiver.clone();
                let executor = self.pool.get_executor(&receiver)?;
                executor.push_message(message).await?;
                executor.wake();
                let depth = executor.queue_depth();
                if depth >= self.config.default_queue_capacity {
                    self.record_host_event(HostEventKind::QueueBacklog {
                        process: receiver,
                        depth,
                    })
                    .await;
                }
                Ok(())
            }
            Packet::SupervisionRequest(request) => self.receive_supervision_request(request).await,
            Packet::SupervisionResponse(response) => self
                .pool
                .resolve_deferred_supervision_request(response)
                .await
                .map_err(HostError::from),
            Packet::SchedulingCreate(create) => self.receive_scheduling_create(create).await,
            Packet::SchedulingTerminate(terminate) => {
                let executor = self.pool.get_executor(&terminate.target)?;
                self.record_scheduling_event(
                    terminate.target.clone(),
                    SchedulingEventKind::Terminate {
                        reason: String::from_utf8_lossy(&terminate.reason).into_owned(),
                    },
                )
                .await;
                executor.kill(terminate.reason);
                Ok(())
            }
        }
    }

    async fn receive_supervision_request(
        self: &Arc<Self>,
        request: SupervisionRequest,
    ) -> Result<(), HostError> {
        let parent = request.child.parent()?;
        if !self.pool.has_process(&parent) {
            let response = SupervisionResponse {
                id: request.id,
                child: request.child.clone(),
                effect: Effect::Stop,
            };
            self.record_supervision_event(
                request.child.clone(),
                SupervisionEventKind::ResponseDispatched {
                    id: response.id,
                    effect: Effect::Stop,
                },
            )
            .await;
            self.transport
                .publish(Packet::SupervisionResponse(response))
                .await?;
            return Err(HostError::from(InvariantError::host(format!(
                "supervision request for {} misrouted: parent {} not local",
                request.child, parent
            ))));
        }
        let executor = self.pool.get_executor(&parent)?;
        executor.push_supervision_request(request).await?;
        executor.wake();
        Ok(())
    }

    async fn receive_scheduling_create(
        self: &Arc<Self>,
        create: SchedulingCreate,
    ) -> Result<(), HostError> {
        if self.config.max_processes > 0 && self.pool.len() >= self.config.max_processes {
            return Err(HostError::ProcessLimitReached {
                current: self.pool.len(),
                max: self.config.max_processes,
            });
        }
        let state: B::State = serde_json::from_slice(&create.stance)
            .map_err(|err| HostError::Transport(err.to_string()))?;
        let stance = Stance::new(state, Arc::clone(&self.behavior));
        let context: Arc<dyn ExecutorContext> = Arc::clone(self) as Arc<dyn ExecutorContext>;
        let executor = Executor::with_monitors(
            create.child.clone(),
            stance,
            context,
            Arc::clone(&self.executor_monitor),
            Arc::clone(&self.supervision_monitor),
            self.config.behavior_timeout,
        );
        executor.start()?;
        executor.wake();
        self.pool.insert_process(&create.child, executor)?;
        self.record_scheduling_event(create.child.clone(), SchedulingEventKind::Create)
            .await;
        let _ = self
            .executor_monitor
            .record(ExecutorEvent {
                timestamp: Utc::now(),
                process: create.child,
                event_kind: ExecutorEventKind::Spawned,
                metadata: HashMap::new(),
            })
            .await;
        Ok(())
    }
}

#[async_trait]
impl<B: Behavior> ExecutorContext for Host<B>
where
    B::State: Serialize + DeserializeOwned,
{
    async fn create_process(
        &self,
        parent: &Reference,
        stance: Vec<u8>,
        name: &str,
    ) -> Result<Reference, HostError> {
        let child = parent.child(name)?;
        self.transport
            .publish(Packet::SchedulingCreate(SchedulingCreate {
                child: child.clone(),
                stance,
            }))
            .await?;
        let _ = self
            .host_monitor
            .record(HostEvent {
                timestamp: Utc::now(),
                event_kind: HostEventKind::PacketPublished {
                    kind: "scheduling_create".to_string(),
                },
                metadata: HashMap::new(),
            })
            .await;
        Ok(child)
    }

    async fn release_process(&self, target: &Reference) -> Result<(), HostError> {
        self.pool.delete_process(target).map_err(HostError::from)
    }

    async fn dispatch_message(&self, message: Message) -> Result<(), HostError> {
        self.transport.publish(Packet::Message(message)).await
    }

    async fn dispatch_supervision_response(
        &self,
        response: SupervisionResponse,
    ) -> Result<(), HostError> {
        self.transport
            .publish(Packet::SupervisionResponse(response))
            .await
    }

    async fn supervise(&self, request: SupervisionRequest) -> Result<Effect, HostError> {
        let deferred = Arc::new(Deferred::<SupervisionResponse>::new());
        self.pool.insert_deferred_supervision_request(
            &request.child,
            request.id,
            Arc::clone(&deferred),
        )?;
        let id = request.id;
        self.transport
            .publish(Packet::SupervisionRequest(request))
            .await?;

        let response = match self.config.supervision_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, deferred.await_value()).await {
                Ok(inner) => inner?,
                Err(_elapsed) => return Err(HostError::SupervisionTimeout(id)),
            },
            None => deferred.await_value().await?,
        };
        Ok(response.effect)
    }

    async fn terminate_process(&self, target: &Reference, reason: Vec<u8>) -> Result<(), HostError> {
        self.transport
            .publish(Packet::SchedulingTerminate(SchedulingTerminate {
                target: target.clone(),
                reason,
            }))
            .await
    }

    async fn tick(&self) -> Tick {
        Tick::now(self.transport.wallclock().await)
    }
}

fn packet_kind(packet: &Packet) -> &'static str {
    match packet {
        Packet::Message(_) => "message",
        Packet::SupervisionRequest(_) => "supervision_request",
        Packet::SupervisionResponse(_) => "supervision_response",
        Packet::SchedulingCreate(_) => "scheduling_create",
        Packet::SchedulingTerminate(_) => "scheduling_terminate",
    }
}
