//! Scenario: a child's `handle` fails, its parent's `supervise` strategy
//! decides `Effect::Resume`, and the child goes on taking messages
//! afterwards (§8 scenario 2).

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use nexus_rt::{
    Behavior, BehaviorError, Effect, ExecutorCtx, ExecutorHandle, ExecutorState, Host, HostConfig,
    HostContext, HostError, Message, NoopMonitor, Packet, Reference, SchedulingCreate,
    SupervisionRequest,
};

/// One failure, then back to normal — models a child that raises exactly
/// once before its parent resumes it.
struct FlakyBehavior;

#[async_trait]
impl Behavior for FlakyBehavior {
    type State = u32;

    async fn handle(
        &self,
        ctx: &ExecutorCtx<u32>,
        payload: Vec<u8>,
    ) -> Result<u32, BehaviorError> {
        if payload == b"fail" {
            return Err(BehaviorError::new("transient glitch"));
        }
        Ok(ctx.state() + 1)
    }

    async fn supervise(
        &self,
        _ctx: &ExecutorCtx<u32>,
        _request: &SupervisionRequest,
    ) -> Result<Effect, BehaviorError> {
        Ok(Effect::Resume)
    }
}

/// Every published packet loops straight back into the same Host — stands
/// in for a transport where every Reference happens to be local.
struct LoopbackTransport {
    host: OnceCell<Arc<Host<FlakyBehavior>>>,
}

impl LoopbackTransport {
    fn new() -> Self {
        Self {
            host: OnceCell::new(),
        }
    }
}

#[async_trait]
impl HostContext for LoopbackTransport {
    async fn wallclock(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn publish(&self, packet: Packet) -> Result<(), HostError> {
        if let Some(host) = self.host.get() {
            let host = Arc::clone(host);
            tokio::spawn(async move {
                let _ = host.receive(packet).await;
            });
        }
        Ok(())
    }

    async fn acquire(&self, _reference: &Reference) -> Result<(), HostError> {
        Ok(())
    }

    async fn release(&self, _reference: &Reference) -> Result<(), HostError> {
        Ok(())
    }
}

async fn settle() {
    for _ in 0..40 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn supervision_resume_keeps_the_child_alive() {
    let transport = Arc::new(LoopbackTransport::new());
    let host = Host::new(
        Reference::host("host://local").unwrap(),
        transport.clone() as Arc<dyn HostContext>,
        HostConfig::default(),
        Arc::new(FlakyBehavior),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
    );
    transport.host.set(Arc::clone(&host)).ok();

    let parent = Reference::process("proc://parent").unwrap();
    let child = parent.child("child").unwrap();

    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: parent.clone(),
        stance: serde_json::to_vec(&0u32).unwrap(),
    }))
    .await
    .unwrap();
    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: child.clone(),
        stance: serde_json::to_vec(&0u32).unwrap(),
    }))
    .await
    .unwrap();
    settle().await;

    host.receive(Packet::Message(Message {
        sender: child.clone(),
        receiver: child.clone(),
        payload: b"fail".to_vec(),
    }))
    .await
    .unwrap();
    settle().await;

    // Resumed, not terminated, and still reachable in the pool.
    assert!(host.pool().has_process(&child));
    let executor = host.pool().get_executor(&child).unwrap();
    assert_eq!(executor.state(), ExecutorState::Sleeping);

    host.receive(Packet::Message(Message {
        sender: child.clone(),
        receiver: child.clone(),
        payload: vec![],
    }))
    .await
    .unwrap();
    settle().await;
    assert_eq!(executor.state(), ExecutorState::Sleeping);
}
