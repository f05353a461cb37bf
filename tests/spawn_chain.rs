//! Scenario: an Executor spawns a child from inside `handle`, which spawns
//! a grandchild in turn. Verifies the resulting pool membership and
//! `Reference` parent/child chain (§8 scenario 4).

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use nexus_rt::{
    Behavior, BehaviorError, Effect, ExecutorCtx, Host, HostConfig, HostContext, HostError,
    Message, NoopMonitor, Packet, Reference, SchedulingCreate, SupervisionRequest,
};

/// On receiving a message whose payload names a child, spawns that child
/// with an empty stance. Otherwise a no-op echo.
struct SpawningBehavior;

#[async_trait]
impl Behavior for SpawningBehavior {
    type State = u32;

    async fn handle(
        &self,
        ctx: &ExecutorCtx<u32>,
        payload: Vec<u8>,
    ) -> Result<u32, BehaviorError> {
        if !payload.is_empty() {
            let name = String::from_utf8_lossy(&payload).into_owned();
            ctx.spawn(serde_json::to_vec(&0u32).unwrap(), &name)
                .await
                .map_err(|err| BehaviorError::new(err.to_string()))?;
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

struct LoopbackTransport {
    host: OnceCell<Arc<Host<SpawningBehavior>>>,
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
async fn spawn_chain_builds_a_three_generation_tree() {
    let transport = Arc::new(LoopbackTransport::new());
    let host = Host::new(
        Reference::host("host://local").unwrap(),
        transport.clone() as Arc<dyn HostContext>,
        HostConfig::default(),
        Arc::new(SpawningBehavior),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
    );
    transport.host.set(Arc::clone(&host)).ok();

    let root = Reference::process("proc://root").unwrap();
    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: root.clone(),
        stance: serde_json::to_vec(&0u32).unwrap(),
    }))
    .await
    .unwrap();
    settle().await;

    // root spawns "mid"
    host.receive(Packet::Message(Message {
        sender: root.clone(),
        receiver: root.clone(),
        payload: b"mid".to_vec(),
    }))
    .await
    .unwrap();
    settle().await;

    let mid = root.child("mid").unwrap();
    assert!(host.pool().has_process(&mid));

    // mid spawns "leaf"
    host.receive(Packet::Message(Message {
        sender: mid.clone(),
        receiver: mid.clone(),
        payload: b"leaf".to_vec(),
    }))
    .await
    .unwrap();
    settle().await;

    let leaf = mid.child("leaf").unwrap();
    assert!(host.pool().has_process(&leaf));

    assert_eq!(leaf.parent().unwrap(), mid);
    assert_eq!(mid.parent().unwrap(), root);
    assert!(root.owns(&leaf));
    assert!(!leaf.owns(&root));
}
