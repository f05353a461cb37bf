//! Scenario: a message and a supervision request are both queued on an
//! Executor between two resume steps. The resume loop must drain the
//! supervision request first (§8 scenario 5, §5 ordering law).

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use nexus_rt::{
    Behavior, BehaviorError, Effect, ExecutorCtx, ExecutorHandle, Host, HostConfig, HostContext,
    HostError, Message, NoopMonitor, Packet, Reference, SchedulingCreate, SupervisionId,
    SupervisionRequest,
};

/// Appends a marker to a shared log from whichever callback fires —
/// `handle` for an ordinary message, `supervise` for an escalation.
struct RecordingBehavior {
    log: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl Behavior for RecordingBehavior {
    type State = u32;

    async fn handle(
        &self,
        ctx: &ExecutorCtx<u32>,
        _payload: Vec<u8>,
    ) -> Result<u32, BehaviorError> {
        self.log.lock().push("message");
        Ok(ctx.state() + 1)
    }

    async fn supervise(
        &self,
        _ctx: &ExecutorCtx<u32>,
        _request: &SupervisionRequest,
    ) -> Result<Effect, BehaviorError> {
        self.log.lock().push("supervision");
        Ok(Effect::Resume)
    }
}

struct NoopTransport;

#[async_trait]
impl HostContext for NoopTransport {
    async fn wallclock(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn publish(&self, _packet: Packet) -> Result<(), HostError> {
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
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn supervision_request_is_drained_before_a_pending_message() {
    let behavior = Arc::new(RecordingBehavior {
        log: Mutex::new(Vec::new()),
    });
    let host = Host::new(
        Reference::host("host://local").unwrap(),
        Arc::new(NoopTransport) as Arc<dyn HostContext>,
        HostConfig::default(),
        Arc::clone(&behavior),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
    );

    let proc_ref = Reference::process("proc://arbitration").unwrap();
    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: proc_ref.clone(),
        stance: serde_json::to_vec(&0u32).unwrap(),
    }))
    .await
    .unwrap();
    settle().await;

    let executor = host.pool().get_executor(&proc_ref).unwrap();

    // Enqueue the message first, the supervision request second — the
    // drain order must still put supervision ahead of it.
    executor
        .push_message(Message {
            sender: proc_ref.clone(),
            receiver: proc_ref.clone(),
            payload: vec![],
        })
        .await
        .unwrap();
    executor
        .push_supervision_request(SupervisionRequest {
            id: SupervisionId::new(),
            child: proc_ref.child("x").unwrap(),
            reason: vec![],
        })
        .await
        .unwrap();
    executor.wake();
    settle().await;

    assert_eq!(*behavior.log.lock(), vec!["supervision", "message"]);
}
