//! Supervisor Tree - Spawn Chain and Escalation
//!
//! Builds a small root -> worker -> task tree, drives one task to failure,
//! and shows the resulting `Effect::Resume` decision keep the tree intact.
//!
//! Run with: cargo run --example supervisor_tree

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nexus_rt::prelude::*;
use tokio::sync::OnceCell;

struct TreeBehavior;

#[async_trait]
impl Behavior for TreeBehavior {
    type State = u32;

    async fn handle(
        &self,
        ctx: &ExecutorCtx<u32>,
        payload: Vec<u8>,
    ) -> Result<u32, BehaviorError> {
        match payload.as_slice() {
            b"fail" => Err(BehaviorError::new("simulated task failure")),
            b"" => Ok(ctx.state() + 1),
            name => {
                let name = String::from_utf8_lossy(name).into_owned();
                ctx.spawn(serde_json::to_vec(&0u32).unwrap_or_default(), &name)
                    .await
                    .map_err(|err| BehaviorError::new(err.to_string()))?;
                Ok(ctx.state())
            }
        }
    }

    async fn supervise(
        &self,
        _ctx: &ExecutorCtx<u32>,
        request: &SupervisionRequest,
    ) -> Result<Effect, BehaviorError> {
        println!("   supervisor: resuming {} after failure", request.child);
        Ok(Effect::Resume)
    }
}

struct LoopbackTransport {
    host: OnceCell<Arc<Host<TreeBehavior>>>,
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Supervisor Tree ===\n");

    let transport = Arc::new(LoopbackTransport {
        host: OnceCell::new(),
    });
    let host = Host::new(
        Reference::host("host://local")?,
        transport.clone() as Arc<dyn HostContext>,
        HostConfig::default(),
        Arc::new(TreeBehavior),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
    );
    transport.host.set(Arc::clone(&host)).ok();

    let root = Reference::process("proc://root")?;
    println!("1. Spawning root...");
    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: root.clone(),
        stance: serde_json::to_vec(&0u32)?,
    }))
    .await?;
    settle().await;

    println!("2. root spawns worker...");
    host.receive(Packet::Message(Message {
        sender: root.clone(),
        receiver: root.clone(),
        payload: b"worker".to_vec(),
    }))
    .await?;
    settle().await;
    let worker = root.child("worker")?;

    println!("3. worker fails a task, supervisor resumes it...");
    host.receive(Packet::Message(Message {
        sender: worker.clone(),
        receiver: worker.clone(),
        payload: b"fail".to_vec(),
    }))
    .await?;
    settle().await;

    println!(
        "4. worker still alive in the pool: {}",
        host.pool().has_process(&worker)
    );
    println!("\n=== Example Complete ===");
    Ok(())
}
