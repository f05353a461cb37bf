//! Getting Started - Your First Process
//!
//! Spawns a single counter process on an in-process `Host`, sends it a
//! handful of messages, and prints the observed state after each one.
//!
//! Run with: cargo run --example getting_started

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nexus_rt::prelude::*;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
enum CounterOp {
    Increment,
    Decrement,
}

struct CounterBehavior {
    log: Mutex<Vec<i64>>,
}

#[async_trait]
impl Behavior for CounterBehavior {
    type State = i64;

    async fn handle(
        &self,
        ctx: &ExecutorCtx<i64>,
        payload: Vec<u8>,
    ) -> Result<i64, BehaviorError> {
        let op = match payload.first() {
            Some(0) => CounterOp::Increment,
            Some(1) => CounterOp::Decrement,
            _ => return Err(BehaviorError::new("unknown opcode")),
        };
        let next = match op {
            CounterOp::Increment => ctx.state() + 1,
            CounterOp::Decrement => ctx.state() - 1,
        };
        self.log.lock().push(next);
        Ok(next)
    }

    async fn supervise(
        &self,
        _ctx: &ExecutorCtx<i64>,
        _request: &SupervisionRequest,
    ) -> Result<Effect, BehaviorError> {
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Getting Started ===\n");

    let counter = Arc::new(CounterBehavior {
        log: Mutex::new(Vec::new()),
    });
    let host = Host::new(
        Reference::host("host://local")?,
        Arc::new(NoopTransport) as Arc<dyn HostContext>,
        HostConfig::default(),
        Arc::clone(&counter),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
        Arc::new(NoopMonitor::new()),
    );

    let counter_ref = Reference::process("proc://counter")?;
    println!("1. Spawning {counter_ref}...");
    host.receive(Packet::SchedulingCreate(SchedulingCreate {
        child: counter_ref.clone(),
        stance: serde_json::to_vec(&0i64)?,
    }))
    .await?;
    tokio::task::yield_now().await;

    println!("2. Sending a few messages...");
    for op in [0u8, 0, 1, 0] {
        host.receive(Packet::Message(Message {
            sender: counter_ref.clone(),
            receiver: counter_ref.clone(),
            payload: vec![op],
        }))
        .await?;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    println!("3. Observed state after each message: {:?}", counter.log.lock());
    println!("\n=== Example Complete ===");
    Ok(())
}
