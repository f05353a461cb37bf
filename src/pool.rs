//! `ExecutorPool`: the Host-local index from `Reference` to Executor, plus
//! pending cross-Host supervision deferrals (§4.5).
//!
//! A `DashMap` keyed by canonical URL string, not by `Reference` itself —
//! sharded locking means two unrelated processes never contend on the same
//! bucket, which matters here since every inbound packet touches the pool.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
use crate::deferred::Deferred;
use crate::error::InvariantError;
use crate::executor::ExecutorHandle;
use crate::packet::SupervisionResponse;
use crate::reference::Reference;
use crate::util::ids::SupervisionId;

/// One Executor's pool-local bookkeeping: its handle plus any supervision
/// requests it has raised that are still awaiting a response.
struct PoolEntry {
    executor: Arc<dyn ExecutorHandle>,
    pending_supervision_requests: HashMap<SupervisionId, Arc<Deferred<SupervisionResponse>>>,
}

/// Host-local `Reference -> Executor` index.
///
/// Mutated only by `Host` — Executors never touch it directly, they reach
/// the pool's effects only through `ExecutorContext`.
pub struct ExecutorPool {
    entries: DashMap<String, PoolEntry>,
}

impl ExecutorPool {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn has_process(&self, reference: &Reference) -> bool {
        self.entries.contains_key(reference.canonical())
    }

    /// Number of currently-registered local processes. Used by `Host` to
    /// enforce `HostConfig::max_processes`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch the handle for `reference`. Invariant error if not present.
    pub fn get_executor(
        &self,
        reference: &Reference,
    ) -> Result<Arc<dyn ExecutorHandle>, InvariantError> {
        self.entries
            .get(reference.canonical())
            .map(|entry| entry.executor.clone())
            .ok_or_else(|| {
                InvariantError::pool(format!("no executor registered for {reference}"))
            })
    }

    /// Register a freshly constructed Executor. Invariant error on double
    /// insert — `SchedulingCreate` must only ever be delivered once per
    /// child Reference.
    pub fn insert_process(
        &self,
        reference: &Reference,
        executor: Arc<dyn ExecutorHandle>,
    ) -> Result<(), InvariantError> {
        if self.entries.contains_key(reference.canonical()) {
            return Err(InvariantError::pool(format!(
                "process already registered: {reference}"
            )));
        }
        self.entries.insert(
            reference.canonical().to_string(),
            PoolEntry {
                executor,
                pending_supervision_requests: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Remove `reference` from the pool. Any supervision deferrals this
    /// process had raised and was still waiting on are dropped along with
    /// it — they will never resolve, and a dropped `Deferred::await_value`
    /// surfaces that to whoever was awaiting it rather than hanging forever.
    pub fn delete_process(&self, reference: &Reference) -> Result<(), InvariantError> {
        self.entries
            .remove(reference.canonical())
            .map(|_| ())
            .ok_or_else(|| {
                InvariantError::pool(format!("no executor registered for {reference}"))
            })
    }

    /// Register a fresh deferred against `request_child`'s pool entry,
    /// keyed by `id`. Invariant error if the child is unknown or `id` is
    /// already registered.
    pub fn insert_deferred_supervision_request(
        &self,
        request_child: &Reference,
        id: SupervisionId,
        deferred: Arc<Deferred<SupervisionResponse>>,
    ) -> Result<(), InvariantError> {
        let mut entry = self.entries.get_mut(request_child.canonical()).ok_or_else(|| {
            InvariantError::pool(format!("no executor registered for {request_child}"))
        })?;
        if entry.pending_supervision_requests.contains_key(&id) {
            return Err(InvariantError::pool(format!(
                "supervision request {id} already registered"
            )));
        }
        entry.pending_supervision_requests.insert(id, deferred);
        Ok(())
    }

    /// Resolve the deferred registered for `response.child`/`response.id`.
    /// Invariant error if the child or the id is unknown.
    pub async fn resolve_deferred_supervision_request(
        &self,
        response: SupervisionResponse,
    ) -> Result<(), InvariantError> {
        let deferred = {
            let mut entry = self
                .entries
                .get_mut(response.child.canonical())
                .ok_or_else(|| {
                    InvariantError::pool(format!("no executor registered for {}", response.child))
                })?;
            entry
                .pending_supervision_requests
                .remove(&response.id)
                .ok_or_else(|| {
                    InvariantError::pool(format!(
                        "no pending supervision request {} for {}",
                        response.id, response.child
                    ))
                })?
        };
        deferred.resolve(response).await
    }
}

impl Default for ExecutorPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorState;
    use crate::packet::{Effect, Message, SupervisionRequest};
    use async_trait::async_trait;

    struct StubHandle {
        self_ref: Reference,
    }

    #[async_trait]
    impl ExecutorHandle for StubHandle {
        fn self_ref(&self) -> &Reference {
            &self.self_ref
        }

        fn state(&self) -> ExecutorState {
            ExecutorState::Sleeping
        }

        fn queue_depth(&self) -> usize {
            0
        }

        async fn push_message(&self, _message: Message) -> Result<(), InvariantError> {
            Ok(())
        }

        async fn push_supervision_request(
            &self,
            _request: SupervisionRequest,
        ) -> Result<(), InvariantError> {
            Ok(())
        }

        fn wake(&self) {}

        fn kill(&self, _reason: Vec<u8>) {}
    }

    fn handle(reference: &Reference) -> Arc<dyn ExecutorHandle> {
        Arc::new(StubHandle {
            self_ref: reference.clone(),
        })
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let pool = ExecutorPool::new();
        let r = Reference::process("proc://a").unwrap();
        pool.insert_process(&r, handle(&r)).unwrap();
        assert!(pool.has_process(&r));
        assert!(pool.get_executor(&r).is_ok());
    }

    #[test]
    fn double_insert_is_an_invariant_error() {
        let pool = ExecutorPool::new();
        let r = Reference::process("proc://a").unwrap();
        pool.insert_process(&r, handle(&r)).unwrap();
        assert!(pool.insert_process(&r, handle(&r)).is_err());
    }

    #[test]
    fn get_unknown_process_is_an_invariant_error() {
        let pool = ExecutorPool::new();
        let r = Reference::process("proc://ghost").unwrap();
        assert!(pool.get_executor(&r).is_err());
    }

    #[test]
    fn delete_unknown_process_is_an_invariant_error() {
        let pool = ExecutorPool::new();
        let r = Reference::process("proc://ghost").unwrap();
        assert!(pool.delete_process(&r).is_err());
    }

    #[test]
    fn delete_removes_the_process() {
        let pool = ExecutorPool::new();
        let r = Reference::process("proc://a").unwrap();
        pool.insert_process(&r, handle(&r)).unwrap();
        pool.delete_process(&r).unwrap();
        assert!(!pool.has_process(&r));
    }

    #[tokio::test]
    async fn deferred_roundtrips_through_resolve() {
        let pool = ExecutorPool::new();
        let child = Reference::process("proc://a/x").unwrap();
        pool.insert_process(&child, handle(&child)).unwrap();

        let id = SupervisionId::new();
        let deferred = Arc::new(Deferred::<SupervisionResponse>::new());
        pool.insert_deferred_supervision_request(&child, id, deferred.clone())
            .unwrap();

        let response = SupervisionResponse {
            id,
            child: child.clone(),
            effect: Effect::Resume,
        };
        pool.resolve_deferred_supervision_request(response)
            .await
            .unwrap();

        assert_eq!(deferred.await_value().await.unwrap().effect, Effect::Resume);
    }

    #[test]
    fn double_registered_supervision_id_is_an_invariant_error() {
        let pool = ExecutorPool::new();
        let child = Reference::process("proc://a/x").unwrap();
        pool.insert_process(&child, handle(&child)).unwrap();

        let id = SupervisionId::new();
        pool.insert_deferred_supervision_request(
            &child,
            id,
            Arc::new(Deferred::<SupervisionResponse>::new()),
        )
        .unwrap();
        assert!(pool
            .insert_deferred_supervision_request(
                &child,
                id,
                Arc::new(Deferred::<SupervisionResponse>::new())
            )
            .is_err());
    }

    #[tokio::test]
    async fn resolve_unknown_supervision_id_is_an_invariant_error() {
        let pool = ExecutorPool::new();
        let child = Reference::process("proc://a/x").unwrap();
        pool.insert_process(&child, handle(&child)).unwrap();

        let response = SupervisionResponse {
            id: SupervisionId::new(),
            child: child.clone(),
            effect: Effect::Resume,
        };
        assert!(pool
            .resolve_deferred_supervision_request(response)
            .await
            .is_err());
    }

    #[test]
    fn delete_drops_pending_deferrals_without_resolving_them() {
        let pool = ExecutorPool::new();
        let child = Reference::process("proc://a/x").unwrap();
        pool.insert_process(&child, handle(&child)).unwrap();

        let id = SupervisionId::new();
        pool.insert_deferred_supervision_request(
            &child,
            id,
            Arc::new(Deferred::<SupervisionResponse>::new()),
        )
        .unwrap();

        pool.delete_process(&child).unwrap();
        assert!(!pool.has_process(&child));
    }
}
