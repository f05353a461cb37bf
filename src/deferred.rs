//! Single-shot promise used to rendezvous a `SupervisionRequest` with its
//! eventual `SupervisionResponse` (§4.3).
//!
//! Built on [`tokio::sync::oneshot`], wrapped so a second `resolve`/`reject`
//! is reported as an [`InvariantError`] instead of silently dropped — the
//! stock channel just discards the value on a second send.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tokio::sync::oneshot;
use tokio::sync::Mutex;

// Layer 3: Internal module imports
use crate::error::InvariantError;

/// A value that will become available exactly once.
pub struct Deferred<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
    receiver: Mutex<Option<oneshot::Receiver<T>>>,
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
        }
    }

    /// Resolve this deferred with `value`. Errors if already resolved.
    pub async fn resolve(&self, value: T) -> Result<(), InvariantError> {
        let mut guard = self.sender.lock().await;
        match guard.take() {
            Some(tx) => {
                // A dropped receiver just means nobody is awaiting the
                // result anymore; that is not an invariant violation.
                let _ = tx.send(value);
                Ok(())
            }
            None => Err(InvariantError::deferred("deferred resolved more than once")),
        }
    }

    /// Await the resolved value. Takes the receiver on first call; errors
    /// if called more than once on the same `Deferred`.
    pub async fn await_value(&self) -> Result<T, InvariantError> {
        let mut guard = self.receiver.lock().await;
        let rx = guard
            .take()
            .ok_or_else(|| InvariantError::deferred("deferred awaited more than once"))?;
        drop(guard);
        rx.await
            .map_err(|_| InvariantError::deferred("deferred dropped without being resolved"))
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}
