// ── Deferred poll timer ──
//
// A poll loop reschedules itself after each round trip. `PollTimer` holds
// at most one pending invocation: scheduling again or cancelling drops the
// previous one. Once a timer fires it is no longer pending, so cancelling
// never interrupts a request already in flight.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::trace;

#[derive(Debug, Default)]
struct Slot {
    /// Bumped on every schedule/cancel; a fired timer runs only if it still matches.
    generation: u64,
    pending: Option<AbortHandle>,
}

/// Single-slot cancellable timer on the tokio clock.
#[derive(Debug, Clone, Default)]
pub struct PollTimer {
    slot: Arc<Mutex<Slot>>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any pending invocation.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        if let Some(previous) = slot.pending.take() {
            previous.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let shared = Arc::clone(&self.slot);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = lock(&shared);
                if slot.generation != generation {
                    return;
                }
                slot.pending = None;
            }
            trace!(generation, "poll timer fired");
            task.await;
        });
        slot.pending = Some(handle.abort_handle());
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).pending.is_some()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
