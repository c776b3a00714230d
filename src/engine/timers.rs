//! Keyed, cancellable delayed work.
//!
//! All three intentional suspension points of the engine run through here:
//! the reconnection grace window, the inter-hand re-deal delay, and the
//! automated-turn cascade (thinking delay and lock-contention retry). None
//! of them hold a session lock while suspended; the scheduled future
//! re-acquires it when it fires.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::AbortHandle;

use crate::domain::session::{ParticipantId, SessionId};

/// Identity of one pending timer; scheduling the same key again replaces
/// (cancels) the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Reconnection window for one disconnected participant.
    Grace {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    /// Fixed delay between `HandResolved` and the next deal.
    Redeal { session_id: SessionId },
    /// Next automated-turn step for a session.
    Cascade { session_id: SessionId },
}

impl TimerKey {
    fn session_id(&self) -> SessionId {
        match self {
            TimerKey::Grace { session_id, .. }
            | TimerKey::Redeal { session_id }
            | TimerKey::Cascade { session_id } => *session_id,
        }
    }
}

/// One registered timer. The generation ties a firing task back to the
/// entry it was scheduled under, so a stale firing cannot unregister a
/// replacement that took over the key in the meantime.
struct TimerEntry {
    generation: u64,
    abort: AbortHandle,
}

#[derive(Default)]
pub struct TimerRegistry {
    pending: DashMap<TimerKey, TimerEntry>,
    generation: AtomicU64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Run `work` after `delay`, replacing any pending timer with the same
    /// key. The entry is removed once the timer fires, before `work` runs,
    /// so work may re-schedule its own key.
    pub fn schedule<F>(self: &Arc<Self>, key: TimerKey, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            registry.clear_if_current(&key, generation);
            work.await;
        });
        let entry = TimerEntry {
            generation,
            abort: handle.abort_handle(),
        };
        if let Some(previous) = self.pending.insert(key, entry) {
            previous.abort.abort();
        }
    }

    /// Unregister `key` only if it still belongs to `generation`. A firing
    /// task can race a concurrent `schedule` of its own key; the loser must
    /// not delete the winner's entry.
    fn clear_if_current(&self, key: &TimerKey, generation: u64) {
        self.pending
            .remove_if(key, |_, entry| entry.generation == generation);
    }

    /// Cancel one pending timer; firing later is then impossible.
    pub fn cancel(&self, key: &TimerKey) -> bool {
        if let Some((_, entry)) = self.pending.remove(key) {
            entry.abort.abort();
            true
        } else {
            false
        }
    }

    /// Cancel everything scheduled for a session (teardown path).
    pub fn cancel_session(&self, session_id: SessionId) {
        let keys: Vec<TimerKey> = self
            .pending
            .iter()
            .map(|entry| *entry.key())
            .filter(|key| key.session_id() == session_id)
            .collect();
        for key in keys {
            self.cancel(&key);
        }
    }

    pub fn is_pending(&self, key: &TimerKey) -> bool {
        self.pending.contains_key(key)
    }
}
