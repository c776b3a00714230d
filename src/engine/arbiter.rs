//! Action arbitration and the automated-turn cascade.
//!
//! All mutations of a session are serialized by its handle's lock. Human
//! submissions that hit a held lock are rejected as `Busy` (recoverable by
//! retry); cascade steps are silently deferred and retried instead. The
//! broadcast for a mutation happens before any cascade step scheduled by
//! that mutation.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info, warn};

use super::protocol::ServerMsg;
use super::timers::TimerKey;
use super::Engine;
use crate::config::BlockedTurnPolicy;
use crate::domain::action::{Action, ActionMsg, EscalationResponse};
use crate::domain::phase::{apply_action, current_actor, deal_next_hand};
use crate::domain::session::{ConnStatus, Phase, SeatIx, Session, SessionId};
use crate::domain::snapshot::{ParticipantView, SessionSnapshot};
use crate::errors::GameError;

impl Engine {
    /// Arbitrate one human-submitted action.
    ///
    /// Fails with `Busy` instead of waiting when another mutation holds the
    /// session lock. On success the mutation has been applied, broadcast,
    /// and any follow-up work (re-deal timer, cascade step) scheduled.
    pub async fn submit_action(&self, msg: &ActionMsg) -> Result<(), GameError> {
        let handle = self.inner.sessions.get(msg.session_id)?;
        let mut state = handle
            .state
            .try_lock()
            .map_err(|_| GameError::busy("another mutation is in flight; retry"))?;
        let seat = state
            .seat_ix_of(msg.participant_id)
            .ok_or_else(|| GameError::participant_not_found(msg.participant_id))?;

        let transitions = apply_action(&mut state, seat, &msg.action, self.inner.evaluator.as_ref())?;
        info!(
            session_id = msg.session_id,
            participant_id = msg.participant_id,
            seat,
            action = ?msg.action.kind(),
            transitions = transitions.len(),
            "action applied"
        );
        self.broadcast(&state);
        self.after_mutation(&state);
        Ok(())
    }

    /// Push each connected human their redacted view of the current state.
    pub(super) fn broadcast(&self, session: &Session) {
        let snapshot = SessionSnapshot::of(session);
        for (ix, seat) in session.seats.iter().enumerate() {
            if seat.automated || !self.inner.connections.is_attached(seat.participant_id) {
                continue;
            }
            let view = ParticipantView::for_seat(session, snapshot.clone(), ix as SeatIx);
            self.inner
                .connections
                .send(seat.participant_id, ServerMsg::State { view: Box::new(view) });
        }
    }

    /// Post-mutation bookkeeping, called with the session lock still held.
    pub(super) fn after_mutation(&self, session: &Session) {
        match session.phase {
            Phase::GameEnded => {
                self.inner.timers.cancel(&TimerKey::Redeal {
                    session_id: session.id,
                });
                self.inner.timers.cancel(&TimerKey::Cascade {
                    session_id: session.id,
                });
                info!(
                    session_id = session.id,
                    winner_team = ?session.winner_team,
                    hands = session.hands_dealt,
                    "game ended"
                );
            }
            Phase::HandResolved => {
                let engine = self.clone();
                let session_id = session.id;
                self.inner.timers.schedule(
                    TimerKey::Redeal { session_id },
                    self.inner.config.redeal_delay,
                    async move {
                        engine.redeal_due(session_id).await;
                    },
                );
            }
            Phase::Acting | Phase::Escalating => self.schedule_cascade_if_needed(session),
            Phase::Waiting | Phase::Dealing => {}
        }
    }

    /// Schedule the next cascade step if the obligated actor will not act on
    /// their own: automated seats always, offline humans only under the
    /// `Substitute` policy.
    pub(super) fn schedule_cascade_if_needed(&self, session: &Session) {
        let Some(actor) = current_actor(session) else {
            return;
        };
        let Ok(seat) = session.seat(actor) else {
            return;
        };
        let offline_human = !seat.automated && seat.connection == ConnStatus::Offline;
        let eligible = seat.automated
            || (offline_human && session.config.blocked_policy == BlockedTurnPolicy::Substitute);
        if offline_human && session.config.blocked_policy == BlockedTurnPolicy::Stall {
            info!(
                session_id = session.id,
                seat = actor,
                "turn blocked; stalling until reconnection"
            );
        }
        if !eligible {
            return;
        }
        let delay = rand::rng().random_range(session.config.difficulty.thinking_delay_ms());
        self.spawn_cascade(session.id, Duration::from_millis(delay));
    }

    fn spawn_cascade(&self, session_id: SessionId, delay: Duration) {
        let engine = self.clone();
        self.inner.timers.schedule(
            TimerKey::Cascade { session_id },
            delay,
            async move {
                engine.cascade_step(session_id).await;
            },
        );
    }

    /// One automated turn. Re-validates everything against fresh state under
    /// the lock; a human action that interleaved since scheduling simply
    /// makes this a no-op.
    pub(super) async fn cascade_step(&self, session_id: SessionId) {
        let Ok(handle) = self.inner.sessions.get(session_id) else {
            return;
        };
        let Ok(mut state) = handle.state.try_lock() else {
            // Contended: defer quietly, never a Busy toward anyone.
            self.spawn_cascade(session_id, self.inner.config.cascade_retry_delay);
            return;
        };

        let Some(actor) = current_actor(&state) else {
            return;
        };
        let Ok(seat) = state.seat(actor) else {
            return;
        };
        let offline_human = !seat.automated && seat.connection == ConnStatus::Offline;
        if !(seat.automated
            || (offline_human && state.config.blocked_policy == BlockedTurnPolicy::Substitute))
        {
            debug!(session_id, seat = actor, "human's turn; cascade stops");
            return;
        }

        let snapshot = SessionSnapshot::of(&state);
        let view = ParticipantView::for_seat(&state, snapshot, actor);
        let action = match self.inner.policy.decide(&view) {
            Ok(Some(action)) => action,
            Ok(None) => {
                info!(session_id, seat = actor, "policy returned no move; seat blocked");
                return;
            }
            Err(err) => {
                warn!(
                    session_id,
                    seat = actor,
                    error = %err,
                    "decision policy failed; applying fallback"
                );
                fallback_action(&state)
            }
        };

        if apply_action(&mut state, actor, &action, self.inner.evaluator.as_ref()).is_err() {
            // The policy picked outside the legal set. The fallback is the
            // least committal legal action; if even that is rejected the
            // state machine and the legality sets disagree.
            let fallback = fallback_action(&state);
            warn!(
                session_id,
                seat = actor,
                action = ?action.kind(),
                fallback = ?fallback.kind(),
                "policy action rejected; applying fallback"
            );
            if let Err(err) =
                apply_action(&mut state, actor, &fallback, self.inner.evaluator.as_ref())
            {
                error!(session_id, seat = actor, error = %err, "fallback action rejected");
                return;
            }
        }
        debug!(session_id, seat = actor, phase = ?state.phase, "automated action applied");
        self.broadcast(&state);
        self.after_mutation(&state);
    }

    /// Inter-hand delay elapsed; deal the next hand if the session is still
    /// in `HandResolved` (destruction naturally supersedes this timer).
    pub(super) async fn redeal_due(&self, session_id: SessionId) {
        let Ok(handle) = self.inner.sessions.get(session_id) else {
            return;
        };
        let mut state = handle.state.lock().await;
        if state.phase != Phase::HandResolved {
            return;
        }
        match deal_next_hand(&mut state) {
            Ok(_) => {
                self.broadcast(&state);
                self.after_mutation(&state);
            }
            Err(err) => {
                error!(session_id, error = %err, "re-deal failed");
            }
        }
    }
}

/// The least committal legal action for the obligated actor: reject an open
/// ladder, otherwise concede the hand.
fn fallback_action(session: &Session) -> Action {
    if session.phase == Phase::Escalating {
        Action::Respond {
            response: EscalationResponse::Reject,
        }
    } else {
        Action::Forfeit
    }
}
