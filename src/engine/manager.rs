//! Session and connection lifecycle: create/join/leave, attach/disconnect,
//! and the reconnection grace window.
//!
//! Every operation here fails closed: an unknown session or full room yields
//! a typed error and no mutation, and partial joins are never observable
//! because the seat is pushed under the session lock.

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::connections::ConnId;
use super::protocol::ServerMsg;
use super::timers::TimerKey;
use super::Engine;
use crate::config::SessionConfig;
use crate::domain::phase::deal_next_hand;
use crate::domain::session::{
    ConnStatus, ParticipantId, Phase, Seat, SeatIx, Session, SessionId,
};
use crate::domain::snapshot::SessionSnapshot;
use crate::errors::GameError;

impl Engine {
    /// Create a session and seat its automated participants. Fully automated
    /// rooms start playing immediately.
    pub async fn create_session(&self, config: SessionConfig) -> Result<SessionId, GameError> {
        config.validate()?;
        let seed = match config.rng_seed {
            Some(seed) => seed,
            None => rand::random(),
        };
        let session_id = self.inner.sessions.allocate_session_id();
        let mut session = Session::new(session_id, config, seed);
        for ix in 0..session.config.automated_seats {
            let participant_id = self.inner.sessions.allocate_automated_id();
            let team = session.config.team_of(ix);
            session
                .seats
                .push(Seat::new(participant_id, format!("auto-{}", ix + 1), true, team));
        }
        info!(
            session_id,
            name = %session.config.name,
            capacity = session.config.capacity,
            automated = session.config.automated_seats,
            "session created"
        );

        let handle = self.inner.sessions.insert(session);
        let mut state = handle.state.lock().await;
        if state.is_full() {
            deal_next_hand(&mut state)?;
            self.after_mutation(&state);
        }
        Ok(session_id)
    }

    /// Seat a participant. The first join that fills the room deals the
    /// first hand before the lock is released.
    pub async fn join(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        display_name: impl Into<String>,
        credential: Option<&str>,
    ) -> Result<SeatIx, GameError> {
        let handle = self.inner.sessions.get(session_id)?;
        let mut state = handle.state.lock().await;

        if let Some(expected) = state.config.credential.as_deref() {
            if credential != Some(expected) {
                return Err(GameError::bad_credentials("session credential mismatch"));
            }
        }
        if state.is_full() {
            return Err(GameError::full(format!(
                "session {session_id} is at capacity {}",
                state.config.capacity
            )));
        }
        if state.seat_ix_of(participant_id).is_some() {
            return Err(GameError::illegal_action(format!(
                "participant {participant_id} is already seated"
            )));
        }

        let seat_ix = state.seat_count() as SeatIx;
        let team = state.config.team_of(seat_ix);
        state
            .seats
            .push(Seat::new(participant_id, display_name.into(), false, team));
        self.inner.sessions.add_member(participant_id, session_id);
        info!(session_id, participant_id, seat = seat_ix, "participant joined");

        if state.is_full() {
            deal_next_hand(&mut state)?;
            info!(session_id, "room full; first hand dealt");
        }
        self.broadcast(&state);
        self.after_mutation(&state);
        Ok(seat_ix)
    }

    /// Explicit, immediate departure: no grace period, then the same
    /// survival evaluation as the grace-expiry path.
    pub async fn leave(&self, participant_id: ParticipantId) -> Result<(), GameError> {
        let session_id = self.inner.sessions.session_of(participant_id)?;
        let handle = self.inner.sessions.get(session_id)?;
        let mut state = handle.state.lock().await;
        let seat_ix = state
            .seat_ix_of(participant_id)
            .ok_or_else(|| GameError::participant_not_found(participant_id))?;

        self.inner.timers.cancel(&TimerKey::Grace {
            session_id,
            participant_id,
        });
        self.inner.sessions.remove_member(participant_id);
        self.inner.connections.remove_participant(participant_id);

        if state.phase == Phase::Waiting {
            state.reclaim_seat(seat_ix);
        } else {
            state.seat_mut(seat_ix)?.connection = ConnStatus::Offline;
        }
        info!(session_id, participant_id, "participant left");

        if !self.evaluate_survival(&state, "not enough participants remain") {
            self.broadcast(&state);
            self.schedule_cascade_if_needed(&state);
        }
        Ok(())
    }

    /// Register (or replace) the live transport for a participant. Cancels a
    /// pending grace timer, marks the seat online, and pushes fresh state to
    /// everyone.
    pub async fn attach_connection(
        &self,
        participant_id: ParticipantId,
        sender: mpsc::UnboundedSender<ServerMsg>,
    ) -> Result<ConnId, GameError> {
        let session_id = self.inner.sessions.session_of(participant_id)?;
        let handle = self.inner.sessions.get(session_id)?;
        let mut state = handle.state.lock().await;
        let seat_ix = state
            .seat_ix_of(participant_id)
            .ok_or_else(|| GameError::participant_not_found(participant_id))?;

        let conn_id = self.inner.connections.attach(participant_id, sender);
        let was_pending = self.inner.timers.cancel(&TimerKey::Grace {
            session_id,
            participant_id,
        });
        state.seat_mut(seat_ix)?.connection = ConnStatus::Online;
        if was_pending {
            info!(session_id, participant_id, "reconnected within grace period");
        } else {
            info!(session_id, participant_id, "connection attached");
        }
        self.broadcast(&state);
        self.schedule_cascade_if_needed(&state);
        Ok(conn_id)
    }

    /// Transport-close handler. Superseded handles are a no-op; otherwise
    /// the participant goes idle and the grace timer starts.
    pub async fn on_disconnect(&self, conn_id: ConnId) {
        let Some(participant_id) = self.inner.connections.detach(conn_id) else {
            return;
        };
        let Ok(session_id) = self.inner.sessions.session_of(participant_id) else {
            return;
        };
        let Ok(handle) = self.inner.sessions.get(session_id) else {
            return;
        };
        let mut state = handle.state.lock().await;
        let Some(seat_ix) = state.seat_ix_of(participant_id) else {
            return;
        };
        if state.seats[usize::from(seat_ix)].automated {
            return;
        }
        state.seats[usize::from(seat_ix)].connection = ConnStatus::Idle;
        info!(session_id, participant_id, "disconnected; grace timer started");

        let engine = self.clone();
        self.inner.timers.schedule(
            TimerKey::Grace {
                session_id,
                participant_id,
            },
            self.inner.config.grace_period,
            async move {
                engine.grace_expired(session_id, participant_id).await;
            },
        );
        self.broadcast(&state);
    }

    /// Public redacted state, for reconnection and observability.
    pub async fn snapshot(&self, session_id: SessionId) -> Result<SessionSnapshot, GameError> {
        let handle = self.inner.sessions.get(session_id)?;
        let state = handle.state.lock().await;
        Ok(SessionSnapshot::of(&state))
    }

    pub(super) async fn grace_expired(&self, session_id: SessionId, participant_id: ParticipantId) {
        let Ok(handle) = self.inner.sessions.get(session_id) else {
            return;
        };
        let mut state = handle.state.lock().await;
        let Some(seat_ix) = state.seat_ix_of(participant_id) else {
            return;
        };
        // Lost the race against a reconnect that already holds a live
        // connection; the seat stays as the reconnect left it.
        if self.inner.connections.is_attached(participant_id) {
            return;
        }
        if state.phase == Phase::Waiting {
            // In the lobby an expired seat is reclaimed like an explicit
            // leave; it must not keep counting toward the room filling up.
            state.reclaim_seat(seat_ix);
            self.inner.sessions.remove_member(participant_id);
            self.inner.connections.remove_participant(participant_id);
        } else {
            state.seats[usize::from(seat_ix)].connection = ConnStatus::Offline;
        }
        warn!(session_id, participant_id, "grace period expired");

        if !self.evaluate_survival(&state, "not enough participants remain") {
            self.broadcast(&state);
            self.schedule_cascade_if_needed(&state);
        }
    }

    /// Destroy the session if it can no longer be played. Returns whether it
    /// was destroyed.
    ///
    /// A `Waiting` room survives down to one occupant (the creator may be
    /// alone while others join); once a hand has been dealt, fewer than two
    /// active seats ends the session.
    pub(super) fn evaluate_survival(&self, session: &Session, reason: &str) -> bool {
        let active = session.active_count();
        let doomed = active == 0 || (session.phase != Phase::Waiting && active <= 1);
        if doomed {
            self.destroy_locked(session, reason);
        }
        doomed
    }

    /// Tear down a session whose lock the caller holds.
    pub(super) fn destroy_locked(&self, session: &Session, reason: &str) {
        self.inner.timers.cancel_session(session.id);
        self.inner.sessions.remove(session.id);
        for seat in &session.seats {
            self.inner.sessions.remove_member(seat.participant_id);
            if !seat.automated {
                self.inner.connections.send(
                    seat.participant_id,
                    ServerMsg::SessionClosed {
                        reason: reason.to_string(),
                    },
                );
            }
            self.inner.connections.remove_participant(seat.participant_id);
        }
        info!(session_id = session.id, reason, "session destroyed");
    }
}
