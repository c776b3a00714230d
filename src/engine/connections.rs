//! Live connection tracking with supersede semantics.
//!
//! A participant has at most one live connection. Attaching a new one marks
//! the previous connection superseded and tells it to close; the superseded
//! connection's eventual close event maps to no participant and is ignored.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::session::ParticipantId;
use crate::engine::protocol::ServerMsg;

/// Opaque handle identifying one transport connection.
pub type ConnId = Uuid;

struct ConnectionSlot {
    conn_id: ConnId,
    sender: mpsc::UnboundedSender<ServerMsg>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    live: DashMap<ParticipantId, ConnectionSlot>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            live: DashMap::new(),
        }
    }

    /// Register (or replace) the live connection for a participant.
    pub fn attach(
        &self,
        participant_id: ParticipantId,
        sender: mpsc::UnboundedSender<ServerMsg>,
    ) -> ConnId {
        let conn_id = Uuid::new_v4();
        if let Some(previous) = self.live.insert(participant_id, ConnectionSlot { conn_id, sender })
        {
            let _ = previous.sender.send(ServerMsg::Superseded);
        }
        conn_id
    }

    /// Drop a closing connection. Returns the participant it spoke for, or
    /// `None` if the handle was already superseded (callers must treat that
    /// as a no-op).
    pub fn detach(&self, conn_id: ConnId) -> Option<ParticipantId> {
        let owner = self
            .live
            .iter()
            .find(|entry| entry.value().conn_id == conn_id)
            .map(|entry| *entry.key())?;
        self.live
            .remove_if(&owner, |_, slot| slot.conn_id == conn_id)
            .map(|_| owner)
    }

    /// Whether a participant currently has a live connection.
    pub fn is_attached(&self, participant_id: ParticipantId) -> bool {
        self.live.contains_key(&participant_id)
    }

    /// Push a message to a participant's live connection, if any.
    pub fn send(&self, participant_id: ParticipantId, msg: ServerMsg) {
        if let Some(slot) = self.live.get(&participant_id) {
            // A full/closed channel is indistinguishable from a racing
            // disconnect; the close event will clean up.
            let _ = slot.sender.send(msg);
        }
    }

    /// Forget a participant entirely (leave/eviction/session teardown).
    pub fn remove_participant(&self, participant_id: ParticipantId) {
        self.live.remove(&participant_id);
    }
}
