//! Session registry: id allocation and the per-session mutation lock.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::session::{ParticipantId, Session, SessionId};
use crate::errors::GameError;

/// One registered session behind its mutation lock.
///
/// The lock is the serialization point for every mutation of the contained
/// [`Session`]; nothing reads or writes the state without holding it.
pub struct SessionHandle {
    pub id: SessionId,
    pub state: Mutex<Session>,
}

/// Process-wide session table plus participant-to-session membership.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<SessionHandle>>,
    /// Which session a participant is seated in; used to route connection
    /// events that only carry a participant id.
    members: DashMap<ParticipantId, SessionId>,
    next_session_id: AtomicI64,
    /// Automated participants get negative ids so they can never collide
    /// with transport-issued ones.
    next_automated_id: AtomicI64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            members: DashMap::new(),
            next_session_id: AtomicI64::new(1),
            next_automated_id: AtomicI64::new(-1),
        }
    }

    pub fn allocate_session_id(&self) -> SessionId {
        self.next_session_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn allocate_automated_id(&self) -> ParticipantId {
        self.next_automated_id.fetch_sub(1, Ordering::Relaxed)
    }

    pub fn insert(&self, session: Session) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle {
            id: session.id,
            state: Mutex::new(session),
        });
        self.sessions.insert(handle.id, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, id: SessionId) -> Result<Arc<SessionHandle>, GameError> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| GameError::session_not_found(id))
    }

    pub fn remove(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.remove(&id).map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn add_member(&self, participant_id: ParticipantId, session_id: SessionId) {
        self.members.insert(participant_id, session_id);
    }

    pub fn remove_member(&self, participant_id: ParticipantId) {
        self.members.remove(&participant_id);
    }

    pub fn session_of(&self, participant_id: ParticipantId) -> Result<SessionId, GameError> {
        self.members
            .get(&participant_id)
            .map(|entry| *entry.value())
            .ok_or_else(|| GameError::participant_not_found(participant_id))
    }
}
