//! Concurrent map of active sessions.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;
use vigil_utils::locks::SyncRwLock;

use super::Session;

/// Errors from session bookkeeping.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session with this id is already registered.
    #[error("session {0} is already registered")]
    Duplicate(Uuid),
    /// No session with this id is registered.
    #[error("no session with id {0}")]
    Unknown(Uuid),
}

/// Active sessions, keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: SyncRwLock<FxHashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session.
    pub fn insert(&self, session: Arc<Session>) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let id = session.id();
        if sessions.contains_key(&id) {
            return Err(SessionError::Duplicate(id));
        }
        sessions.insert(id, session);
        Ok(())
    }

    /// Unregisters a session and closes it.
    pub fn remove(&self, id: Uuid) -> Result<Arc<Session>, SessionError> {
        let session = self
            .sessions
            .write()
            .remove(&id)
            .ok_or(SessionError::Unknown(id))?;
        session.close();
        Ok(session)
    }

    /// Looks up a session.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().get(&id).cloned()
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// A point-in-time copy of every registered session.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use vigil_protocol::ClientboundPacket;

    use super::*;
    use crate::config::VigilConfig;
    use crate::handler::{ClientConnection, NopHandler};
    use crate::player::state::PlayerState;

    struct Discard;

    impl ClientConnection for Discard {
        fn write_packet(&self, _pk: ClientboundPacket) {}
        fn disconnect(&self, _message: &str) {}
    }

    fn session() -> Arc<Session> {
        Arc::new(Session::new(
            PlayerState::default(),
            Arc::new(VigilConfig::default()),
            Arc::new(NopHandler),
            Arc::new(Discard),
        ))
    }

    #[test]
    fn duplicate_and_unknown_ids_are_rejected() {
        let registry = SessionRegistry::new();
        let session = session();
        let id = session.id();
        registry.insert(session.clone()).expect("first insert");
        assert!(matches!(
            registry.insert(session),
            Err(SessionError::Duplicate(dup)) if dup == id
        ));
        assert_eq!(registry.len(), 1);

        let removed = registry.remove(id).expect("registered");
        assert!(removed.is_closed());
        assert!(matches!(registry.remove(id), Err(SessionError::Unknown(_))));
        assert!(registry.is_empty());
        assert!(registry.get(id).is_none());
    }
}
