use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::session::Session;

/// Storage for interview sessions, keyed by session id
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Session>;
    fn put(&self, session: Session);
    /// Returns whether a session was removed
    fn delete(&self, id: &str) -> bool;
}

/// Process-local store. Entries are never evicted: finished interviews stay
/// until they are deleted explicitly or the process exits.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn put(&self, session: Session) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id.clone(), session);
    }

    fn delete(&self, id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let store = InMemorySessionStore::new();
        assert!(store.is_empty());

        let session = Session::new("Product Manager");
        let id = session.id.clone();
        store.put(session.clone());

        assert_eq!(store.get(&id), Some(session));
        assert_eq!(store.len(), 1);

        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn test_put_replaces_existing() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new("Product Manager");
        store.put(session.clone());

        session.turn_count = 3;
        store.put(session.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&session.id).map(|s| s.turn_count), Some(3));
    }

    #[test]
    fn test_finished_sessions_kept_until_deleted() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new("Product Manager");
        session.finished = true;
        store.put(session.clone());

        assert_eq!(store.get(&session.id).map(|s| s.finished), Some(true));
        assert_eq!(store.len(), 1);

        assert!(store.delete(&session.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_returns_a_copy() {
        let store = InMemorySessionStore::new();
        let session = Session::new("Product Manager");
        store.put(session.clone());

        let mut copy = store.get(&session.id).unwrap();
        copy.finished = true;
        assert!(!store.get(&session.id).unwrap().finished);
    }
}
