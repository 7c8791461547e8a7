//! Process-wide session registry.

use std::collections::{hash_map::Entry, HashMap};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::{
    error::SessionError,
    models::{session::Session, user::User},
    types::SessionId,
};

pub trait SessionStore: Send + Sync {
    /// Registers a new anonymous session under a fresh, unpredictable id.
    fn create(&self) -> SessionId;
    /// Snapshot of a live session; refreshes its last access time.
    fn get(&self, id: &SessionId) -> Option<Session>;
    /// Binds an identity to a live session, marking it logged in.
    fn attach_user(&self, id: &SessionId, user: User) -> Result<(), SessionError>;
    /// Removes a session. Unknown ids are not an error.
    fn invalidate(&self, id: &SessionId) -> Option<Session>;
    fn is_authenticated(&self, id: &SessionId) -> bool {
        self.get(id).is_some_and(|session| session.is_logged_in())
    }
    /// Drops idle sessions and returns how many were removed.
    fn purge_expired(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sessions kept in a `HashMap` behind a single reader/writer lock.
///
/// Lookups mutate the access time, so every per-id operation takes the write
/// lock; only `len` reads under the shared lock.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    idle_timeout: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn create_at(&self, now: DateTime<Utc>) -> SessionId {
        let mut sessions = self.sessions.write();
        loop {
            let id = SessionId::generate();
            if let Entry::Vacant(slot) = sessions.entry(id.clone()) {
                slot.insert(Session::new(id.clone(), now));
                tracing::debug!(session = %id.fingerprint(), "Session created");
                return id;
            }
        }
    }

    fn get_at(&self, id: &SessionId, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(id) {
            None => return None,
            Some(session) if !session.is_idle_expired(self.idle_timeout, now) => {
                session.last_access_time = now;
                return Some(session.clone());
            }
            Some(_) => {}
        }
        sessions.remove(id);
        tracing::debug!(session = %id.fingerprint(), "Session expired after idle timeout");
        None
    }

    fn attach_user_at(
        &self,
        id: &SessionId,
        user: User,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let expired = match sessions.get_mut(id) {
            Some(session) if !session.is_idle_expired(self.idle_timeout, now) => {
                session.user = Some(user);
                session.last_access_time = now;
                return Ok(());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(id);
        }
        Err(SessionError::UnknownSession(id.clone()))
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        Self::retain_live(&mut sessions, self.idle_timeout, now)
    }

    fn retain_live(
        sessions: &mut HashMap<SessionId, Session>,
        idle_timeout: Option<Duration>,
        now: DateTime<Utc>,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle_expired(idle_timeout, now));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Purged idle sessions");
        }
        removed
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self) -> SessionId {
        if self.idle_timeout.is_some() {
            self.purge_expired();
        }
        self.create_at(Utc::now())
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        self.get_at(id, Utc::now())
    }

    fn attach_user(&self, id: &SessionId, user: User) -> Result<(), SessionError> {
        self.attach_user_at(id, user, Utc::now())
    }

    fn invalidate(&self, id: &SessionId) -> Option<Session> {
        let removed = self.sessions.write().remove(id);
        if removed.is_some() {
            tracing::debug!(session = %id.fingerprint(), "Session invalidated");
        }
        removed
    }

    fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
