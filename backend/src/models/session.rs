//! Server-side session state.

use chrono::{DateTime, Duration, Utc};

use crate::{models::user::User, types::SessionId};

#[derive(Debug, Clone)]
/// One browser context. Owned exclusively by the session store; callers get
/// snapshots.
pub struct Session {
    pub id: SessionId,
    /// Identity bound at login; `None` for anonymous sessions.
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub last_access_time: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user: None,
            created_at: now,
            last_access_time: now,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_idle_expired(&self, idle_timeout: Option<Duration>, now: DateTime<Utc>) -> bool {
        idle_timeout
            .map(|timeout| now - self.last_access_time > timeout)
            .unwrap_or(false)
    }
}
