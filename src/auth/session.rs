use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

/// The authenticated identity bound to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    principal: Principal,
    expires_at: OffsetDateTime,
}

/// In-process session store: opaque token -> principal, with a TTL.
///
/// Sessions only ever move Anonymous -> Authenticated (on `open`) and back
/// (on `close` or expiry). Closing an unknown or already-closed token is a
/// no-op.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Establish a session for a user and return its bearer token.
    pub fn open(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            principal: Principal { user_id },
            expires_at: OffsetDateTime::now_utc() + self.ttl,
        };
        self.inner
            .write()
            .expect("session store lock poisoned")
            .insert(token.clone(), entry);
        debug!(%user_id, "session opened");
        token
    }

    /// Resolve a token to its principal. Expired entries are dropped here
    /// rather than by a background sweeper.
    pub fn current(&self, token: &str) -> Option<Principal> {
        let mut sessions = self.inner.write().expect("session store lock poisoned");
        match sessions.get(token) {
            Some(entry) if entry.expires_at > OffsetDateTime::now_utc() => Some(entry.principal),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn close(&self, token: &str) {
        let removed = self
            .inner
            .write()
            .expect("session store lock poisoned")
            .remove(token);
        if let Some(entry) = removed {
            debug!(user_id = %entry.principal.user_id, "session closed");
        }
    }
}
