//! Thread-safe in-memory session store.
//!
//! The outer map is guarded by a sync `RwLock`; each session sits behind its
//! own async mutex so one conversational turn can hold its session across
//! await points without blocking other sessions. No global lock is held
//! during a turn.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info};

use resume_core::Session;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory mapping from session id to session state.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating an Idle one if absent.
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(existing) = self.sessions.read().get(id) {
            return existing.clone();
        }

        let mut sessions = self.sessions.write();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %id, "created session");
                Arc::new(Mutex::new(Session::new(id)))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(id).cloned()
    }

    /// Applies one atomic transition to a session, creating it if absent.
    /// Concurrent callers on the same id serialize; distinct ids do not.
    pub async fn mutate<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> T {
        let handle = self.get_or_create(id);
        let mut session = handle.lock().await;
        f(&mut session)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Snapshot of all session handles, for read-only listings.
    pub fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().values().cloned().collect()
    }

    /// Removes sessions inactive beyond `ttl`. Sessions whose mutex is
    /// currently held are mid-turn and therefore active; they are skipped.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let mut sessions = self.sessions.write();
        let before = sessions.len();

        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_idle_beyond(ttl),
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted = evicted, remaining = sessions.len(), "evicted idle sessions");
        }
        evicted
    }
}
