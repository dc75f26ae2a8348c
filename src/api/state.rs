use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::SessionState,
    services::{Orchestrator, ResultsView},
};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Everything kept for one session: the orchestrator state and the results last shown
#[derive(Debug, Clone, Default)]
pub struct SessionSlot {
    pub state: SessionState,
    pub results: ResultsView,
}

/// A single session. The lock is held for a whole trigger so that one session's
/// requests run one after another.
pub type SessionHandle = Arc<Mutex<SessionSlot>>;

struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

impl SessionEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_used.elapsed() >= ttl
    }
}

/// In-memory session registry.
///
/// Sessions idle for longer than `ttl` are dropped, and once `capacity` sessions exist the
/// least recently used one makes room for a new one.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Registers a session that has just produced its first results
    pub async fn insert(&self, id: Uuid, slot: SessionSlot) {
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.ttl));

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => sessions.remove(&oldest),
                None => break,
            };
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle sessions");
        }

        sessions.insert(
            id,
            SessionEntry {
                handle: Arc::new(Mutex::new(slot)),
                last_used: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, "Created session");
    }

    /// Returns a live session and marks it as used
    pub async fn get(&self, id: Uuid) -> AppResult<SessionHandle> {
        let mut sessions = self.inner.write().await;

        match sessions.get_mut(&id) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                entry.last_used = Instant::now();
                Ok(entry.handle.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(session_id = %id, "Session expired");
                Err(AppError::SessionNotFound(id.to_string()))
            }
            None => Err(AppError::SessionNotFound(id.to_string())),
        }
    }

    /// Like [`get`](Self::get) for an optional id, with unknown sessions as `None`
    pub async fn lookup(&self, id: Option<Uuid>) -> Option<(Uuid, SessionHandle)> {
        let id = id?;
        self.get(id).await.ok().map(|handle| (id, handle))
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self::with_sessions(orchestrator, SessionStore::default())
    }

    pub fn with_sessions(orchestrator: Orchestrator, sessions: SessionStore) -> Self {
        Self {
            orchestrator,
            sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(query: &str) -> SessionSlot {
        SessionSlot {
            state: SessionState {
                last_result: Some("Heat (1995) - Crime epic.".to_string()),
                seen_titles: Default::default(),
                current_query: query.to_string(),
            },
            results: ResultsView::default(),
        }
    }

    #[tokio::test]
    async fn test_inserted_session_is_shared() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        store.insert(id, slot("noir")).await;

        let handle = store.get(id).await.unwrap();
        handle.lock().await.state.current_query = "heists".to_string();

        let (same_id, same_handle) = store.lookup(Some(id)).await.unwrap();
        assert_eq!(same_id, id);
        assert_eq!(same_handle.lock().await.state.current_query, "heists");
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_created() {
        let store = SessionStore::default();
        let stale = Uuid::new_v4();

        assert!(store.lookup(Some(stale)).await.is_none());
        assert!(store.lookup(None).await.is_none());
        assert!(matches!(
            store.get(stale).await,
            Err(AppError::SessionNotFound(_))
        ));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let store = SessionStore::new(DEFAULT_SESSION_TTL, 2);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.insert(first, slot("noir")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.insert(second, slot("heists")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        // touching `first` leaves `second` as the oldest
        store.get(first).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.insert(third, slot("westerns")).await;

        assert_eq!(store.session_count().await, 2);
        assert!(store.get(first).await.is_ok());
        assert!(store.get(second).await.is_err());
        assert!(store.get(third).await.is_ok());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO, DEFAULT_MAX_SESSIONS);
        let id = Uuid::new_v4();
        store.insert(id, slot("noir")).await;

        assert!(matches!(
            store.get(id).await,
            Err(AppError::SessionNotFound(_))
        ));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_insert_drops_expired_sessions() {
        let store = SessionStore::new(Duration::ZERO, DEFAULT_MAX_SESSIONS);
        store.insert(Uuid::new_v4(), slot("noir")).await;
        store.insert(Uuid::new_v4(), slot("heists")).await;

        assert_eq!(store.session_count().await, 1);
    }
}
