//! Session Management
//!
//! A session owns one conversation. The caller holds it and lends it to the
//! agent for the length of a run. [`SessionManager`] hands out one mutex per
//! session, so two runs never overlap inside the same conversation.
//! Sessions leave the manager when removed or when they sit idle too long.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::message::{Conversation, Turn};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single user's conversation with the agent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    conversation: Conversation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation: Conversation::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Append a turn to the history
    pub fn append(&mut self, turn: Turn) {
        self.conversation.append(turn);
        self.touch();
    }

    /// Start a new conversation under the same id
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn turn_count(&self) -> usize {
        self.conversation.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory map of live sessions
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a fresh session
    pub async fn create(&self) -> (SessionId, SessionHandle) {
        let session = Session::new();
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id.clone(), Arc::clone(&handle));
        tracing::debug!(session_id = %id, "Created session");
        (id, handle)
    }

    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Forget a session; `false` when the id was unknown
    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Removed session");
        }
        removed
    }

    /// Drop sessions not touched within `max_idle`. A session locked by a
    /// running request is kept. Returns how many were dropped.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.updated_at >= cutoff,
            Err(_) => true,
        });

        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!(pruned, remaining = sessions.len(), "Pruned idle sessions");
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn reset_keeps_id_and_clears_history() {
        let mut session = Session::new();
        let id = session.id.clone();
        session.append(Turn::user("hi"));
        session.reset();

        assert_eq!(session.id, id);
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn manager_returns_same_handle() {
        let manager = SessionManager::new();
        let (id, first) = manager.create().await;
        first.lock().await.append(Turn::user("odds?"));

        let second = manager.get(&id).await.unwrap();
        assert_eq!(second.lock().await.turn_count(), 1);
        assert_eq!(manager.len().await, 1);
        assert!(manager.get(&SessionId::from_string("gone")).await.is_none());
    }

    #[tokio::test]
    async fn removed_session_is_gone() {
        let manager = SessionManager::new();
        let (id, _) = manager.create().await;

        assert!(manager.remove(&id).await);
        assert!(manager.get(&id).await.is_none());
        assert!(manager.is_empty().await);
        assert!(!manager.remove(&id).await);
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned() {
        let manager = SessionManager::new();
        let (stale, handle) = manager.create().await;
        handle.lock().await.updated_at = Utc::now() - chrono::Duration::hours(2);
        let (fresh, _) = manager.create().await;

        assert_eq!(manager.prune_idle(Duration::from_secs(3600)).await, 1);
        assert!(manager.get(&stale).await.is_none());
        assert!(manager.get(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn busy_session_survives_pruning() {
        let manager = SessionManager::new();
        let (id, handle) = manager.create().await;
        let mut running = handle.lock().await;
        running.updated_at = Utc::now() - chrono::Duration::hours(2);

        assert_eq!(manager.prune_idle(Duration::from_secs(60)).await, 0);
        drop(running);
        assert!(manager.get(&id).await.is_some());
    }
}
