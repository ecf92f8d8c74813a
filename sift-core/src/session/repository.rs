//! Session storage trait and in-memory implementation
//!
//! The repository is injected into [`InterviewManager`](crate::manager::InterviewManager)
//! so tests run against the in-memory backend and production can plug in a
//! durable store. Session types are serde-ready for exactly that purpose.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::state::{Session, SessionId};

/// Default idle lifetime before a session is eligible for sweeping.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Last-activity cutoff for idle eligibility.
pub fn idle_cutoff(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now - chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(24))
}

/// Keyed store of session state
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch a session by ID.
    async fn get(&self, id: SessionId) -> Option<Session>;

    /// Insert or replace a session.
    async fn put(&self, session: Session);

    /// Remove a session. Returns whether it existed.
    async fn delete(&self, id: SessionId) -> bool;

    /// IDs of sessions idle longer than `ttl`, without removing them.
    ///
    /// Callers that hold per-session turn locks use this to delete each
    /// candidate under its lock, re-checking idleness first.
    async fn list_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<SessionId>;

    /// Remove sessions idle longer than `ttl`, returning their IDs.
    async fn sweep_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<SessionId>;
}

/// In-memory repository backed by a `RwLock<HashMap>`.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn put(&self, session: Session) {
        self.sessions.write().await.insert(session.id(), session);
    }

    async fn delete(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    async fn list_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<SessionId> {
        let cutoff = idle_cutoff(now, ttl);
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(_, s)| s.last_activity() < cutoff)
            .map(|(id, _)| *id)
            .collect()
    }

    async fn sweep_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<SessionId> {
        let cutoff = idle_cutoff(now, ttl);
        let mut sessions = self.sessions.write().await;
        let stale: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, s)| s.last_activity() < cutoff)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            sessions.remove(id);
            tracing::info!(session_id = %id, "swept idle session");
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Step;

    fn sample_session(now: DateTime<Utc>) -> Session {
        let steps = vec![Step::static_question(0, "Tell me about yourself.")];
        Session::new("cand", "req", steps, now)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let repo = MemorySessionRepository::new();
        let session = sample_session(Utc::now());
        let id = session.id();
        repo.put(session.clone()).await;
        assert_eq!(repo.get(id).await, Some(session));
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let repo = MemorySessionRepository::new();
        assert!(repo.get(SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let repo = MemorySessionRepository::new();
        let session = sample_session(Utc::now());
        let id = session.id();
        repo.put(session).await;
        assert!(repo.delete(id).await);
        assert!(!repo.delete(id).await);
    }

    #[tokio::test]
    async fn list_idle_reports_without_removing() {
        let repo = MemorySessionRepository::new();
        let now = Utc::now();
        let stale = sample_session(now - chrono::Duration::hours(25));
        let stale_id = stale.id();
        repo.put(stale).await;

        let idle = repo.list_idle(now, DEFAULT_IDLE_TTL).await;
        assert_eq!(idle, vec![stale_id]);
        assert!(repo.get(stale_id).await.is_some());
    }

    #[tokio::test]
    async fn sweep_removes_only_idle_sessions() {
        let repo = MemorySessionRepository::new();
        let now = Utc::now();
        let stale = sample_session(now - chrono::Duration::hours(25));
        let fresh = sample_session(now);
        let stale_id = stale.id();
        let fresh_id = fresh.id();
        repo.put(stale).await;
        repo.put(fresh).await;

        let swept = repo.sweep_idle(now, DEFAULT_IDLE_TTL).await;
        assert_eq!(swept, vec![stale_id]);
        assert!(repo.get(stale_id).await.is_none());
        assert!(repo.get(fresh_id).await.is_some());
    }
}
