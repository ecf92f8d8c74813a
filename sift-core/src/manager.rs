//! InterviewManager: the per-turn pipeline
//!
//! Composes the protocol enforcer, interruption handler, progression
//! engine, and session repository behind two calls: `start_interview` and
//! `handle_turn`. Turns on the same session are serialized through a keyed
//! mutex because step advancement is a read-modify-write sequence; turns on
//! different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

use crate::engine::{ProgressionEngine, TurnOutput};
use crate::error::{SessionError, SiftError};
use crate::interruption::{InterruptionHandler, is_interruption};
use crate::protocol::{ProtocolEnforcer, StopReason, TIME_UP_MESSAGE};
use crate::script::{ScriptSource, validate_script};
use crate::session::{DEFAULT_IDLE_TTL, Session, SessionId, SessionRepository, idle_cutoff};

/// Drives scripted screening interviews end to end.
pub struct InterviewManager {
    script_source: Arc<dyn ScriptSource>,
    repository: Arc<dyn SessionRepository>,
    engine: ProgressionEngine,
    enforcer: ProtocolEnforcer,
    interruptions: InterruptionHandler,
    /// Per-session turn locks; single writer per session id
    turn_locks: RwLock<HashMap<SessionId, Arc<Mutex<()>>>>,
    idle_ttl: Duration,
}

impl InterviewManager {
    /// Create a manager with offline capabilities (heuristic classifier,
    /// canned responder, templated follow-ups).
    pub fn new(script_source: Arc<dyn ScriptSource>, repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            script_source,
            repository,
            engine: ProgressionEngine::offline(),
            enforcer: ProtocolEnforcer::default(),
            interruptions: InterruptionHandler::canned_only(),
            turn_locks: RwLock::new(HashMap::new()),
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }

    /// Swap in an engine wired to external capabilities.
    pub fn with_engine(mut self, engine: ProgressionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_enforcer(mut self, enforcer: ProtocolEnforcer) -> Self {
        self.enforcer = enforcer;
        self
    }

    pub fn with_interruptions(mut self, interruptions: InterruptionHandler) -> Self {
        self.interruptions = interruptions;
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Start an interview: load and validate the script once, create the
    /// session, and return the first step's prompt.
    #[instrument(skip(self))]
    pub async fn start_interview(
        &self,
        candidate_id: &str,
        requirement_id: &str,
    ) -> Result<(SessionId, TurnOutput), SiftError> {
        let steps = self
            .script_source
            .load_steps(candidate_id, requirement_id)
            .await?;
        validate_script(&steps, candidate_id, requirement_id)?;

        let session = Session::new(candidate_id, requirement_id, steps, Utc::now());
        let id = session.id();
        let first_step = session
            .current_step()
            .map(|s| s.text.clone())
            .unwrap_or_default();
        let output = TurnOutput {
            prompt: first_step,
            progress: session.snapshot(),
        };
        info!(session_id = %id, candidate_id, total_steps = session.total_steps(), "interview started");
        self.repository.put(session).await;
        Ok((id, output))
    }

    /// Process one candidate turn.
    ///
    /// Pipeline: protocol check, interruption side-channel, progression
    /// engine, persist. Unknown session ids surface as
    /// [`SessionError::NotFound`]; everything else resolves to a prompt.
    #[instrument(skip(self, message), fields(session_id = %session_id))]
    pub async fn handle_turn(
        &self,
        session_id: SessionId,
        message: &str,
    ) -> Result<TurnOutput, SessionError> {
        let lock = self.turn_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .repository
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        let now = Utc::now();
        let verdict = self.enforcer.check(&session, now);
        if !verdict.allow {
            return Ok(self.terminate(session, verdict.reason).await);
        }

        if is_interruption(message) {
            // Side-channel: answer and re-ask without touching progression.
            if let Some(step_text) = session.current_step().map(|s| s.text.clone()) {
                let prompt = self.interruptions.reply_and_resume(message, &step_text).await;
                let progress = session.snapshot();
                session.touch(now);
                self.repository.put(session).await;
                return Ok(TurnOutput { prompt, progress });
            }
        }

        let output = self.engine.advance(&mut session, message).await;
        session.touch(now);
        self.repository.put(session).await;
        Ok(output)
    }

    /// Apply a protocol veto: time-outs terminate the session, an
    /// exhausted script re-returns the closing message.
    async fn terminate(&self, mut session: Session, reason: Option<StopReason>) -> TurnOutput {
        match reason {
            Some(StopReason::TimeBudgetExhausted) => {
                if !session.interview_complete() {
                    info!(session_id = %session.id(), "time budget exhausted, terminating");
                    session.mark_timed_out();
                    self.repository.put(session.clone()).await;
                }
                TurnOutput {
                    prompt: TIME_UP_MESSAGE.to_string(),
                    progress: session.snapshot(),
                }
            }
            _ => TurnOutput {
                prompt: crate::engine::CLOSING_MESSAGE.to_string(),
                progress: session.snapshot(),
            },
        }
    }

    /// Fetch a session snapshot for inspection.
    pub async fn session(&self, session_id: SessionId) -> Result<Session, SessionError> {
        self.repository
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Remove a finished session from the repository and return its final
    /// state, for downstream scoring.
    ///
    /// Takes the session's turn lock first, so a turn in flight lands its
    /// write before the delete and cannot resurrect the session afterwards.
    pub async fn finish(&self, session_id: SessionId) -> Result<Session, SessionError> {
        let lock = self.turn_lock(session_id).await;
        let session = {
            let _guard = lock.lock().await;
            let session = self
                .repository
                .get(session_id)
                .await
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
            self.repository.delete(session_id).await;
            session
        };
        // Safe to drop the lock entry now: the session is gone, so any
        // late turn resolves to NotFound before it can write.
        self.turn_locks.write().await.remove(&session_id);
        info!(session_id = %session_id, completion_rate = session.completion_rate(), "interview finished");
        Ok(session)
    }

    /// Sweep sessions idle past the configured TTL.
    ///
    /// Each candidate is deleted under its turn lock, with idleness
    /// re-checked there; a session touched by a turn in the meantime stays.
    pub async fn sweep_idle(&self) -> Vec<SessionId> {
        let now = Utc::now();
        let cutoff = idle_cutoff(now, self.idle_ttl);
        let mut swept = Vec::new();
        for id in self.repository.list_idle(now, self.idle_ttl).await {
            let lock = self.turn_lock(id).await;
            let removed = {
                let _guard = lock.lock().await;
                match self.repository.get(id).await {
                    Some(session) if session.last_activity() < cutoff => {
                        self.repository.delete(id).await
                    }
                    _ => false,
                }
            };
            if removed {
                self.turn_locks.write().await.remove(&id);
                info!(session_id = %id, "swept idle session");
                swept.push(id);
            }
        }
        swept
    }

    async fn turn_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.turn_locks.read().await.get(&session_id) {
            return lock.clone();
        }
        self.turn_locks
            .write()
            .await
            .entry(session_id)
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::FixedScriptSource;
    use crate::session::MemorySessionRepository;

    fn manager(questions: &[&str]) -> InterviewManager {
        let source = Arc::new(FixedScriptSource::from_questions(questions.to_vec()));
        let repo = Arc::new(MemorySessionRepository::new());
        InterviewManager::new(source, repo)
    }

    #[tokio::test]
    async fn start_returns_first_step_prompt() {
        let mgr = manager(&["First question?", "Second question?"]);
        let (id, out) = mgr.start_interview("cand", "req").await.unwrap();
        assert_eq!(out.prompt, "First question?");
        assert_eq!(out.progress.total_steps, 2);
        assert!(mgr.session(id).await.is_ok());
    }

    #[tokio::test]
    async fn empty_script_fails_session_creation() {
        let mgr = manager(&[]);
        let err = mgr.start_interview("cand", "req").await.unwrap_err();
        assert!(matches!(
            err,
            SiftError::Script(crate::error::ScriptError::EmptyScript { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_session_id_is_not_found() {
        let mgr = manager(&["Q?"]);
        let err = mgr.handle_turn(SessionId::new(), "hello").await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn finish_removes_the_session() {
        let mgr = manager(&["Q?"]);
        let (id, _) = mgr.start_interview("cand", "req").await.unwrap();
        mgr.finish(id).await.unwrap();
        assert!(matches!(
            mgr.session(id).await,
            Err(SessionError::NotFound(_))
        ));
    }
}
