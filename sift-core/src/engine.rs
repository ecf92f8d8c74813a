//! Interview progression engine
//!
//! [`ProgressionEngine::advance`] processes one candidate turn: classify
//! the answer, decide between follow-up, second chance, and advancement,
//! then recompute context-window membership. The engine owns all
//! progression policy; capability failures never reach it because both
//! collaborators are degrading wrappers.

use tracing::debug;

use crate::capability::{FallbackClassifier, FallbackFollowUp};
use crate::script::Step;
use crate::session::{AnswerQuality, ProgressSnapshot, Session};

/// Fixed text returned once the script is exhausted.
pub const CLOSING_MESSAGE: &str =
    "That's everything I had for you today. Thanks for your time; the team will be in touch with next steps.";

/// Prefix for the one-time retry when a candidate gives no answer.
const SECOND_CHANCE_PREFIX: &str = "No problem, take your time.";

/// Answer excerpt length kept in session memory.
const KEY_POINT_EXCERPT: usize = 80;

/// What the caller gets back from one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    /// Next prompt to speak to the candidate
    pub prompt: String,
    pub progress: ProgressSnapshot,
}

/// Session-scoped progression state machine.
pub struct ProgressionEngine {
    classifier: FallbackClassifier,
    follow_up: FallbackFollowUp,
}

impl ProgressionEngine {
    pub fn new(classifier: FallbackClassifier, follow_up: FallbackFollowUp) -> Self {
        Self {
            classifier,
            follow_up,
        }
    }

    /// Offline engine: heuristic classification and templated follow-ups.
    pub fn offline() -> Self {
        Self {
            classifier: FallbackClassifier::heuristic_only(),
            follow_up: FallbackFollowUp::template_only(),
        }
    }

    /// Process one candidate turn and return the next prompt plus progress.
    ///
    /// Calling this on a completed session is an idempotent no-op that
    /// re-returns the closing message.
    pub async fn advance(&self, session: &mut Session, message: &str) -> TurnOutput {
        if session.interview_complete() {
            return TurnOutput {
                prompt: CLOSING_MESSAGE.to_string(),
                progress: session.snapshot(),
            };
        }

        // Not complete, so a current step exists.
        let Some(step) = session.current_step().cloned() else {
            return TurnOutput {
                prompt: CLOSING_MESSAGE.to_string(),
                progress: session.snapshot(),
            };
        };

        let trimmed = message.trim();
        let prompt = if trimmed.is_empty() {
            self.handle_silence(session, &step)
        } else {
            self.handle_answer(session, &step, trimmed).await
        };

        TurnOutput {
            prompt,
            progress: session.snapshot(),
        }
    }

    /// No answer given: grant the one-time second chance, then move on.
    fn handle_silence(&self, session: &mut Session, step: &Step) -> String {
        let response = session.response_mut(step.id);
        if response.use_second_chance() {
            debug!(step_order = step.order, "second chance granted");
            return format!("{SECOND_CHANCE_PREFIX} {}", step.text);
        }

        debug!(step_order = step.order, "second chance exhausted, skipping step");
        response.mark_skipped();
        session.advance_step();
        self.next_prompt(session)
    }

    /// Classify the answer and decide follow-up vs advancement.
    async fn handle_answer(
        &self,
        session: &mut Session,
        step: &Step,
        answer: &str,
    ) -> String {
        let quality = self.classifier.classify(answer, step).await;
        debug!(step_order = step.order, ?quality, "answer classified");

        let response = session.response_mut(step.id);
        response.record_answer(quality, answer);

        match quality {
            AnswerQuality::Complete => {
                response.mark_completed();
                let excerpt: String = answer.chars().take(KEY_POINT_EXCERPT).collect();
                session.memory_mut().add_key_point(excerpt);
                session.advance_step();
                self.next_prompt(session)
            }
            // Classifiers only produce Partial or Complete; None is the
            // unanswered sentinel and gets the partial treatment.
            AnswerQuality::Partial | AnswerQuality::None => {
                if response.follow_up_available() {
                    response.note_follow_up();
                    self.follow_up.follow_up(step, answer).await
                } else {
                    // Do not stall on marginal answers.
                    response.mark_completed();
                    session.advance_step();
                    self.next_prompt(session)
                }
            }
        }
    }

    fn next_prompt(&self, session: &Session) -> String {
        match session.current_step() {
            Some(step) => step.text.clone(),
            None => CLOSING_MESSAGE.to_string(),
        }
    }
}
