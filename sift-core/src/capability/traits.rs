//! Capability traits for LLM-backed collaborators
//!
//! The engine never talks to a model provider directly. It sees three
//! narrow traits, each with a deterministic local fallback, so the whole
//! progression pipeline runs offline in tests.

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::script::Step;
use crate::session::AnswerQuality;

/// Judges whether a candidate answer is sufficient for a step.
///
/// Implementations may call out over the network; callers bound the latency
/// and degrade to [`HeuristicClassifier`](super::HeuristicClassifier) on
/// failure. A classifier never returns [`AnswerQuality::None`].
#[async_trait]
pub trait QualityClassifier: Send + Sync {
    async fn classify(&self, answer: &str, step: &Step) -> Result<AnswerQuality, CapabilityError>;
}

/// Answers off-script candidate questions.
#[async_trait]
pub trait QaResponder: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, CapabilityError>;
}

/// Writes a follow-up prompt for a partial answer on a step.
#[async_trait]
pub trait FollowUpWriter: Send + Sync {
    async fn follow_up(&self, step: &Step, answer: &str) -> Result<String, CapabilityError>;
}
