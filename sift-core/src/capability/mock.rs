//! Mock capabilities for tests
//!
//! Shipped in the crate proper (not behind `cfg(test)`) so downstream
//! crates and integration tests can script classifier behavior.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::script::Step;
use crate::session::AnswerQuality;

use super::traits::{FollowUpWriter, QaResponder, QualityClassifier};

/// Classifier returning scripted qualities in order, then a fixed default.
pub struct MockClassifier {
    queue: Mutex<VecDeque<AnswerQuality>>,
    default: AnswerQuality,
}

impl MockClassifier {
    /// Always return `quality`.
    pub fn always(quality: AnswerQuality) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default: quality,
        }
    }

    /// Return the given qualities in order, then `default`.
    pub fn scripted(
        qualities: impl IntoIterator<Item = AnswerQuality>,
        default: AnswerQuality,
    ) -> Self {
        Self {
            queue: Mutex::new(qualities.into_iter().collect()),
            default,
        }
    }
}

#[async_trait]
impl QualityClassifier for MockClassifier {
    async fn classify(&self, _answer: &str, _step: &Step) -> Result<AnswerQuality, CapabilityError> {
        let next = self.queue.lock().unwrap().pop_front();
        Ok(next.unwrap_or(self.default))
    }
}

/// Responder returning a fixed answer.
pub struct MockResponder {
    answer: String,
}

impl MockResponder {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl QaResponder for MockResponder {
    async fn answer(&self, _question: &str) -> Result<String, CapabilityError> {
        Ok(self.answer.clone())
    }
}

/// Classifier that always fails, for exercising fallback paths.
pub struct FailingClassifier;

#[async_trait]
impl QualityClassifier for FailingClassifier {
    async fn classify(&self, _answer: &str, _step: &Step) -> Result<AnswerQuality, CapabilityError> {
        Err(CapabilityError::Unavailable("mock outage".to_string()))
    }
}

/// Responder that always fails.
pub struct FailingResponder;

#[async_trait]
impl QaResponder for FailingResponder {
    async fn answer(&self, _question: &str) -> Result<String, CapabilityError> {
        Err(CapabilityError::Unavailable("mock outage".to_string()))
    }
}

/// Follow-up writer that always fails.
pub struct FailingFollowUp;

#[async_trait]
impl FollowUpWriter for FailingFollowUp {
    async fn follow_up(&self, _step: &Step, _answer: &str) -> Result<String, CapabilityError> {
        Err(CapabilityError::Unavailable("mock outage".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Step;

    #[tokio::test]
    async fn scripted_classifier_drains_queue_then_defaults() {
        let mock = MockClassifier::scripted(
            [AnswerQuality::Partial, AnswerQuality::Complete],
            AnswerQuality::Partial,
        );
        let step = Step::static_question(0, "Q?");
        assert_eq!(mock.classify("a", &step).await.unwrap(), AnswerQuality::Partial);
        assert_eq!(mock.classify("b", &step).await.unwrap(), AnswerQuality::Complete);
        assert_eq!(mock.classify("c", &step).await.unwrap(), AnswerQuality::Partial);
    }
}
