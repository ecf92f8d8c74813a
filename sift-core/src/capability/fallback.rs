//! Deterministic fallbacks and degrade-on-failure wrappers
//!
//! Every capability call gets exactly one bounded attempt against the
//! configured implementation; any error or timeout resolves through the
//! pure local fallback. Capability failure is therefore invisible past
//! this module (it is logged, never propagated).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::CapabilityError;
use crate::script::Step;
use crate::session::AnswerQuality;

use super::traits::{FollowUpWriter, QaResponder, QualityClassifier};

/// Upper bound on a single capability call.
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(8);

/// Answers longer than this many characters (trimmed) classify as complete.
const COMPLETE_LENGTH_THRESHOLD: usize = 50;

/// Pure length heuristic: `Complete` iff the trimmed answer exceeds 50
/// characters, else `Partial`.
pub fn heuristic_quality(answer: &str) -> AnswerQuality {
    if answer.trim().chars().count() > COMPLETE_LENGTH_THRESHOLD {
        AnswerQuality::Complete
    } else {
        AnswerQuality::Partial
    }
}

/// Classifier backed solely by the length heuristic. Pure and
/// side-effect-free.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

#[async_trait]
impl QualityClassifier for HeuristicClassifier {
    async fn classify(&self, answer: &str, _step: &Step) -> Result<AnswerQuality, CapabilityError> {
        Ok(heuristic_quality(answer))
    }
}

/// Responder that always returns a generic acknowledgement.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedResponder;

/// Fallback answer for off-script questions.
pub const CANNED_ANSWER: &str =
    "That's a good question. The hiring team will cover it in detail later in the process.";

#[async_trait]
impl QaResponder for CannedResponder {
    async fn answer(&self, _question: &str) -> Result<String, CapabilityError> {
        Ok(CANNED_ANSWER.to_string())
    }
}

/// Follow-up writer that templates a generic probe from the step's focus.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateFollowUp;

#[async_trait]
impl FollowUpWriter for TemplateFollowUp {
    async fn follow_up(&self, step: &Step, _answer: &str) -> Result<String, CapabilityError> {
        let text = match &step.focus_tag {
            Some(tag) => format!("Could you tell me more, especially around {tag}?"),
            None => "Could you expand on that a bit? A concrete example would help.".to_string(),
        };
        Ok(text)
    }
}

/// Classifier wrapper that bounds latency and absorbs failure.
pub struct FallbackClassifier {
    inner: Option<Arc<dyn QualityClassifier>>,
    timeout: Duration,
}

impl FallbackClassifier {
    /// Wrap a classifier with the default timeout.
    pub fn new(inner: Arc<dyn QualityClassifier>) -> Self {
        Self {
            inner: Some(inner),
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    /// Heuristic only, no external capability configured.
    pub fn heuristic_only() -> Self {
        Self {
            inner: None,
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify an answer. Infallible: failure degrades to the heuristic.
    pub async fn classify(&self, answer: &str, step: &Step) -> AnswerQuality {
        if let Some(inner) = &self.inner {
            match tokio::time::timeout(self.timeout, inner.classify(answer, step)).await {
                Ok(Ok(quality)) => return quality,
                Ok(Err(err)) => {
                    warn!(step_order = step.order, %err, "classifier failed, using heuristic");
                }
                Err(_) => {
                    warn!(
                        step_order = step.order,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "classifier timed out, using heuristic"
                    );
                }
            }
        }
        heuristic_quality(answer)
    }
}

/// Responder wrapper that bounds latency and absorbs failure.
pub struct FallbackResponder {
    inner: Option<Arc<dyn QaResponder>>,
    timeout: Duration,
}

impl FallbackResponder {
    pub fn new(inner: Arc<dyn QaResponder>) -> Self {
        Self {
            inner: Some(inner),
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn canned_only() -> Self {
        Self {
            inner: None,
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Answer an off-script question. Infallible: failure degrades to the
    /// canned acknowledgement.
    pub async fn answer(&self, question: &str) -> String {
        if let Some(inner) = &self.inner {
            match tokio::time::timeout(self.timeout, inner.answer(question)).await {
                Ok(Ok(text)) => return text,
                Ok(Err(err)) => {
                    warn!(%err, "responder failed, using canned answer");
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        "responder timed out, using canned answer"
                    );
                }
            }
        }
        CANNED_ANSWER.to_string()
    }
}

/// Follow-up writer wrapper that bounds latency and absorbs failure.
pub struct FallbackFollowUp {
    inner: Option<Arc<dyn FollowUpWriter>>,
    timeout: Duration,
}

impl FallbackFollowUp {
    pub fn new(inner: Arc<dyn FollowUpWriter>) -> Self {
        Self {
            inner: Some(inner),
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn template_only() -> Self {
        Self {
            inner: None,
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produce a follow-up prompt. Infallible: failure degrades to the
    /// template text.
    pub async fn follow_up(&self, step: &Step, answer: &str) -> String {
        if let Some(inner) = &self.inner {
            match tokio::time::timeout(self.timeout, inner.follow_up(step, answer)).await {
                Ok(Ok(text)) => return text,
                Ok(Err(err)) => {
                    warn!(step_order = step.order, %err, "follow-up writer failed, using template");
                }
                Err(_) => {
                    warn!(step_order = step.order, "follow-up writer timed out, using template");
                }
            }
        }
        // TemplateFollowUp::follow_up is infallible
        TemplateFollowUp
            .follow_up(step, answer)
            .await
            .unwrap_or_else(|_| "Could you expand on that a bit?".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mock::{FailingClassifier, FailingResponder};
    use crate::script::Step;

    fn step() -> Step {
        Step::static_question(0, "Walk me through your last project.")
    }

    #[test]
    fn heuristic_is_partial_at_or_below_threshold() {
        assert_eq!(heuristic_quality("short"), AnswerQuality::Partial);
        let exactly_fifty = "x".repeat(50);
        assert_eq!(heuristic_quality(&exactly_fifty), AnswerQuality::Partial);
    }

    #[test]
    fn heuristic_is_complete_above_threshold() {
        let long = "x".repeat(51);
        assert_eq!(heuristic_quality(&long), AnswerQuality::Complete);
    }

    #[test]
    fn heuristic_trims_before_counting() {
        let padded = format!("   {}   ", "x".repeat(50));
        assert_eq!(heuristic_quality(&padded), AnswerQuality::Partial);
    }

    #[tokio::test]
    async fn classifier_failure_degrades_to_heuristic() {
        let wrapper = FallbackClassifier::new(Arc::new(FailingClassifier));
        let long = "x".repeat(80);
        assert_eq!(wrapper.classify(&long, &step()).await, AnswerQuality::Complete);
        assert_eq!(wrapper.classify("hm", &step()).await, AnswerQuality::Partial);
    }

    #[tokio::test]
    async fn responder_failure_degrades_to_canned_answer() {
        let wrapper = FallbackResponder::new(Arc::new(FailingResponder));
        assert_eq!(wrapper.answer("What is the salary?").await, CANNED_ANSWER);
    }

    #[tokio::test]
    async fn template_follow_up_uses_focus_tag() {
        let mut s = step();
        s.focus_tag = Some("error handling".to_string());
        let text = FallbackFollowUp::template_only().follow_up(&s, "it went fine").await;
        assert!(text.contains("error handling"));
    }

    #[tokio::test]
    async fn slow_classifier_is_cut_off_by_timeout() {
        struct SlowClassifier;

        #[async_trait]
        impl QualityClassifier for SlowClassifier {
            async fn classify(
                &self,
                _answer: &str,
                _step: &Step,
            ) -> Result<AnswerQuality, CapabilityError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(AnswerQuality::Complete)
            }
        }

        let wrapper = FallbackClassifier::new(Arc::new(SlowClassifier))
            .with_timeout(Duration::from_millis(10));
        // Short answer: the heuristic takes over after the timeout.
        assert_eq!(wrapper.classify("hm", &step()).await, AnswerQuality::Partial);
    }
}
