//! LLM-backed implementations of the sift-core capability traits
//!
//! Each adapter wraps a [`ChatClient`] with a purpose-built system prompt.
//! The classifier enforces a closed output vocabulary: anything other than
//! `partial` or `complete` is an invalid response, which the core's
//! degrading wrappers resolve through the local heuristic.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use sift_core::capability::{FollowUpWriter, QaResponder, QualityClassifier};
use sift_core::{AnswerQuality, CapabilityError, Step};

use crate::provider::ChatClient;

const CLASSIFIER_SYSTEM_PROMPT: &str = "You grade screening interview answers. \
Given the question and the candidate's answer, reply with exactly one word: \
'complete' if the answer addresses the question with enough substance, or \
'partial' if it needs a follow-up. No other output.";

const RESPONDER_SYSTEM_PROMPT: &str = "You are a screening interviewer. The candidate \
asked an off-script question. Answer it briefly and professionally in at most two \
sentences, without inventing company-specific facts.";

const FOLLOW_UP_SYSTEM_PROMPT: &str = "You are a screening interviewer. The candidate \
gave a partial answer to the question shown. Write one short follow-up question that \
probes for the missing substance. Output only the question.";

/// Chat-backed answer quality classifier.
pub struct LlmClassifier {
    client: Arc<ChatClient>,
}

impl LlmClassifier {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QualityClassifier for LlmClassifier {
    async fn classify(&self, answer: &str, step: &Step) -> Result<AnswerQuality, CapabilityError> {
        let user = format!("Question: {}\n\nAnswer: {}", step.text, answer);
        let raw = self.client.chat(CLASSIFIER_SYSTEM_PROMPT, user).await?;
        let verdict = raw.trim().to_lowercase();
        debug!(step_order = step.order, verdict, "classifier verdict");
        match verdict.as_str() {
            "complete" => Ok(AnswerQuality::Complete),
            "partial" => Ok(AnswerQuality::Partial),
            other => Err(CapabilityError::InvalidResponse(format!(
                "expected 'partial' or 'complete', got '{other}'"
            ))),
        }
    }
}

/// Chat-backed off-script question responder.
pub struct LlmResponder {
    client: Arc<ChatClient>,
}

impl LlmResponder {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QaResponder for LlmResponder {
    async fn answer(&self, question: &str) -> Result<String, CapabilityError> {
        let text = self.client.chat(RESPONDER_SYSTEM_PROMPT, question).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CapabilityError::InvalidResponse("empty answer".to_string()));
        }
        Ok(trimmed.to_string())
    }
}

/// Chat-backed follow-up prompt writer.
pub struct LlmFollowUpWriter {
    client: Arc<ChatClient>,
}

impl LlmFollowUpWriter {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FollowUpWriter for LlmFollowUpWriter {
    async fn follow_up(&self, step: &Step, answer: &str) -> Result<String, CapabilityError> {
        let user = format!("Question: {}\n\nPartial answer: {}", step.text, answer);
        let text = self.client.chat(FOLLOW_UP_SYSTEM_PROMPT, user).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CapabilityError::InvalidResponse(
                "empty follow-up".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
