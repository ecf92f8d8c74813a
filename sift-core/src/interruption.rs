//! Off-script interruption handling
//!
//! When the candidate asks a question instead of answering, the handler
//! routes it to the Q&A responder and the caller re-asks the current step.
//! Interruptions are a pure side-channel: no progression state moves.

use crate::capability::FallbackResponder;

/// Phrase spliced between the answer and the re-asked step.
pub const TRANSITION_PHRASE: &str = "Now, back to where we were.";

/// True iff the trimmed message ends with a question mark.
pub fn is_interruption(text: &str) -> bool {
    text.trim().ends_with('?')
}

/// Routes off-script questions to the Q&A responder.
pub struct InterruptionHandler {
    responder: FallbackResponder,
}

impl InterruptionHandler {
    pub fn new(responder: FallbackResponder) -> Self {
        Self { responder }
    }

    /// Handler with no external responder configured.
    pub fn canned_only() -> Self {
        Self {
            responder: FallbackResponder::canned_only(),
        }
    }

    /// Answer the candidate's question. Infallible via the canned fallback.
    pub async fn handle(&self, question: &str) -> String {
        self.responder.answer(question).await
    }

    /// Compose the full reply: answer, transition, then the current step
    /// re-asked verbatim.
    pub async fn reply_and_resume(&self, question: &str, current_step_text: &str) -> String {
        let answer = self.handle(question).await;
        format!("{answer} {TRANSITION_PHRASE} {current_step_text}")
    }
}
