//! Chat-completions HTTP client
//!
//! Talks to an OpenAI-compatible chat API with a strict, typed response
//! schema. Any shape violation maps to [`CapabilityError::InvalidResponse`]
//! rather than being poked out of loose JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_core::CapabilityError;

/// Default request timeout at the HTTP layer. The capability wrappers in
/// sift-core apply their own, tighter bound on top.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Message in a chat request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the `/v1/chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One completion choice in the response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Response body from the `/v1/chat/completions` endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

/// HTTP client for an OpenAI-compatible chat-completions API.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    /// Create a client against a base URL (no trailing slash) and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send one chat exchange and return the first choice's content.
    pub async fn chat(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String, CapabilityError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: Some(0.0),
            max_tokens: Some(256),
        };

        let mut builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| CapabilityError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CapabilityError::Unavailable(format!(
                "chat API returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| CapabilityError::InvalidResponse(err.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CapabilityError::InvalidResponse("no choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_without_absent_options() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn chat_response_rejects_shape_violations() {
        let malformed = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        assert!(serde_json::from_str::<ChatResponse>(malformed).is_err());
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "partial"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "partial");
    }
}
