//! sift-models: LLM provider adapters for the sift capability traits
//!
//! Wire these into an [`InterviewManager`](sift_core::InterviewManager) via
//! the degrading wrappers in `sift_core::capability`; the engine stays
//! fully functional when the provider is down.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sift_core::capability::{FallbackClassifier, FallbackFollowUp};
//! use sift_core::ProgressionEngine;
//! use sift_models::{ChatClient, LlmClassifier, LlmFollowUpWriter};
//!
//! let client = Arc::new(ChatClient::new("http://localhost:11434", "llama3"));
//! let engine = ProgressionEngine::new(
//!     FallbackClassifier::new(Arc::new(LlmClassifier::new(client.clone()))),
//!     FallbackFollowUp::new(Arc::new(LlmFollowUpWriter::new(client))),
//! );
//! ```

pub mod capabilities;
pub mod provider;

pub use capabilities::{LlmClassifier, LlmFollowUpWriter, LlmResponder};
pub use provider::{ChatClient, ChatMessage, ChatRequest, ChatResponse};
