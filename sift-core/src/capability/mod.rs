//! LLM-backed capability seams: classifier, responder, follow-up writer

pub mod fallback;
pub mod mock;
pub mod traits;

// Re-export key types for convenience
pub use fallback::{
    CANNED_ANSWER, CannedResponder, DEFAULT_CAPABILITY_TIMEOUT, FallbackClassifier,
    FallbackFollowUp, FallbackResponder, HeuristicClassifier, TemplateFollowUp, heuristic_quality,
};
pub use mock::{MockClassifier, MockResponder};
pub use traits::{FollowUpWriter, QaResponder, QualityClassifier};
