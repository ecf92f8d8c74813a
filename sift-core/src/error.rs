//! Error types for sift-core

use thiserror::Error;

/// Top-level error type for sift-core
#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),
}

/// Errors from script loading and validation
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("No steps for candidate '{candidate_id}' and requirement '{requirement_id}'")]
    EmptyScript {
        candidate_id: String,
        requirement_id: String,
    },

    #[error("Malformed script: {0}")]
    MalformedScript(String),

    #[error("Script source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Errors related to session management
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session {0} is terminal and accepts no further mutation")]
    Terminal(String),
}

/// Errors from external capabilities (classifier, responder, follow-up writer)
///
/// These never cross the engine boundary: every call site resolves them
/// through a deterministic fallback.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Capability call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Capability returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_error_display_names_candidate_and_requirement() {
        let err = ScriptError::EmptyScript {
            candidate_id: "c-1".to_string(),
            requirement_id: "r-9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("c-1"));
        assert!(msg.contains("r-9"));
    }

    #[test]
    fn session_not_found_converts_to_top_level() {
        let err: SiftError = SessionError::NotFound("abc".to_string()).into();
        assert!(matches!(err, SiftError::Session(SessionError::NotFound(_))));
    }
}
