//! Error types for sift-scoring

use thiserror::Error;

/// Errors from score computation and recording
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Subscore '{subscore}' out of range: {value} (expected 0..=100)")]
    OutOfRange { subscore: &'static str, value: u32 },

    #[error("Score sink failed: {0}")]
    SinkFailed(String),
}
