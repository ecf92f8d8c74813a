//! sift-scoring: weighted pass/fail scoring for finished interviews
//!
//! Validates four subscores, combines them into a weighted overall score,
//! and records the decision through a pluggable [`ScoreSink`].

pub mod error;
pub mod score;
pub mod sink;

pub use error::ScoringError;
pub use score::{PASS_THRESHOLD, ScoreReport, Subscores, score};
pub use sink::{LoggingScoreSink, MemoryScoreSink, ScoreRecord, ScoreRecorder, ScoreSink};
