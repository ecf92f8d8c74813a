//! Score sinks: where finished score reports go
//!
//! Recording is fire-and-forget from the interview's perspective: a sink
//! failure is logged and never fails the session that produced the score.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ScoringError;
use crate::score::{ScoreReport, Subscores, score};

/// A recorded scoring decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub candidate_id: String,
    pub report: ScoreReport,
    pub recorded_at: DateTime<Utc>,
}

/// Destination for finished score reports
#[async_trait]
pub trait ScoreSink: Send + Sync {
    /// Record a scoring decision for a candidate.
    async fn record(&self, candidate_id: &str, report: ScoreReport) -> Result<(), ScoringError>;
}

/// In-memory sink keeping the latest record per candidate.
#[derive(Default)]
pub struct MemoryScoreSink {
    records: RwLock<HashMap<String, ScoreRecord>>,
}

impl MemoryScoreSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, candidate_id: &str) -> Option<ScoreRecord> {
        self.records.read().await.get(candidate_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ScoreSink for MemoryScoreSink {
    async fn record(&self, candidate_id: &str, report: ScoreReport) -> Result<(), ScoringError> {
        self.records.write().await.insert(
            candidate_id.to_string(),
            ScoreRecord {
                candidate_id: candidate_id.to_string(),
                report,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }
}

/// Sink that only emits a structured log line. The default when no durable
/// destination is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingScoreSink;

#[async_trait]
impl ScoreSink for LoggingScoreSink {
    async fn record(&self, candidate_id: &str, report: ScoreReport) -> Result<(), ScoringError> {
        info!(
            candidate_id,
            overall = report.overall,
            passes = report.passes,
            "score recorded"
        );
        Ok(())
    }
}

/// Validates, scores, and records in one call.
///
/// Validation errors surface to the caller; sink failures do not.
pub struct ScoreRecorder {
    sink: std::sync::Arc<dyn ScoreSink>,
}

impl ScoreRecorder {
    pub fn new(sink: std::sync::Arc<dyn ScoreSink>) -> Self {
        Self { sink }
    }

    /// Score the subscores and push the report to the sink.
    ///
    /// Returns the report either way; a sink failure is logged and
    /// swallowed.
    pub async fn score_and_record(
        &self,
        candidate_id: &str,
        subscores: Subscores,
    ) -> Result<ScoreReport, ScoringError> {
        let report = score(subscores)?;
        if let Err(err) = self.sink.record(candidate_id, report).await {
            warn!(candidate_id, %err, "score sink failed, report not persisted");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn subscores() -> Subscores {
        Subscores {
            skills_match: 80,
            experience_relevance: 70,
            communication: 90,
            cultural_fit: 100,
        }
    }

    #[tokio::test]
    async fn memory_sink_stores_latest_record() {
        let sink = MemoryScoreSink::new();
        let report = score(subscores()).unwrap();
        sink.record("cand-1", report).await.unwrap();
        let stored = sink.get("cand-1").await.unwrap();
        assert_eq!(stored.report.overall, 82);
        assert!(stored.report.passes);
    }

    #[tokio::test]
    async fn recorder_returns_report_even_when_sink_fails() {
        struct BrokenSink;

        #[async_trait]
        impl ScoreSink for BrokenSink {
            async fn record(
                &self,
                _candidate_id: &str,
                _report: ScoreReport,
            ) -> Result<(), ScoringError> {
                Err(ScoringError::SinkFailed("disk full".to_string()))
            }
        }

        let recorder = ScoreRecorder::new(Arc::new(BrokenSink));
        let report = recorder.score_and_record("cand-2", subscores()).await.unwrap();
        assert_eq!(report.overall, 82);
    }

    #[tokio::test]
    async fn recorder_rejects_invalid_subscores_before_the_sink() {
        let sink = Arc::new(MemoryScoreSink::new());
        let recorder = ScoreRecorder::new(sink.clone());
        let bad = Subscores {
            cultural_fit: 250,
            ..subscores()
        };
        assert!(recorder.score_and_record("cand-3", bad).await.is_err());
        assert!(sink.is_empty().await);
    }
}
