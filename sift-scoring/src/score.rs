//! Weighted completion scoring
//!
//! Four subscores on a 0..=100 scale combine into an overall score via
//! fixed weights; passing means an overall of at least 70. Out-of-range
//! subscores are rejected outright, never clamped.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Weight on the skills-match subscore.
pub const WEIGHT_SKILLS_MATCH: f64 = 0.35;
/// Weight on the experience-relevance subscore.
pub const WEIGHT_EXPERIENCE_RELEVANCE: f64 = 0.30;
/// Weight on the communication subscore.
pub const WEIGHT_COMMUNICATION: f64 = 0.20;
/// Weight on the cultural-fit subscore.
pub const WEIGHT_CULTURAL_FIT: f64 = 0.15;

/// Minimum overall score that passes the screen.
pub const PASS_THRESHOLD: u32 = 70;

/// Per-dimension evaluation of a finished interview, each 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscores {
    pub skills_match: u32,
    pub experience_relevance: u32,
    pub communication: u32,
    pub cultural_fit: u32,
}

impl Subscores {
    fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("skills_match", self.skills_match),
            ("experience_relevance", self.experience_relevance),
            ("communication", self.communication),
            ("cultural_fit", self.cultural_fit),
        ] {
            if value > 100 {
                return Err(ScoringError::OutOfRange {
                    subscore: name,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Final scoring decision for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub subscores: Subscores,
    /// Weighted overall score, 0..=100
    pub overall: u32,
    pub passes: bool,
}

/// Compute the weighted overall score and pass/fail decision.
///
/// `overall = round(0.35*skills + 0.30*experience + 0.20*communication
/// + 0.15*cultural)`. Any subscore outside 0..=100 is a
/// [`ScoringError::OutOfRange`]; no partial scoring happens.
pub fn score(subscores: Subscores) -> Result<ScoreReport, ScoringError> {
    subscores.validate()?;

    let weighted = WEIGHT_SKILLS_MATCH * f64::from(subscores.skills_match)
        + WEIGHT_EXPERIENCE_RELEVANCE * f64::from(subscores.experience_relevance)
        + WEIGHT_COMMUNICATION * f64::from(subscores.communication)
        + WEIGHT_CULTURAL_FIT * f64::from(subscores.cultural_fit);
    let overall = weighted.round() as u32;

    Ok(ScoreReport {
        subscores,
        overall,
        passes: overall >= PASS_THRESHOLD,
    })
}
