//! Interview script types and sources
//!
//! A script is an ordered, immutable list of [`Step`]s for one
//! candidate/requirement pair. The [`ScriptSource`] trait abstracts where
//! scripts come from; [`FixedScriptSource`] serves a pre-built list for
//! tests and offline use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScriptError;

/// Unique identifier for a scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub Uuid);

impl StepId {
    /// Create a new step ID with a UUIDv7 (time-ordered).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a step's text was produced upstream.
///
/// The engine treats all variants identically; the distinction matters to
/// script authors and analytics, not to progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// Fixed wording, identical for every candidate
    Static,
    /// Fixed wording with per-candidate placeholders, resolved upstream
    SemiStatic,
    /// Generated per candidate
    Dynamic,
    /// Generated from the candidate's relationship to the role
    Relational,
}

/// One immutable scripted question in the interview.
///
/// Template placeholders in `text` are resolved before the step reaches
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    /// Position in the script; unique and dense `0..total_steps`
    pub order: usize,
    pub step_type: StepType,
    /// Optional topic tag (e.g. "leadership", "tooling")
    pub focus_tag: Option<String>,
    pub text: String,
    pub notes: Option<String>,
}

impl Step {
    /// Convenience constructor for a static step at a given position.
    pub fn static_question(order: usize, text: impl Into<String>) -> Self {
        Self {
            id: StepId::new(),
            order,
            step_type: StepType::Static,
            focus_tag: None,
            text: text.into(),
            notes: None,
        }
    }
}

/// Source of interview scripts
///
/// Implementations may hit a database or a generation service. The manager
/// calls `load_steps` at most once per session and caches the result on the
/// session for its lifetime.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Load the ordered step list for a candidate/requirement pair.
    async fn load_steps(
        &self,
        candidate_id: &str,
        requirement_id: &str,
    ) -> Result<Vec<Step>, ScriptError>;
}

/// Validate a loaded script: non-empty, with unique dense orders `0..N`.
pub fn validate_script(
    steps: &[Step],
    candidate_id: &str,
    requirement_id: &str,
) -> Result<(), ScriptError> {
    if steps.is_empty() {
        return Err(ScriptError::EmptyScript {
            candidate_id: candidate_id.to_string(),
            requirement_id: requirement_id.to_string(),
        });
    }

    let mut seen = vec![false; steps.len()];
    for step in steps {
        match seen.get_mut(step.order) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(ScriptError::MalformedScript(format!(
                    "duplicate step order {}",
                    step.order
                )));
            }
            None => {
                return Err(ScriptError::MalformedScript(format!(
                    "step order {} out of range for {} steps",
                    step.order,
                    steps.len()
                )));
            }
        }
    }
    Ok(())
}

/// In-memory script source serving the same fixed list for every candidate.
pub struct FixedScriptSource {
    steps: Vec<Step>,
}

impl FixedScriptSource {
    /// Create a source from a pre-built step list.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Create a source from plain question texts, in order.
    pub fn from_questions<S: Into<String>>(questions: impl IntoIterator<Item = S>) -> Self {
        let steps = questions
            .into_iter()
            .enumerate()
            .map(|(order, text)| Step::static_question(order, text))
            .collect();
        Self { steps }
    }
}

#[async_trait]
impl ScriptSource for FixedScriptSource {
    async fn load_steps(
        &self,
        _candidate_id: &str,
        _requirement_id: &str,
    ) -> Result<Vec<Step>, ScriptError> {
        Ok(self.steps.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(n: usize) -> Vec<Step> {
        (0..n)
            .map(|i| Step::static_question(i, format!("Question {i}?")))
            .collect()
    }

    #[test]
    fn validate_accepts_dense_orders() {
        assert!(validate_script(&script(5), "c", "r").is_ok());
    }

    #[test]
    fn validate_rejects_empty_script() {
        let err = validate_script(&[], "c", "r").unwrap_err();
        assert!(matches!(err, ScriptError::EmptyScript { .. }));
    }

    #[test]
    fn validate_rejects_duplicate_order() {
        let mut steps = script(3);
        steps[2].order = 1;
        let err = validate_script(&steps, "c", "r").unwrap_err();
        assert!(matches!(err, ScriptError::MalformedScript(_)));
    }

    #[test]
    fn validate_rejects_order_gap() {
        let mut steps = script(3);
        steps[2].order = 7;
        let err = validate_script(&steps, "c", "r").unwrap_err();
        assert!(matches!(err, ScriptError::MalformedScript(_)));
    }

    #[tokio::test]
    async fn fixed_source_returns_steps_in_order() {
        let source = FixedScriptSource::from_questions(["one", "two", "three"]);
        let steps = source.load_steps("c", "r").await.unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].order, 1);
        assert_eq!(steps[1].text, "two");
    }
}
