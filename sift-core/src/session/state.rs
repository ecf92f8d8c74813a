//! Session struct and state machine
//!
//! A [`Session`] is one candidate's run through the script, holding all
//! mutable progression state. Mutation goes through guarded methods so the
//! structural invariants hold regardless of caller: `current_step_index`
//! and `context_window_index` never decrease, and a completed step never
//! reverts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::script::{Step, StepId};

/// Default follow-up budget per step.
pub const DEFAULT_MAX_FOLLOW_UPS: u32 = 1;

/// Number of contiguous context windows the script is partitioned into.
pub const CONTEXT_WINDOWS: u32 = 3;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new session ID with a UUIDv7 (time-ordered).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classified quality of a candidate's answer to one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerQuality {
    /// No answer recorded yet
    None,
    /// An answer that needs a follow-up
    Partial,
    /// A sufficient answer
    Complete,
}

/// Mutable per-step answer state.
///
/// Invariant: `completed` implies either a `Complete` quality or a consumed
/// second chance with no response. Once set, `completed` never reverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    pub has_response: bool,
    pub quality: AnswerQuality,
    pub raw_answer: Option<String>,
    pub follow_up_count: u32,
    pub max_follow_ups: u32,
    pub second_chance_used: bool,
    completed: bool,
}

impl Default for StepResponse {
    fn default() -> Self {
        Self {
            has_response: false,
            quality: AnswerQuality::None,
            raw_answer: None,
            follow_up_count: 0,
            max_follow_ups: DEFAULT_MAX_FOLLOW_UPS,
            second_chance_used: false,
            completed: false,
        }
    }
}

impl StepResponse {
    /// Record a classified answer.
    pub fn record_answer(&mut self, quality: AnswerQuality, raw: &str) {
        self.has_response = true;
        self.quality = quality;
        self.raw_answer = Some(raw.to_string());
    }

    /// Consume the one-time second chance. Returns `false` when it was
    /// already used.
    pub fn use_second_chance(&mut self) -> bool {
        if self.second_chance_used {
            return false;
        }
        self.second_chance_used = true;
        true
    }

    /// Whether another follow-up may be asked on this step.
    pub fn follow_up_available(&self) -> bool {
        self.follow_up_count < self.max_follow_ups
    }

    /// Count one follow-up against the budget.
    pub fn note_follow_up(&mut self) {
        debug_assert!(self.follow_up_available());
        self.follow_up_count += 1;
    }

    /// Mark this step done. One-way: there is no way to un-complete.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Complete this step as skipped: the candidate never answered it.
    ///
    /// Clears any partial answer recorded before the silence, so a skipped
    /// step always reads `has_response = false, quality = None`.
    pub fn mark_skipped(&mut self) {
        self.has_response = false;
        self.quality = AnswerQuality::None;
        self.raw_answer = None;
        self.completed = true;
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

/// Append-only interviewer notes accumulated over the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    key_points: Vec<String>,
    strengths: Vec<String>,
    concerns: Vec<String>,
}

impl SessionMemory {
    pub fn add_key_point(&mut self, point: impl Into<String>) {
        self.key_points.push(point.into());
    }

    pub fn add_strength(&mut self, strength: impl Into<String>) {
        self.strengths.push(strength.into());
    }

    pub fn add_concern(&mut self, concern: impl Into<String>) {
        self.concerns.push(concern.into());
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn concerns(&self) -> &[String] {
        &self.concerns
    }
}

/// Coarse lifecycle phase of a session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, no candidate turn processed yet
    NotStarted,
    /// Mid-script
    InProgress,
    /// All steps completed
    Completed,
    /// Terminated by the time budget
    TimedOut,
}

impl SessionPhase {
    /// Terminal phases accept no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::TimedOut)
    }
}

/// Caller-facing progress report, returned on every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_step_index: usize,
    pub total_steps: usize,
    pub context_window_index: u32,
    /// Fraction of steps completed, as a percentage
    pub completion_rate: f64,
    pub interview_complete: bool,
}

/// One candidate's run through the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    candidate_id: String,
    requirement_id: String,
    /// Script cached at creation; the source is never queried again
    steps: Vec<Step>,
    current_step_index: usize,
    context_window_index: u32,
    responses: HashMap<StepId, StepResponse>,
    memory: SessionMemory,
    interview_complete: bool,
    timed_out: bool,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    /// Create a session over a validated script.
    ///
    /// Steps are sorted by `order` so `current_step_index` indexes the
    /// script directly.
    pub fn new(
        candidate_id: impl Into<String>,
        requirement_id: impl Into<String>,
        mut steps: Vec<Step>,
        now: DateTime<Utc>,
    ) -> Self {
        steps.sort_by_key(|s| s.order);
        Self {
            id: SessionId::new(),
            candidate_id: candidate_id.into(),
            requirement_id: requirement_id.into(),
            steps,
            current_step_index: 0,
            context_window_index: 0,
            responses: HashMap::new(),
            memory: SessionMemory::default(),
            interview_complete: false,
            timed_out: false,
            started_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn requirement_id(&self) -> &str {
        &self.requirement_id
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn context_window_index(&self) -> u32 {
        self.context_window_index
    }

    pub fn interview_complete(&self) -> bool {
        self.interview_complete
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SessionMemory {
        &mut self.memory
    }

    /// The step the candidate is currently being asked, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_step_index)
    }

    /// Answer state for a step, created lazily on first access.
    pub fn response_mut(&mut self, step_id: StepId) -> &mut StepResponse {
        self.responses.entry(step_id).or_default()
    }

    pub fn response(&self, step_id: StepId) -> Option<&StepResponse> {
        self.responses.get(&step_id)
    }

    /// Derived lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.timed_out {
            SessionPhase::TimedOut
        } else if self.interview_complete {
            SessionPhase::Completed
        } else if self.current_step_index == 0 && self.responses.is_empty() {
            SessionPhase::NotStarted
        } else {
            SessionPhase::InProgress
        }
    }

    /// Record candidate activity for idle-sweep purposes.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    /// Move to the next step. Marks the interview complete when the script
    /// is exhausted, and recomputes context window membership.
    pub fn advance_step(&mut self) {
        self.current_step_index += 1;
        if self.current_step_index >= self.steps.len() {
            self.interview_complete = true;
        }
        self.maybe_advance_window();
    }

    /// Terminate the session because the time budget ran out.
    pub fn mark_timed_out(&mut self) {
        self.timed_out = true;
        self.interview_complete = true;
    }

    /// Size of one context window: `ceil(total_steps / 3)`.
    fn window_size(&self) -> usize {
        self.steps.len().div_ceil(CONTEXT_WINDOWS as usize)
    }

    /// Bump the window index when every step in the current window is
    /// completed. Never exceeds window 2.
    fn maybe_advance_window(&mut self) {
        if self.context_window_index < CONTEXT_WINDOWS - 1 && self.current_window_complete() {
            self.context_window_index += 1;
        }
    }

    fn current_window_complete(&self) -> bool {
        let size = self.window_size();
        let start = self.context_window_index as usize * size;
        if size == 0 || start >= self.steps.len() {
            return false;
        }
        let end = (start + size).min(self.steps.len());
        self.steps[start..end]
            .iter()
            .all(|step| self.responses.get(&step.id).is_some_and(|r| r.completed()))
    }

    /// Fraction of steps completed, as a percentage.
    pub fn completion_rate(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let completed = self
            .steps
            .iter()
            .filter(|step| self.responses.get(&step.id).is_some_and(|r| r.completed()))
            .count();
        completed as f64 / self.steps.len() as f64 * 100.0
    }

    /// Current progress for the caller.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_step_index: self.current_step_index,
            total_steps: self.steps.len(),
            context_window_index: self.context_window_index,
            completion_rate: self.completion_rate(),
            interview_complete: self.interview_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Step;

    fn session(n: usize) -> Session {
        let steps = (0..n)
            .map(|i| Step::static_question(i, format!("Question {i}?")))
            .collect();
        Session::new("cand", "req", steps, Utc::now())
    }

    fn complete_current(s: &mut Session) {
        let id = s.current_step().unwrap().id;
        let r = s.response_mut(id);
        r.record_answer(AnswerQuality::Complete, "an answer");
        r.mark_completed();
        s.advance_step();
    }

    #[test]
    fn new_session_starts_at_step_zero_window_zero() {
        let s = session(9);
        assert_eq!(s.current_step_index(), 0);
        assert_eq!(s.context_window_index(), 0);
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert!(!s.interview_complete());
    }

    #[test]
    fn completed_never_reverts() {
        let mut r = StepResponse::default();
        r.mark_completed();
        r.record_answer(AnswerQuality::Partial, "late edit");
        assert!(r.completed());
    }

    #[test]
    fn mark_skipped_clears_a_previously_recorded_answer() {
        let mut r = StepResponse::default();
        r.record_answer(AnswerQuality::Partial, "bits of an answer");
        r.use_second_chance();
        r.mark_skipped();
        assert!(r.completed());
        assert!(!r.has_response);
        assert_eq!(r.quality, AnswerQuality::None);
        assert_eq!(r.raw_answer, None);
    }

    #[test]
    fn second_chance_consumed_at_most_once() {
        let mut r = StepResponse::default();
        assert!(r.use_second_chance());
        assert!(!r.use_second_chance());
        assert!(r.second_chance_used);
    }

    #[test]
    fn window_advances_only_when_window_fully_completed() {
        let mut s = session(9);
        complete_current(&mut s);
        complete_current(&mut s);
        assert_eq!(s.context_window_index(), 0);
        complete_current(&mut s);
        assert_eq!(s.context_window_index(), 1);
    }

    #[test]
    fn window_never_exceeds_two() {
        let mut s = session(6);
        for _ in 0..6 {
            complete_current(&mut s);
        }
        assert_eq!(s.context_window_index(), 2);
        assert!(s.interview_complete());
        assert_eq!(s.phase(), SessionPhase::Completed);
    }

    #[test]
    fn window_size_rounds_up_for_uneven_scripts() {
        // 7 steps -> windows of 3: [0..3), [3..6), [6..7)
        let mut s = session(7);
        for _ in 0..3 {
            complete_current(&mut s);
        }
        assert_eq!(s.context_window_index(), 1);
        for _ in 0..3 {
            complete_current(&mut s);
        }
        assert_eq!(s.context_window_index(), 2);
    }

    #[test]
    fn incomplete_step_holds_window_back() {
        let mut s = session(9);
        // Skip step 0 without completing it, then complete 1 and 2.
        s.advance_step();
        complete_current(&mut s);
        complete_current(&mut s);
        assert_eq!(s.context_window_index(), 0);
    }

    #[test]
    fn completion_rate_is_percentage() {
        let mut s = session(4);
        complete_current(&mut s);
        assert!((s.completion_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn timed_out_phase_is_terminal() {
        let mut s = session(4);
        s.mark_timed_out();
        assert_eq!(s.phase(), SessionPhase::TimedOut);
        assert!(s.phase().is_terminal());
        assert!(s.interview_complete());
    }

    #[test]
    fn session_survives_a_serde_round_trip() {
        let mut s = session(3);
        complete_current(&mut s);
        s.memory_mut().add_strength("clear communicator");
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn snapshot_reflects_progress() {
        let mut s = session(4);
        complete_current(&mut s);
        let snap = s.snapshot();
        assert_eq!(snap.current_step_index, 1);
        assert_eq!(snap.total_steps, 4);
        assert!(!snap.interview_complete);
    }
}
