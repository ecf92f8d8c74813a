//! Protocol enforcement: time and step budgets
//!
//! A stateless gate that runs before any other turn processing. It only
//! reads session timestamps and counters; termination itself is applied by
//! the caller.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Default interview time budget: 30 minutes.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(30 * 60);

/// Fixed text returned when the time budget runs out mid-interview.
pub const TIME_UP_MESSAGE: &str =
    "We're at the end of our scheduled time, so I'll stop here. Thanks for talking with me today.";

/// Why continuation was vetoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Elapsed time exceeded the budget
    TimeBudgetExhausted,
    /// Every scripted step has been asked
    ScriptExhausted,
}

/// Outcome of a protocol check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allow: bool,
    pub reason: Option<StopReason>,
}

impl Verdict {
    fn allow() -> Self {
        Self {
            allow: true,
            reason: None,
        }
    }

    fn stop(reason: StopReason) -> Self {
        Self {
            allow: false,
            reason: Some(reason),
        }
    }
}

/// Time/step budget gate.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolEnforcer {
    max_duration: Duration,
}

impl Default for ProtocolEnforcer {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_DURATION,
        }
    }
}

impl ProtocolEnforcer {
    pub fn new(max_duration: Duration) -> Self {
        Self { max_duration }
    }

    /// Decide whether the interview may continue. Pure read, no mutation.
    pub fn check(&self, session: &Session, now: DateTime<Utc>) -> Verdict {
        let elapsed = (now - session.started_at())
            .to_std()
            .unwrap_or(Duration::ZERO);
        if elapsed > self.max_duration {
            return Verdict::stop(StopReason::TimeBudgetExhausted);
        }
        if session.current_step_index() >= session.total_steps() {
            return Verdict::stop(StopReason::ScriptExhausted);
        }
        Verdict::allow()
    }
}
