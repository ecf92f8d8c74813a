//! sift-core: scripted screening interview progression engine
//!
//! Walks a candidate through a fixed, ordered question script, decides
//! per answer whether to probe further or move on, tracks completion
//! across three context windows, and enforces the interview's time and
//! step budgets. LLM-backed collaborators (answer classification, Q&A,
//! follow-up wording) sit behind capability traits with deterministic
//! fallbacks, so the whole pipeline runs offline.
//!
//! Entry point: [`manager::InterviewManager`].

pub mod capability;
pub mod engine;
pub mod error;
pub mod interruption;
pub mod manager;
pub mod protocol;
pub mod script;
pub mod session;

// Re-export the main public surface
pub use engine::{CLOSING_MESSAGE, ProgressionEngine, TurnOutput};
pub use error::{CapabilityError, ScriptError, SessionError, SiftError};
pub use interruption::{InterruptionHandler, is_interruption};
pub use manager::InterviewManager;
pub use protocol::{ProtocolEnforcer, StopReason, TIME_UP_MESSAGE, Verdict};
pub use script::{FixedScriptSource, ScriptSource, Step, StepId, StepType};
pub use session::{
    AnswerQuality, MemorySessionRepository, ProgressSnapshot, Session, SessionId, SessionPhase,
    SessionRepository, StepResponse,
};
