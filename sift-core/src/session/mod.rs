//! Session state and storage

pub mod repository;
pub mod state;

// Re-export key types for convenience
pub use repository::{DEFAULT_IDLE_TTL, MemorySessionRepository, SessionRepository, idle_cutoff};
pub use state::{
    AnswerQuality, ProgressSnapshot, Session, SessionId, SessionMemory, SessionPhase, StepResponse,
};
