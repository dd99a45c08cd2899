//! reel_engine — spin state machine over the trajectory planner
//! (arm → spin → tick → settled, exactly one reported winner per spin).
//!
//! This crate stays rendering-free: hosts drive `tick()` from whatever loop
//! they have and read `current_offset()` if they draw frames. JSON shape,
//! canonicalization, and hashing are delegated to `reel_io`; trajectory math
//! to `reel_algo`.

#![forbid(unsafe_code)]

use core::fmt;

use reel_algo::PlanError;
use reel_core::errors::CoreError;

pub mod clock;
pub mod machine;
pub mod record;

pub use clock::{ManualClock, SpinClock, SystemClock};
pub use machine::{ReelState, SettledSpin, SpinEngine, SpinStart};
pub use reel_algo::SpinPlan;
pub use record::{build_spin_record, engine_identifiers, EngineMeta, PlanEcho, SpinRecordDoc, WinnerBlock};

/// Single error surface for the engine orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Spin attempted with zero candidates — rejected before any state change.
    EmptyCandidateList,
    /// Candidate-list replacement attempted mid-flight (the list is frozen
    /// for the duration of a spin).
    AlreadySpinning,
    /// Layout/tuning rejected at construction. Fatal configuration error,
    /// never a per-spin condition.
    Layout(&'static str),
    /// Spin-record building failures (canonicalization/digest).
    Record(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyCandidateList => write!(f, "empty candidate list"),
            EngineError::AlreadySpinning => write!(f, "a spin is already in flight"),
            EngineError::Layout(k) => write!(f, "invalid layout: {k}"),
            EngineError::Record(m) => write!(f, "record error: {m}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::EmptyCandidateList => EngineError::EmptyCandidateList,
            CoreError::DomainOutOfRange(k) => EngineError::Layout(k),
            CoreError::InvalidToken => EngineError::Layout("token"),
        }
    }
}

impl From<PlanError> for EngineError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::NoCandidates => EngineError::EmptyCandidateList,
        }
    }
}

impl From<reel_io::IoError> for EngineError {
    fn from(e: reel_io::IoError) -> Self {
        EngineError::Record(e.to_string())
    }
}
