//! reel_core — Core types, domains, and deterministic RNG for the reel engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`reel_io`, `reel_algo`, `reel_engine`, `reel_cli`).
//!
//! - Candidate identity: `CandidateId` token + `Candidate` display payload
//! - Reel geometry: `ReelLayout` (per-item extent, visible window, repetitions)
//! - Spin tuning: `SpinTuning` (cycle heuristics, duration scaling)
//! - Seedable RNG (ChaCha20) for **winner draws only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        DomainOutOfRange(&'static str),
        EmptyCandidateList,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::EmptyCandidateList => write!(f, "empty candidate list"),
            }
        }
    }
}

pub mod entities;
pub mod layout;
pub mod rng;
