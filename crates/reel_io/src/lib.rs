//! reel_io — minimal, single-source-of-truth I/O crate.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - No inline implementations: the file modules own the logic.
//! - No network I/O anywhere; candidate files and artifacts are local only.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for reel_io (used by canonical/digest/loader).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem read errors.
    #[error("read error: {0}")]
    Read(String),

    /// Filesystem write errors (create_dir_all, rename, fsync, etc.)
    #[error("write error: {0}")]
    Write(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Candidate-list shape/domain failures (duplicates, bad tokens, ranges).
    #[error("candidate list error: {0}")]
    Candidates(String),

    /// Canonicalization errors.
    #[error("canonicalization error: {0}")]
    Canon(String),

    /// Hashing / ID-builder errors (bad timestamps and the like).
    #[error("hash error: {0}")]
    Hash(String),

    /// Path errors (missing file, not a regular file).
    #[error("path error: {0}")]
    Path(String),

    /// Input byte-cap exceeded.
    #[error("input limit exceeded: {0}")]
    Limit(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Read(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root. Callers may
        // enrich this at higher layers.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

/* ---------------- Public modules (single source of truth) ---------------- */

pub mod canonical;
pub mod digest;
pub mod loader;

/* ---------------- Public prelude ---------------- */

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical;
    pub use crate::digest;
    pub use crate::loader;

    pub use crate::canonical::to_canonical_bytes;
    pub use crate::digest::sha256_hex;
    pub use crate::loader::load_candidates;
}
