//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: UTF-8, sorted object keys, array order preserved.
//! - Spin-record IDs derive from canonical bytes:
//!   `SPIN:<YYYY-MM-DDTHH:MM:SSZ>:<sha256-hex>`.
//! - Hex digests are **lowercase**.

use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{canonical, IoError};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&canonical::to_canonical_bytes(value)?))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::Read(e.to_string()))?;
    Ok(sha256_hex(&bytes))
}

/// Strict RFC3339-like UTC seconds check: "YYYY-MM-DDTHH:MM:SSZ" (length 20).
pub fn is_ts_utc_z(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 20 {
        return false;
    }
    matches!(b[4], b'-')
        && matches!(b[7], b'-')
        && matches!(b[10], b'T')
        && matches!(b[13], b':')
        && matches!(b[16], b':')
        && matches!(b[19], b'Z')
        && b.iter().enumerate().all(|(i, c)| match i {
            0..=3 | 5..=6 | 8..=9 | 11..=12 | 14..=15 | 17..=18 => matches!(c, b'0'..=b'9'),
            4 | 7 | 10 | 13 | 16 | 19 => true,
            _ => false,
        })
}

/// `SPIN:<ts>:<hex>` — ID for `spin_record.json` from pre-canonicalized bytes.
pub fn spin_id_from_bytes(timestamp_utc: &str, canonical_bytes: &[u8]) -> Result<String, IoError> {
    if !is_ts_utc_z(timestamp_utc) {
        return Err(IoError::Hash(format!(
            "invalid timestamp (expected YYYY-MM-DDTHH:MM:SSZ): {timestamp_utc}"
        )));
    }
    Ok(format!(
        "SPIN:{timestamp_utc}:{}",
        sha256_hex(canonical_bytes)
    ))
}

/// Convenience: build a SPIN id from a serializable payload (canonicalized
/// internally).
pub fn spin_id_from_canonical<T: Serialize>(
    timestamp_utc: &str,
    value: &T,
) -> Result<String, IoError> {
    let bytes = canonical::to_canonical_bytes(value)?;
    spin_id_from_bytes(timestamp_utc, &bytes)
}
