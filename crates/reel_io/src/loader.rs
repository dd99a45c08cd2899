//! Loader: read a local candidate-list JSON file, validate tokens and
//! domains, reject duplicate ids, and preserve caller order. No network I/O.
//!
//! Empty lists load successfully; spinning over one is the engine's call to
//! reject. Unknown JSON keys are ignored so collaborators can carry extra
//! display fields without breaking us.

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use reel_core::entities::{validate_candidate, Candidate, CandidateId};

use crate::{digest, IoError};

/// Input byte cap for candidate files.
pub const MAX_CANDIDATE_FILE_BYTES: u64 = 4 * 1024 * 1024;

/// A loaded, validated candidate list plus its canonical digest (the
/// identity echoed into spin records).
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub candidates: Vec<Candidate>,
    pub candidates_sha256: String,
}

/// Load and validate a candidate file.
pub fn load_candidates(path: &Path) -> Result<CandidateFile, IoError> {
    let bytes = read_with_limit(path, MAX_CANDIDATE_FILE_BYTES)?;

    #[derive(Deserialize)]
    struct RawFile {
        candidates: Vec<Candidate>,
    }
    let raw: RawFile = serde_json::from_slice(&bytes)?;

    let mut seen: BTreeSet<CandidateId> = BTreeSet::new();
    for c in &raw.candidates {
        validate_candidate(c).map_err(|e| IoError::Candidates(format!("{}: {e}", c.candidate_id)))?;
        if !seen.insert(c.candidate_id.clone()) {
            return Err(IoError::Candidates(format!(
                "duplicate candidate_id {}",
                c.candidate_id
            )));
        }
    }

    let candidates_sha256 = digest::sha256_canonical(&raw.candidates)?;
    Ok(CandidateFile {
        candidates: raw.candidates,
        candidates_sha256,
    })
}

fn read_with_limit(path: &Path, cap: u64) -> Result<Vec<u8>, IoError> {
    let meta =
        std::fs::metadata(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if !meta.is_file() {
        return Err(IoError::Path(format!("not a file: {}", path.display())));
    }
    if meta.len() > cap {
        return Err(IoError::Limit(format!(
            "{} is {} bytes (cap {cap})",
            path.display(),
            meta.len()
        )));
    }
    let mut buf = Vec::with_capacity(meta.len() as usize);
    let mut f = File::open(path).map_err(|e| IoError::Read(e.to_string()))?;
    f.read_to_end(&mut buf)
        .map_err(|e| IoError::Read(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_ordered_list_with_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "films.json",
            r#"{
                "schema_version": "1.x",
                "candidates": [
                    {"candidate_id":"film:2917","title":"Stalker","year":1979,"rating_tenths":43},
                    {"candidate_id":"film:0001","title":"Ran"}
                ]
            }"#,
        );
        let file = load_candidates(&path).unwrap();
        assert_eq!(file.candidates.len(), 2);
        // Caller order preserved, not sorted.
        assert_eq!(file.candidates[0].title, "Stalker");
        assert_eq!(file.candidates[0].rating_tenths, Some(43));
        assert_eq!(file.candidates[1].year, None);
        assert_eq!(file.candidates_sha256.len(), 64);
    }

    #[test]
    fn empty_list_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.json", r#"{"candidates":[]}"#);
        assert!(load_candidates(&path).unwrap().candidates.is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "dup.json",
            r#"{"candidates":[
                {"candidate_id":"film:1","title":"A"},
                {"candidate_id":"film:1","title":"B"}
            ]}"#,
        );
        match load_candidates(&path) {
            Err(IoError::Candidates(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected Candidates error, got {other:?}"),
        }
    }

    #[test]
    fn bad_token_rejected_at_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "tok.json",
            r#"{"candidates":[{"candidate_id":"has space","title":"A"}]}"#,
        );
        assert!(matches!(load_candidates(&path), Err(IoError::Json { .. })));
    }

    #[test]
    fn rating_domain_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "rating.json",
            r#"{"candidates":[{"candidate_id":"film:1","title":"A","rating_tenths":99}]}"#,
        );
        assert!(matches!(
            load_candidates(&path),
            Err(IoError::Candidates(_))
        ));
    }

    #[test]
    fn byte_cap_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "big.json", r#"{"candidates":[]}"#);
        assert!(matches!(
            read_with_limit(&path, 4),
            Err(IoError::Limit(_))
        ));
    }

    #[test]
    fn missing_file_is_a_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(load_candidates(&path), Err(IoError::Path(_))));
    }

    #[test]
    fn digest_is_order_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(
            &dir,
            "a.json",
            r#"{"candidates":[{"candidate_id":"f:1","title":"A"},{"candidate_id":"f:2","title":"B"}]}"#,
        );
        let b = write_file(
            &dir,
            "b.json",
            r#"{"candidates":[{"candidate_id":"f:2","title":"B"},{"candidate_id":"f:1","title":"A"}]}"#,
        );
        let da = load_candidates(&a).unwrap().candidates_sha256;
        let db = load_candidates(&b).unwrap().candidates_sha256;
        assert_ne!(da, db, "array order is part of list identity");
    }
}
