//! Canonical spin-record artifact.
//!
//! One record per completed spin, suitable for auditing a reveal after the
//! fact: which list (by canonical digest), which draw, which trajectory,
//! and under which engine build. The `id` derives from the canonical bytes
//! of the record payload, so two identical spins over the same list and
//! timestamp produce the same id.

use serde::{Deserialize, Serialize};

use reel_core::entities::Candidate;
use reel_io::digest;

use crate::machine::SettledSpin;
use crate::EngineError;

/// Engine identifiers (baked by the build system in real deployments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Plan echo: the trajectory facts a reader needs to re-check the reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEcho {
    pub winner_index: usize,
    pub candidate_count: usize,
    pub repetitions: u32,
    pub extra_cycles: u32,
    pub final_offset: i64,
    pub duration_ms: u32,
}

/// The reported winner (identity + label, nothing more).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerBlock {
    pub candidate_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinRecordDoc {
    /// "SPIN:<YYYY-MM-DDTHH:MM:SSZ>:<sha256-hex>"
    pub id: String,
    pub timestamp_utc: String,
    pub engine: EngineMeta,
    /// Canonical digest of the candidate list the draw ran over.
    pub candidates_sha256: String,
    /// Present only when a fixed seed was supplied; entropy-seeded spins
    /// record nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub plan: PlanEcho,
    pub winner: WinnerBlock,
}

/// Build the canonical record for one completed spin.
pub fn build_spin_record(
    timestamp_utc: &str,
    engine: EngineMeta,
    candidates: &[Candidate],
    seed: Option<u64>,
    settled: &SettledSpin,
) -> Result<SpinRecordDoc, EngineError> {
    let candidates_sha256 = digest::sha256_canonical(&candidates)?;

    let plan = PlanEcho {
        winner_index: settled.plan.winner_index,
        candidate_count: settled.plan.candidate_count,
        repetitions: settled.plan.repetitions,
        extra_cycles: settled.plan.extra_cycles,
        final_offset: settled.plan.final_offset,
        duration_ms: settled.plan.duration_ms,
    };
    let winner = WinnerBlock {
        candidate_id: settled.candidate.candidate_id.to_string(),
        title: settled.candidate.title.clone(),
    };

    #[derive(Serialize)]
    struct RecordNoId<'a> {
        timestamp_utc: &'a str,
        engine: &'a EngineMeta,
        candidates_sha256: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        plan: &'a PlanEcho,
        winner: &'a WinnerBlock,
    }
    let no_id = RecordNoId {
        timestamp_utc,
        engine: &engine,
        candidates_sha256: &candidates_sha256,
        seed,
        plan: &plan,
        winner: &winner,
    };
    let id = digest::spin_id_from_canonical(timestamp_utc, &no_id)?;

    Ok(SpinRecordDoc {
        id,
        timestamp_utc: timestamp_utc.to_string(),
        engine,
        candidates_sha256,
        seed,
        plan,
        winner,
    })
}

/// Engine identifiers for spin records (env-overridable at build time).
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: option_env!("REEL_ENGINE_VENDOR").unwrap_or("reel").to_string(),
        name: option_env!("REEL_ENGINE_NAME")
            .unwrap_or(env!("CARGO_PKG_NAME"))
            .to_string(),
        version: option_env!("REEL_ENGINE_VERSION")
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
        build: option_env!("REEL_ENGINE_BUILD").unwrap_or("dev").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_algo::plan_for_winner;
    use reel_core::layout::{ReelLayout, SpinTuning};

    const TS: &str = "2026-08-04T10:00:00Z";

    fn fixture() -> (Vec<Candidate>, SettledSpin) {
        let candidates: Vec<Candidate> = (0..3)
            .map(|i| Candidate {
                candidate_id: format!("film:{i}").parse().unwrap(),
                title: format!("Film {i}"),
                year: Some(1970 + i as u16),
                rating_tenths: Some(40),
            })
            .collect();
        let plan = plan_for_winner(1, 3, &ReelLayout::default(), &SpinTuning::default());
        let settled = SettledSpin {
            winner_index: 1,
            candidate: candidates[1].clone(),
            plan,
        };
        (candidates, settled)
    }

    #[test]
    fn record_id_is_reproducible() {
        let (candidates, settled) = fixture();
        let a = build_spin_record(TS, engine_identifiers(), &candidates, Some(42), &settled).unwrap();
        let b = build_spin_record(TS, engine_identifiers(), &candidates, Some(42), &settled).unwrap();
        assert!(a.id.starts_with("SPIN:2026-08-04T10:00:00Z:"));
        assert_eq!(a.id, b.id);
        assert_eq!(a.candidates_sha256, b.candidates_sha256);
    }

    #[test]
    fn seed_echo_changes_identity() {
        let (candidates, settled) = fixture();
        let with = build_spin_record(TS, engine_identifiers(), &candidates, Some(42), &settled).unwrap();
        let without = build_spin_record(TS, engine_identifiers(), &candidates, None, &settled).unwrap();
        assert_ne!(with.id, without.id);
        assert_eq!(without.seed, None);
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let (candidates, settled) = fixture();
        let err = build_spin_record(
            "2026-08-04 10:00:00",
            engine_identifiers(),
            &candidates,
            None,
            &settled,
        )
        .err()
        .unwrap();
        assert!(matches!(err, EngineError::Record(_)));
    }

    #[test]
    fn record_round_trips_as_json() {
        let (candidates, settled) = fixture();
        let rec = build_spin_record(TS, engine_identifiers(), &candidates, Some(7), &settled).unwrap();
        let json = serde_json::to_string(&rec).unwrap();
        let back: SpinRecordDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, rec.id);
        assert_eq!(back.winner.candidate_id, "film:1");
        assert_eq!(back.plan.winner_index, 1);
    }
}
