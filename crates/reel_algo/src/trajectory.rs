//! Trajectory planning: draw a winner, place its landing instance in the
//! middle of the virtual reel, and pad the approach with whole forward
//! cycles (deterministic; integers only; RNG used only for the draw).
//!
//! Contract:
//! - The candidate count must be >= 1; geometry/tuning are pre-validated.
//! - The offset is forward-only: at least one full pass of the list, never
//!   negative, never reversing.
//! - The padded landing slot stays strictly inside the materialized-length
//!   reel (`target_slot + extra_cycles * N < repetitions * N`), off the
//!   first and last repetition blocks.
//! - When the reel rests at `final_offset`, the slot centered in the visible
//!   window maps back to exactly `winner_index`.

use reel_core::layout::{ReelLayout, SpinTuning};
use reel_core::rng::{DrawCrumb, SpinRng};

use crate::easing::ease_out_q16;

/// Errors for trajectory planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// No candidates to spin over; rejected before any draw.
    NoCandidates,
}

/// Computed per spin: the draw plus the full scroll trajectory to reveal it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinPlan {
    /// 0-based index into the original candidate list.
    pub winner_index: usize,
    /// List size the plan was computed for.
    pub candidate_count: usize,
    /// Reel repetitions the plan was computed for.
    pub repetitions: u32,
    /// Winner's landing slot in the middle repetition block.
    pub target_slot: u64,
    /// Offset centering `target_slot`, before cycle padding.
    pub raw_offset: i64,
    /// Whole extra cycles appended after `target_slot`.
    pub extra_cycles: u32,
    /// Terminal scroll offset the reel animates to.
    pub final_offset: i64,
    /// Scheduled animation time.
    pub duration_ms: u32,
}

impl SpinPlan {
    /// Slot centered in the visible window when the reel rests at
    /// `final_offset`.
    pub fn settled_slot(&self, layout: &ReelLayout) -> u64 {
        ((self.final_offset + layout.center_offset()) / layout.item_extent() as i64) as u64
    }

    /// Candidate index visually centered at settle. Equals `winner_index`
    /// by construction; exposed so hosts and tests can assert the match.
    pub fn settled_candidate(&self, layout: &ReelLayout) -> usize {
        layout.slot_candidate(self.settled_slot(layout), self.candidate_count)
    }

    /// Eased scroll position `elapsed_ms` into the spin. Clamps to
    /// `final_offset` at and after `duration_ms`; monotonically
    /// non-decreasing in between.
    pub fn offset_at_ms(&self, elapsed_ms: u64) -> i64 {
        if elapsed_ms >= self.duration_ms as u64 {
            return self.final_offset;
        }
        let p_q16 = ((elapsed_ms << 16) / self.duration_ms as u64) as u32;
        let eased = ease_out_q16(p_q16) as i128;
        ((self.final_offset as i128 * eased) >> 16) as i64
    }
}

/// Draw a winner uniformly from `[0, candidate_count)` and plan the scroll
/// trajectory that reveals it.
pub fn plan_spin(
    candidate_count: usize,
    layout: &ReelLayout,
    tuning: &SpinTuning,
    rng: &mut SpinRng,
) -> Result<SpinPlan, PlanError> {
    if candidate_count == 0 {
        return Err(PlanError::NoCandidates);
    }
    let winner_index = match rng.gen_range(candidate_count as u64) {
        Some(v) => v as usize,
        None => unreachable!("gen_range(>0) must return Some"),
    };
    Ok(plan_for_winner(winner_index, candidate_count, layout, tuning))
}

/// Same as `plan_spin`, but also returns the draw's audit crumb.
pub fn plan_spin_with_crumb(
    ctx: &str,
    candidate_count: usize,
    layout: &ReelLayout,
    tuning: &SpinTuning,
    rng: &mut SpinRng,
) -> Result<(SpinPlan, DrawCrumb), PlanError> {
    if candidate_count == 0 {
        return Err(PlanError::NoCandidates);
    }
    let (winner_index, crumb) = match rng.pick_index_with_crumb(ctx, candidate_count as u64) {
        Some(p) => p,
        None => unreachable!("pick over a non-empty set must return Some"),
    };
    Ok((
        plan_for_winner(winner_index, candidate_count, layout, tuning),
        crumb,
    ))
}

/// Deterministic tail of the planner: everything after the draw.
pub fn plan_for_winner(
    winner_index: usize,
    candidate_count: usize,
    layout: &ReelLayout,
    tuning: &SpinTuning,
) -> SpinPlan {
    debug_assert!(candidate_count >= 1);
    debug_assert!(winner_index < candidate_count);

    let n = candidate_count as u64;
    let reps = layout.repetitions() as u64;
    let extent = layout.item_extent() as i64;

    // Middle repetition block keeps the landing instance away from both
    // reel edges (no visible wrap artifacts).
    let target_slot = (reps / 2) * n + winner_index as u64;
    let raw_offset = target_slot as i64 * extent - layout.center_offset();

    // Whole cycles that still fit between the target and the end of the reel.
    let remaining = reps * n - target_slot - 1;
    let max_extra = (remaining / n) as u32;
    let extra_cycles = tuning.desired_cycles(candidate_count).min(max_extra);

    let final_offset = raw_offset + extra_cycles as i64 * n as i64 * extent;

    SpinPlan {
        winner_index,
        candidate_count,
        repetitions: layout.repetitions(),
        target_slot,
        raw_offset,
        extra_cycles,
        final_offset,
        duration_ms: tuning.duration_ms(candidate_count),
    }
}
