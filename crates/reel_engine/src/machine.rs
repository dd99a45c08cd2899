//! Spin state machine: `Idle → Spinning → Settled`, re-armable from
//! `Settled`, never from `Spinning`.
//!
//! Invariants owned here:
//! - `spin()` while in flight is a safe no-op (`SpinStart::Ignored`), never
//!   an error surfaced to the user.
//! - Once a spin starts it runs to completion: `tick()` observing the
//!   deadline is the only exit from `Spinning`, and there is no cancel.
//! - Every started spin reports its winner exactly once, through the
//!   result callback and the returned `SettledSpin`.
//! - The candidate list is frozen while spinning; replacement is rejected.

use reel_algo::{plan_spin_with_crumb, SpinPlan};
use reel_core::entities::Candidate;
use reel_core::layout::{ReelLayout, SpinTuning};
use reel_core::rng::{DrawCrumb, SpinRng};

use crate::clock::SpinClock;
use crate::EngineError;

/// Lifecycle state. `Spinning` can only be left via `tick()`.
#[derive(Clone, Debug)]
pub enum ReelState {
    Idle,
    Spinning {
        plan: SpinPlan,
        started_ms: u64,
        deadline_ms: u64,
    },
    Settled {
        winner_index: usize,
        final_offset: i64,
    },
}

/// Outcome of a `spin()` call. `Ignored` is the defensive no-op while a
/// spin is in flight.
#[derive(Clone, Debug)]
pub enum SpinStart {
    Started(SpinPlan),
    Ignored,
}

/// Event emitted exactly once per completed spin.
#[derive(Clone, Debug)]
pub struct SettledSpin {
    pub winner_index: usize,
    pub candidate: Candidate,
    pub plan: SpinPlan,
}

type ResultCallback = Box<dyn FnMut(&SettledSpin)>;

/// The spin state machine. Owns the candidate list, geometry, tuning, RNG
/// stream, and the transient `ReelState` — nothing else.
pub struct SpinEngine<C: SpinClock> {
    candidates: Vec<Candidate>,
    layout: ReelLayout,
    tuning: SpinTuning,
    rng: SpinRng,
    clock: C,
    state: ReelState,
    spin_seq: u64,
    crumbs: Vec<DrawCrumb>,
    on_result: Option<ResultCallback>,
}

impl<C: SpinClock> SpinEngine<C> {
    /// Construct an engine. Geometry/tuning mismatches are fatal here, not
    /// per-spin. An empty candidate list is allowed at rest; `spin()` is
    /// what rejects it.
    pub fn new(
        candidates: Vec<Candidate>,
        layout: ReelLayout,
        tuning: SpinTuning,
        rng: SpinRng,
        clock: C,
    ) -> Result<Self, EngineError> {
        tuning.validate_layout(&layout)?;
        Ok(Self {
            candidates,
            layout,
            tuning,
            rng,
            clock,
            state: ReelState::Idle,
            spin_seq: 0,
            crumbs: Vec::new(),
            on_result: None,
        })
    }

    /// Install the result consumer. Invoked exactly once per completed spin.
    pub fn on_result(&mut self, cb: impl FnMut(&SettledSpin) + 'static) {
        self.on_result = Some(Box::new(cb));
    }

    pub fn state(&self) -> &ReelState {
        &self.state
    }

    pub fn layout(&self) -> &ReelLayout {
        &self.layout
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Draw audit trail: one crumb per started spin.
    pub fn crumbs(&self) -> &[DrawCrumb] {
        &self.crumbs
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, ReelState::Spinning { .. })
    }

    /// The settled candidate, if the last spin has completed.
    pub fn settled(&self) -> Option<&Candidate> {
        match self.state {
            ReelState::Settled { winner_index, .. } => self.candidates.get(winner_index),
            _ => None,
        }
    }

    /// Replace the candidate list. Rejected mid-flight; otherwise resets to
    /// `Idle` (a settled index must not dangle into a different list).
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) -> Result<(), EngineError> {
        if self.is_spinning() {
            return Err(EngineError::AlreadySpinning);
        }
        self.candidates = candidates;
        self.state = ReelState::Idle;
        Ok(())
    }

    /// Arm a spin: draw a winner, plan the trajectory, schedule the deadline.
    ///
    /// Empty list → error before any state change. In flight → `Ignored`.
    pub fn spin(&mut self) -> Result<SpinStart, EngineError> {
        if self.is_spinning() {
            return Ok(SpinStart::Ignored);
        }
        if self.candidates.is_empty() {
            return Err(EngineError::EmptyCandidateList);
        }

        self.spin_seq += 1;
        let ctx = format!("spin:{}/winner", self.spin_seq);
        let (plan, crumb) = plan_spin_with_crumb(
            &ctx,
            self.candidates.len(),
            &self.layout,
            &self.tuning,
            &mut self.rng,
        )?;
        self.crumbs.push(crumb);

        let started_ms = self.clock.now_ms();
        let deadline_ms = started_ms + plan.duration_ms as u64;
        self.state = ReelState::Spinning {
            plan: plan.clone(),
            started_ms,
            deadline_ms,
        };
        Ok(SpinStart::Started(plan))
    }

    /// Drive the completion timer. The only `Spinning → Settled` edge;
    /// returns the settle event (and fires the result callback) exactly
    /// once per spin, `None` otherwise.
    pub fn tick(&mut self) -> Option<SettledSpin> {
        let (plan, deadline_ms) = match &self.state {
            ReelState::Spinning {
                plan, deadline_ms, ..
            } => (plan.clone(), *deadline_ms),
            _ => return None,
        };
        if self.clock.now_ms() < deadline_ms {
            return None;
        }

        let winner_index = plan.winner_index;
        // The list is frozen while spinning, so the index cannot dangle.
        let candidate = self.candidates[winner_index].clone();
        self.state = ReelState::Settled {
            winner_index,
            final_offset: plan.final_offset,
        };
        let settled = SettledSpin {
            winner_index,
            candidate,
            plan,
        };
        if let Some(cb) = self.on_result.as_mut() {
            cb(&settled);
        }
        Some(settled)
    }

    /// Scroll position for frame-rendering hosts: 0 when idle, an eased
    /// sample while spinning, the exact final offset once settled.
    pub fn current_offset(&self) -> i64 {
        match &self.state {
            ReelState::Idle => 0,
            ReelState::Spinning {
                plan, started_ms, ..
            } => plan.offset_at_ms(self.clock.now_ms().saturating_sub(*started_ms)),
            ReelState::Settled { final_offset, .. } => *final_offset,
        }
    }
}
