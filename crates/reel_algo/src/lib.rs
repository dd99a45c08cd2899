// crates/reel_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

// File modules (actual implementations)
pub mod easing;
pub mod trajectory;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use easing::{ease_out_q16, Q16_ONE};
pub use trajectory::{plan_for_winner, plan_spin, plan_spin_with_crumb, PlanError, SpinPlan};
