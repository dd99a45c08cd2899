// crates/reel_core/src/rng.rs
//
// Deterministic, integer-only RNG utilities for winner draws.
// Focus: unbiased range generation, stable seeding, word-index crumbs.
//
// - Integer-only RNG: no floating point. Unbiased ranges via rejection sampling.
// - Cross-platform determinism: explicit seeding and word-index accounting.
// - Production spins seed from OS entropy (`os_rng` feature) so consecutive
//   draws stay unpredictable; tests seed explicitly.

use smol_str::SmolStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// A single logged winner draw, including context and the RNG word index.
///
/// `word_index` is **1-based**: the first 64-bit RNG word consumed by this
/// `SpinRng` has index 1; the second has index 2; etc. For range generation
/// using rejection sampling, `word_index` refers to the **accepted** RNG word
/// that decided the pick (rejected draws are counted but not logged here).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawCrumb {
    /// Stable, human-readable context (e.g., "spin:3/winner").
    pub ctx: SmolStr,
    /// Chosen index in the candidate set (0-based). `usize` avoids truncation.
    pub pick: usize,
    /// 1-based index of the deciding RNG 64-bit word (saturates at u128::MAX).
    pub word_index: u128,
}

/// Deterministic RNG for winner draws.
///
/// Internally uses ChaCha20 with an explicit 32-byte seed derived from a
/// 64-bit seed (little-endian bytes in the first 8 positions; the rest 0).
/// This avoids endianness ambiguity and keeps the mapping stable across
/// platforms. (Pinning crate versions at Cargo level ensures stream
/// stability across builds.)
#[derive(Debug, Clone)]
pub struct SpinRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl SpinRng {
    /// Construct from a 64-bit seed. The mapping from `u64` to the ChaCha20
    /// 32-byte seed is explicit: `seed.to_le_bytes()` into the first 8 bytes;
    /// the remaining 24 bytes are zero.
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Seed from OS entropy. This is the production path: each engine gets an
    /// unpredictable stream, so consecutive spins cannot be anticipated.
    #[cfg(feature = "os_rng")]
    pub fn from_os_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
            words_consumed: 0,
        }
    }

    /// Total number of 64-bit words consumed so far (saturating at `u128::MAX`).
    /// This is a **draw counter**, not a byte counter.
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    /// Draw the next u64 from the stream and increment the word counter.
    /// This is the only place where the counter is advanced.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        // Saturating add so extremely long runs don't panic.
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in [0, n) using rejection sampling with the standard
    /// PCG "threshold" trick. Returns `None` if `n == 0`.
    ///
    /// Let `threshold = 2^64 mod n` (computed via `wrapping_neg() % n`).
    /// Accept `x` if `x >= threshold`; then `x % n` is uniformly distributed.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        self.gen_range_with_index(n).map(|(v, _idx)| v)
    }

    /// Same as `gen_range`, but also returns the **1-based** index of the
    /// deciding RNG word. Useful for logging deterministic crumbs.
    #[inline]
    pub fn gen_range_with_index(&mut self, n: u64) -> Option<(u64, u128)> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n; // == (2^64 % n)
        loop {
            let x = self.next_u64(); // increments words_consumed
            if x >= threshold {
                // words_consumed now points at the accepted word → 1-based
                return Some((x % n, self.words_consumed));
            }
        }
    }

    /// Atomically pick an index in `[0, n)` and return an attached `DrawCrumb`
    /// whose `word_index` refers to the deciding RNG word for this pick.
    /// Returns `None` if `n == 0`.
    #[inline]
    pub fn pick_index_with_crumb(&mut self, ctx: &str, n: u64) -> Option<(usize, DrawCrumb)> {
        let (v, word_index) = self.gen_range_with_index(n)?;
        let idx = v as usize;
        let crumb = DrawCrumb {
            ctx: SmolStr::new(ctx),
            pick: idx,
            word_index,
        };
        Some((idx, crumb))
    }
}
