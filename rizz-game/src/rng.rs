//! Seeded session PRNG.
//!
//! Every random decision in the engine flows through a single [`SessionRng`]
//! owned by the session. The generator is a plain 64-bit linear congruential
//! generator so that any implementation sharing the constants reproduces the
//! same stream bit for bit.

use crate::constants::{LCG_INCREMENT, LCG_MULTIPLIER, UNIT_MANTISSA_BITS};
use crate::numbers::{floor_f64_to_i32, floor_f64_to_usize, i64_to_f64, usize_to_f64};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// 2^53 as f64, the denominator used to map mantissa bits onto `[0, 1)`.
const UNIT_SCALE: f64 = 9_007_199_254_740_992.0;

/// Deterministic LCG stream with draw accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRng {
    seed: u64,
    state: u64,
    draws: u64,
}

impl SessionRng {
    /// Create a generator positioned at the start of the stream for `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            state: seed,
            draws: 0,
        }
    }

    /// Seed this stream was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of raw draws taken from the stream since seeding.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    const fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.draws = self.draws.saturating_add(1);
        self.state
    }

    /// Next sample in `[0, 1)`, built from the top 53 bits of the new state.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.step() >> (u64::BITS - UNIT_MANTISSA_BITS);
        num_traits::cast::<u64, f64>(bits).unwrap_or(0.0) / UNIT_SCALE
    }

    /// Uniform integer in `[min, max_exclusive)`.
    ///
    /// Always consumes exactly one draw; an empty range yields `min`.
    pub fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32 {
        let unit = self.next_f64();
        if max_exclusive <= min {
            return min;
        }
        let span = i64::from(max_exclusive) - i64::from(min);
        let offset = floor_f64_to_i32(unit * i64_to_f64(span));
        min.saturating_add(offset).min(max_exclusive - 1)
    }

    /// Uniform integer in `[min, max]`.
    pub fn next_int_inclusive(&mut self, min: i32, max: i32) -> i32 {
        self.next_int(min, max.saturating_add(1))
    }

    /// Uniform index in `[0, len)`. Consumes one draw; `len == 0` yields 0.
    pub fn next_index(&mut self, len: usize) -> usize {
        let unit = self.next_f64();
        floor_f64_to_usize(unit * usize_to_f64(len)).min(len.saturating_sub(1))
    }
}

/// Wall-clock derived seed. Not a security control.
#[must_use]
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| {
            let nanos = elapsed.as_nanos();
            let low = u64::try_from(nanos & u128::from(u64::MAX)).unwrap_or_default();
            let high = u64::try_from(nanos >> 64).unwrap_or_default();
            low ^ high
        })
        .unwrap_or_default()
}
