//! Per-tap attribute deltas.
use crate::config::AttributeCfg;
use crate::numbers::floor_f64_to_i32;
use crate::rng::SessionRng;
use serde::{Deserialize, Serialize};

/// One round's stat changes. Produced fresh per tap and folded into [`crate::Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub vibe_level: i32,
    pub swagger: i32,
    pub cringe_avoidance: i32,
}

impl Attributes {
    #[must_use]
    pub const fn new(vibe_level: i32, swagger: i32, cringe_avoidance: i32) -> Self {
        Self {
            vibe_level,
            swagger,
            cringe_avoidance,
        }
    }

    /// Sum of the three deltas.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.vibe_level as i64 + self.swagger as i64 + self.cringe_avoidance as i64
    }
}

/// Draw the three deltas for a card with the given bias.
///
/// Each field is an independent uniform draw over `[-spread, spread]` shifted by
/// `floor(bias * bias_scale)`. Draw order is vibe, swagger, cringe avoidance.
pub fn generate_attributes(bias: f64, cfg: &AttributeCfg, rng: &mut SessionRng) -> Attributes {
    let shift = floor_f64_to_i32(bias * cfg.bias_scale);
    let mut roll = || {
        rng.next_int_inclusive(-cfg.spread, cfg.spread)
            .saturating_add(shift)
    };
    let vibe_level = roll();
    let swagger = roll();
    let cringe_avoidance = roll();
    Attributes {
        vibe_level,
        swagger,
        cringe_avoidance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bias_stays_inside_spread() {
        let cfg = AttributeCfg::default();
        let mut rng = SessionRng::new(42);
        let attrs = generate_attributes(0.0, &cfg, &mut rng);
        for value in [attrs.vibe_level, attrs.swagger, attrs.cringe_avoidance] {
            assert!((-15..=15).contains(&value), "{value} outside [-15, 15]");
        }
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn bias_shifts_every_field_by_the_same_amount() {
        let cfg = AttributeCfg::default();
        let mut plain = SessionRng::new(8);
        let mut shifted = SessionRng::new(8);
        let base = generate_attributes(0.0, &cfg, &mut plain);
        let moved = generate_attributes(2.0, &cfg, &mut shifted);
        assert_eq!(moved.vibe_level - base.vibe_level, 30);
        assert_eq!(moved.swagger - base.swagger, 30);
        assert_eq!(moved.cringe_avoidance - base.cringe_avoidance, 30);
    }

    #[test]
    fn negative_fractional_bias_floors_down() {
        let cfg = AttributeCfg {
            spread: 1,
            bias_scale: 1.0,
        };
        let mut plain = SessionRng::new(9);
        let mut shifted = SessionRng::new(9);
        let base = generate_attributes(0.0, &cfg, &mut plain);
        let moved = generate_attributes(-0.5, &cfg, &mut shifted);
        assert_eq!(moved.vibe_level - base.vibe_level, -1);
    }

    #[test]
    fn fields_are_drawn_independently() {
        let cfg = AttributeCfg::default();
        let mut rng = SessionRng::new(1234);
        let differing = (0..200)
            .map(|_| generate_attributes(0.0, &cfg, &mut rng))
            .filter(|a| a.vibe_level != a.swagger || a.swagger != a.cringe_avoidance)
            .count();
        assert!(differing > 150);
    }
}
