//! Run score accumulator.
use crate::attributes::Attributes;
use crate::special_event::{SpecialEvent, StatType};
use serde::{Deserialize, Serialize};

/// Running totals for the current run. Rizz Level is always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub vibe_level: i64,
    pub swagger: i64,
    pub cringe_avoidance: i64,
}

impl Stats {
    #[must_use]
    pub const fn new(vibe_level: i64, swagger: i64, cringe_avoidance: i64) -> Self {
        Self {
            vibe_level,
            swagger,
            cringe_avoidance,
        }
    }

    /// All-zero stats, the state at the start of every run.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Rizz Level: the sum of the three stats, recomputed on every call.
    #[must_use]
    pub const fn rizz_level(&self) -> i64 {
        self.vibe_level
            .saturating_add(self.swagger)
            .saturating_add(self.cringe_avoidance)
    }

    /// Elementwise addition of a tap's deltas.
    #[must_use]
    pub const fn apply_attributes(self, attributes: &Attributes) -> Self {
        Self {
            vibe_level: self.vibe_level.saturating_add(attributes.vibe_level as i64),
            swagger: self.swagger.saturating_add(attributes.swagger as i64),
            cringe_avoidance: self
                .cringe_avoidance
                .saturating_add(attributes.cringe_avoidance as i64),
        }
    }

    /// Fold a special event in. `StatType::All` adds the full change to each stat.
    #[must_use]
    pub fn apply_special_event(self, event: &SpecialEvent) -> Self {
        let change = i64::from(event.stat_change);
        let mut next = self;
        match event.stat_type {
            StatType::VibeLevel => next.vibe_level = next.vibe_level.saturating_add(change),
            StatType::Swagger => next.swagger = next.swagger.saturating_add(change),
            StatType::CringeAvoidance => {
                next.cringe_avoidance = next.cringe_avoidance.saturating_add(change);
            }
            StatType::All => {
                next.vibe_level = next.vibe_level.saturating_add(change);
                next.swagger = next.swagger.saturating_add(change);
                next.cringe_avoidance = next.cringe_avoidance.saturating_add(change);
            }
        }
        next
    }

    pub fn reset(&mut self) {
        *self = Self::zero();
    }
}
