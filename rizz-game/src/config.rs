//! Engine tuning configuration.
use crate::constants::{
    ATTRIBUTE_SPREAD, BIAS_NARROWING_FACTOR, BIAS_SCALE, DISPLAY_BASE_MS, DISPLAY_CAP_MS,
    DISPLAY_STEP_MS, SPECIAL_EVENT_BAD_RANGE, SPECIAL_EVENT_GOOD_CHANCE, SPECIAL_EVENT_GOOD_RANGE,
    SPECIAL_EVENT_JITTER, SPECIAL_EVENT_PERIOD,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive integer range used for special-event magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<(i32, i32)> for StatRange {
    fn from((min, max): (i32, i32)) -> Self {
        Self { min, max }
    }
}

/// Per-tap attribute tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeCfg {
    /// Each attribute's random part lies in `[-spread, spread]`.
    pub spread: i32,
    /// Multiplier taking a card's bias into attribute units.
    pub bias_scale: f64,
}

impl Default for AttributeCfg {
    fn default() -> Self {
        Self {
            spread: ATTRIBUTE_SPREAD,
            bias_scale: BIAS_SCALE,
        }
    }
}

/// Card selection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCfg {
    /// How strongly a bias preference narrows the pool toward extreme cards.
    pub narrowing: f64,
}

impl Default for SelectionCfg {
    fn default() -> Self {
        Self {
            narrowing: BIAS_NARROWING_FACTOR,
        }
    }
}

/// Special event gate and payload tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialEventCfg {
    pub period: u32,
    pub jitter: u32,
    /// Probability that a triggered event is good.
    pub good_chance: f64,
    pub good_range: StatRange,
    pub bad_range: StatRange,
}

impl Default for SpecialEventCfg {
    fn default() -> Self {
        Self {
            period: SPECIAL_EVENT_PERIOD,
            jitter: SPECIAL_EVENT_JITTER,
            good_chance: SPECIAL_EVENT_GOOD_CHANCE,
            good_range: SPECIAL_EVENT_GOOD_RANGE.into(),
            bad_range: SPECIAL_EVENT_BAD_RANGE.into(),
        }
    }
}

/// Card display timing handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    pub base_ms: u64,
    pub step_ms: u64,
    pub cap_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            base_ms: DISPLAY_BASE_MS,
            step_ms: DISPLAY_STEP_MS,
            cap_ms: DISPLAY_CAP_MS,
        }
    }
}

impl DisplayCfg {
    /// How long a drawn card stays up. Non-decreasing in `click_count` and bounded.
    #[must_use]
    pub fn duration_ms(&self, click_count: u32) -> u64 {
        let extra = u64::from(click_count)
            .saturating_mul(self.step_ms)
            .min(self.cap_ms);
        self.base_ms.saturating_add(extra)
    }
}

/// Full engine tuning. Defaults reproduce the shipped game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub attributes: AttributeCfg,
    pub selection: SelectionCfg,
    pub special_events: SpecialEventCfg,
    pub display: DisplayCfg,
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineConfigError {
    #[error("attribute spread must be positive (got {0})")]
    AttributeSpread(i32),
    #[error("bias scale must be finite (got {0})")]
    BiasScale(f64),
    #[error("selection narrowing must be within (0, 1] (got {0})")]
    Narrowing(f64),
    #[error("special event period {period} with jitter {jitter} can reach zero")]
    EventPeriod { period: u32, jitter: u32 },
    #[error("special event good chance must be within [0, 1] (got {0})")]
    GoodChance(f64),
    #[error("good event range must be positive and ordered (got {min}..={max})")]
    GoodRange { min: i32, max: i32 },
    #[error("bad event range must be negative and ordered (got {min}..={max})")]
    BadRange { min: i32, max: i32 },
}

impl EngineConfig {
    /// Parse an engine config document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every tuning value for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        let attributes = &self.attributes;
        if attributes.spread <= 0 {
            return Err(EngineConfigError::AttributeSpread(attributes.spread));
        }
        if !attributes.bias_scale.is_finite() {
            return Err(EngineConfigError::BiasScale(attributes.bias_scale));
        }
        let narrowing = self.selection.narrowing;
        if !(narrowing > 0.0 && narrowing <= 1.0) {
            return Err(EngineConfigError::Narrowing(narrowing));
        }
        let events = &self.special_events;
        if events.period <= events.jitter {
            return Err(EngineConfigError::EventPeriod {
                period: events.period,
                jitter: events.jitter,
            });
        }
        if !(0.0..=1.0).contains(&events.good_chance) {
            return Err(EngineConfigError::GoodChance(events.good_chance));
        }
        let good = events.good_range;
        if good.min <= 0 || good.min > good.max {
            return Err(EngineConfigError::GoodRange {
                min: good.min,
                max: good.max,
            });
        }
        let bad = events.bad_range;
        if bad.max >= 0 || bad.min > bad.max {
            return Err(EngineConfigError::BadRange {
                min: bad.min,
                max: bad.max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{"special_events":{"period":24}}"#).unwrap();
        assert_eq!(cfg.special_events.period, 24);
        assert_eq!(cfg.special_events.jitter, SPECIAL_EVENT_JITTER);
        assert_eq!(cfg.attributes, AttributeCfg::default());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut cfg = EngineConfig::default();
        cfg.special_events.jitter = cfg.special_events.period;
        assert!(matches!(
            cfg.validate(),
            Err(EngineConfigError::EventPeriod { .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.special_events.bad_range = StatRange::new(-5, 3);
        assert!(matches!(cfg.validate(), Err(EngineConfigError::BadRange { .. })));

        let mut cfg = EngineConfig::default();
        cfg.selection.narrowing = 0.0;
        assert!(matches!(cfg.validate(), Err(EngineConfigError::Narrowing(_))));
    }

    #[test]
    fn display_duration_is_monotonic_and_capped() {
        let display = DisplayCfg::default();
        assert_eq!(display.duration_ms(0), 1_000);
        assert_eq!(display.duration_ms(3), 1_600);
        assert_eq!(display.duration_ms(20), 5_000);
        assert_eq!(display.duration_ms(u32::MAX), 5_000);
        let mut last = 0;
        for clicks in 0..50 {
            let current = display.duration_ms(clicks);
            assert!(current >= last);
            last = current;
        }
    }
}
