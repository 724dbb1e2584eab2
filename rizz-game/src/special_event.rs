//! Tap-count gated special events.
//!
//! The gate re-rolls its jitter on every check, so triggers are not a fixed
//! period timer. A tap can only trigger when its count is a multiple of some
//! target in `[period - jitter, period + jitter]`.
use crate::config::SpecialEventCfg;
use crate::rng::SessionRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Good,
    Bad,
}

/// Which stat a special event lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatType {
    VibeLevel,
    Swagger,
    CringeAvoidance,
    /// Applied to each of the three stats, so the Rizz Level swing is tripled.
    All,
}

impl StatType {
    /// Uniform pick order for event generation.
    pub const ALL_TYPES: [Self; 4] = [
        Self::VibeLevel,
        Self::Swagger,
        Self::CringeAvoidance,
        Self::All,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VibeLevel => "Vibe Level",
            Self::Swagger => "Swagger",
            Self::CringeAvoidance => "Cringe Avoidance",
            Self::All => "all stats",
        }
    }
}

/// A one-shot stat swing. Applied once, then only displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEvent {
    pub event_type: EventType,
    pub stat_change: i32,
    pub stat_type: StatType,
    pub message: String,
}

impl SpecialEvent {
    #[must_use]
    pub fn new(event_type: EventType, stat_change: i32, stat_type: StatType) -> Self {
        Self {
            event_type,
            stat_change,
            stat_type,
            message: compose_message(event_type, stat_type, stat_change),
        }
    }

    /// Effect on the derived Rizz Level once applied.
    #[must_use]
    pub fn rizz_swing(&self) -> i64 {
        let change = i64::from(self.stat_change);
        match self.stat_type {
            StatType::All => change * 3,
            _ => change,
        }
    }
}

/// Draw this check's target period. Consumes one draw.
pub fn roll_trigger_target(cfg: &SpecialEventCfg, rng: &mut SessionRng) -> u32 {
    let jitter = i32::try_from(cfg.jitter).unwrap_or(i32::MAX);
    let offset = rng.next_int_inclusive(-jitter, jitter);
    cfg.period.saturating_add_signed(offset).max(1)
}

/// Whether the tap that brought the run to `click_count` fires an event.
///
/// A zero count never triggers and consumes no draw; any other count consumes
/// exactly one draw.
pub fn should_trigger(click_count: u32, cfg: &SpecialEventCfg, rng: &mut SessionRng) -> bool {
    if click_count == 0 {
        return false;
    }
    let target = roll_trigger_target(cfg, rng);
    click_count % target == 0
}

/// Generate an event. Consumes three draws: type, magnitude, stat.
pub fn generate_event(cfg: &SpecialEventCfg, rng: &mut SessionRng) -> SpecialEvent {
    let event_type = if rng.next_f64() > 1.0 - cfg.good_chance {
        EventType::Good
    } else {
        EventType::Bad
    };
    let range = match event_type {
        EventType::Good => cfg.good_range,
        EventType::Bad => cfg.bad_range,
    };
    let stat_change = rng.next_int_inclusive(range.min, range.max);
    let stat_type = StatType::ALL_TYPES[rng.next_index(StatType::ALL_TYPES.len())];
    SpecialEvent::new(event_type, stat_change, stat_type)
}

fn compose_message(event_type: EventType, stat_type: StatType, stat_change: i32) -> String {
    let headline = match (event_type, stat_type) {
        (EventType::Good, StatType::All) => "Main character arc unlocked!",
        (EventType::Good, StatType::VibeLevel) => "The vibes are immaculate!",
        (EventType::Good, StatType::Swagger) => "Certified drip moment!",
        (EventType::Good, StatType::CringeAvoidance) => "Dodged the cringe like a pro!",
        (EventType::Bad, StatType::All) => "Total Ohio moment...",
        (EventType::Bad, StatType::VibeLevel) => "Vibe check failed!",
        (EventType::Bad, StatType::Swagger) => "Tripped in front of everyone!",
        (EventType::Bad, StatType::CringeAvoidance) => "Maximum cringe achieved!",
    };
    format!("{headline} {} {stat_change:+}", stat_type.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_clicks_never_trigger_or_draw() {
        let cfg = SpecialEventCfg::default();
        let mut rng = SessionRng::new(1);
        assert!(!should_trigger(0, &cfg, &mut rng));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn targets_stay_within_jitter_window() {
        let cfg = SpecialEventCfg::default();
        let mut rng = SessionRng::new(2);
        for _ in 0..5_000 {
            let target = roll_trigger_target(&cfg, &mut rng);
            assert!((15..=21).contains(&target));
        }
    }

    #[test]
    fn early_taps_cannot_trigger() {
        let cfg = SpecialEventCfg::default();
        let mut rng = SessionRng::new(3);
        for _ in 0..200 {
            for clicks in 1..15 {
                assert!(!should_trigger(clicks, &cfg, &mut rng));
            }
        }
    }

    #[test]
    fn trigger_matches_replayed_target() {
        let cfg = SpecialEventCfg::default();
        let mut gate = SessionRng::new(4);
        let mut replay = SessionRng::new(4);
        for clicks in 1..400 {
            let target = roll_trigger_target(&cfg, &mut replay);
            assert_eq!(should_trigger(clicks, &cfg, &mut gate), clicks % target == 0);
        }
    }

    #[test]
    fn events_respect_magnitude_ranges() {
        let cfg = SpecialEventCfg::default();
        let mut rng = SessionRng::new(5);
        let mut kinds = std::collections::HashSet::new();
        for _ in 0..2_000 {
            let event = generate_event(&cfg, &mut rng);
            match event.event_type {
                EventType::Good => assert!((10..=30).contains(&event.stat_change)),
                EventType::Bad => assert!((-30..=-10).contains(&event.stat_change)),
            }
            kinds.insert(event.stat_type);
        }
        assert_eq!(kinds.len(), 4);
        assert_eq!(rng.draws(), 6_000);
    }

    #[test]
    fn all_stat_event_triples_rizz_swing() {
        let event = SpecialEvent::new(EventType::Good, 10, StatType::All);
        assert_eq!(event.rizz_swing(), 30);
        assert!(event.message.contains("+10"));
        let bad = SpecialEvent::new(EventType::Bad, -12, StatType::Swagger);
        assert_eq!(bad.rizz_swing(), -12);
        assert!(bad.message.contains("-12"));
    }
}
