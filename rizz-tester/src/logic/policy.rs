use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rizz_game::{GameSnapshot, derive_seed};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input a simulated player can send to the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "preference", rename_all = "snake_case")]
pub enum PlayAction {
    Tap,
    BiasedTap(f64),
    Bank,
    GiveUp,
}

impl fmt::Display for PlayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap => f.write_str("tap"),
            Self::BiasedTap(pref) => write!(f, "tap({pref:+.2})"),
            Self::Bank => f.write_str("bank"),
            Self::GiveUp => f.write_str("give up"),
        }
    }
}

/// How a simulated player drives a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStrategy {
    /// Taps forever and never banks.
    TapOnly,
    /// Banks after a fixed number of taps.
    BankEvery(u32),
    /// Alternates full good and full bad preferences.
    PolarityFlip,
    /// Seeded mix of taps, biased taps, banks and give-ups.
    Random,
}

impl PlayStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TapOnly => "tap-only",
            Self::BankEvery(_) => "bank-every",
            Self::PolarityFlip => "polarity-flip",
            Self::Random => "random",
        }
    }

    /// Build the policy for one run. Policy randomness never touches the engine stream.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::TapOnly => Box::new(TapOnlyPolicy),
            Self::BankEvery(taps) => Box::new(BankEveryPolicy { taps: taps.max(1) }),
            Self::PolarityFlip => Box::new(PolarityFlipPolicy { next_good: true }),
            Self::Random => Box::new(RandomPolicy::new(derive_seed(seed, "policy"))),
        }
    }
}

impl fmt::Display for PlayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub trait PlayerPolicy {
    fn name(&self) -> &'static str;
    fn next_action(&mut self, snapshot: &GameSnapshot) -> PlayAction;
}

struct TapOnlyPolicy;

impl PlayerPolicy for TapOnlyPolicy {
    fn name(&self) -> &'static str {
        "TapOnly"
    }

    fn next_action(&mut self, _snapshot: &GameSnapshot) -> PlayAction {
        PlayAction::Tap
    }
}

struct BankEveryPolicy {
    taps: u32,
}

impl PlayerPolicy for BankEveryPolicy {
    fn name(&self) -> &'static str {
        "BankEvery"
    }

    fn next_action(&mut self, snapshot: &GameSnapshot) -> PlayAction {
        if snapshot.click_count >= self.taps {
            PlayAction::Bank
        } else {
            PlayAction::Tap
        }
    }
}

struct PolarityFlipPolicy {
    next_good: bool,
}

impl PlayerPolicy for PolarityFlipPolicy {
    fn name(&self) -> &'static str {
        "PolarityFlip"
    }

    fn next_action(&mut self, _snapshot: &GameSnapshot) -> PlayAction {
        let preference = if self.next_good { 1.0 } else { -1.0 };
        self.next_good = !self.next_good;
        PlayAction::BiasedTap(preference)
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn next_action(&mut self, snapshot: &GameSnapshot) -> PlayAction {
        // Runs get longer odds of ending the further they go.
        let end_chance = (f64::from(snapshot.click_count) / 400.0).min(0.25);
        let roll: f64 = self.rng.r#gen();
        if snapshot.click_count > 0 && roll < end_chance {
            if self.rng.gen_bool(0.7) {
                PlayAction::Bank
            } else {
                PlayAction::GiveUp
            }
        } else if self.rng.gen_bool(0.15) {
            PlayAction::BiasedTap(self.rng.gen_range(-1.0..=1.0))
        } else {
            PlayAction::Tap
        }
    }
}
