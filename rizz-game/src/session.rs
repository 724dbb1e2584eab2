//! Session/run controller: the single owner of engine state.
use std::rc::Rc;

use crate::attributes::{Attributes, generate_attributes};
use crate::catalog::{Card, CardCatalog, CatalogError};
use crate::config::{EngineConfig, EngineConfigError};
use crate::constants::{LOG_TARGET_BANK, LOG_TARGET_EVENT, LOG_TARGET_STORE, LOG_TARGET_TAP};
use crate::rng::SessionRng;
use crate::selector::{PickTrace, select_card};
use crate::special_event::{SpecialEvent, generate_event, should_trigger};
use crate::stats::Stats;
use crate::store::{HighScoreStore, MemoryHighScoreStore, load_or_default, save_or_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Presentation gate: while a card is shown, taps are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Idle,
    CardShown,
}

/// Run-level lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Active,
    Banked,
    GivenUp,
}

/// Identifies the display started by one tap. Stale tokens are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayToken(u64);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid engine config: {0}")]
    Config(#[from] EngineConfigError),
    #[error("invalid card catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Everything the view needs after a tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapOutcome {
    pub card: Card,
    pub attributes: Attributes,
    pub stats: Stats,
    pub rizz_level: i64,
    pub special_event: Option<SpecialEvent>,
    pub click_count: u32,
    /// How long the view should keep the card up before calling `finish_display`.
    pub display_ms: u64,
    pub display_token: DisplayToken,
    pub pick: PickTrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankOutcome {
    pub high_score: i64,
    pub banked_score: i64,
    pub new_record: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveUpOutcome {
    pub discarded_score: i64,
    pub taps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Banked,
    GivenUp,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub outcome: RunOutcome,
    pub score: i64,
    pub taps: u32,
    pub special_events: u32,
    pub new_record: bool,
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub stats: Stats,
    pub rizz_level: i64,
    pub high_score: i64,
    pub click_count: u32,
    pub is_card_shown: bool,
    pub run_state: RunState,
    pub seed: u64,
    pub draws: u64,
}

/// Owns the PRNG, stats, click counter and high score for one player.
///
/// Observable behavior is a pure function of the seed and the sequence of
/// `tap`/`bank`/`give_up` calls; display timing never touches stats or the PRNG.
#[derive(Debug)]
pub struct GameSession {
    catalog: Rc<CardCatalog>,
    config: EngineConfig,
    rng: SessionRng,
    store: Box<dyn HighScoreStore>,
    stats: Stats,
    high_score: i64,
    click_count: u32,
    display: DisplayState,
    display_seq: u64,
    run_state: RunState,
    run_special_events: u32,
    history: Vec<RunRecord>,
}

impl GameSession {
    /// Build a session over a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine config fails validation.
    pub fn new(
        catalog: Rc<CardCatalog>,
        config: EngineConfig,
        seed: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let high_score = load_or_default(store.as_ref());
        log::debug!(
            target: LOG_TARGET_STORE,
            "session seeded with {seed}, high score {high_score}"
        );
        Ok(Self {
            catalog,
            config,
            rng: SessionRng::new(seed),
            store,
            stats: Stats::zero(),
            high_score,
            click_count: 0,
            display: DisplayState::Idle,
            display_seq: 0,
            run_state: RunState::Active,
            run_special_events: 0,
            history: Vec::new(),
        })
    }

    /// Builtin catalog, default tuning, in-memory high score.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded catalog is broken.
    pub fn with_defaults(seed: u64) -> Result<Self, SessionError> {
        let catalog = Rc::new(CardCatalog::builtin()?);
        Self::new(
            catalog,
            EngineConfig::default(),
            seed,
            Box::new(MemoryHighScoreStore::new()),
        )
    }

    /// Draw a card and score it. Returns `None` while a card is still shown.
    pub fn tap(&mut self) -> Option<TapOutcome> {
        self.tap_with_bias(None)
    }

    /// Tap with an optional good/bad preference in `[-1, 1]`.
    pub fn tap_with_bias(&mut self, preference: Option<f64>) -> Option<TapOutcome> {
        if self.display == DisplayState::CardShown {
            log::debug!(target: LOG_TARGET_TAP, "tap ignored: card still shown");
            return None;
        }

        self.click_count = self.click_count.saturating_add(1);
        self.run_state = RunState::Active;

        let pick = select_card(
            &self.catalog,
            preference,
            &self.config.selection,
            &mut self.rng,
        );
        let card = pick.card.clone();
        let trace = pick.trace;

        let attributes = generate_attributes(card.bias, &self.config.attributes, &mut self.rng);
        self.stats = self.stats.apply_attributes(&attributes);

        let special_event = if should_trigger(
            self.click_count,
            &self.config.special_events,
            &mut self.rng,
        ) {
            let event = generate_event(&self.config.special_events, &mut self.rng);
            self.stats = self.stats.apply_special_event(&event);
            self.run_special_events = self.run_special_events.saturating_add(1);
            log::debug!(
                target: LOG_TARGET_EVENT,
                "tap {} special event {:?} {:?} {:+}",
                self.click_count,
                event.event_type,
                event.stat_type,
                event.stat_change
            );
            Some(event)
        } else {
            None
        };

        self.display = DisplayState::CardShown;
        self.display_seq = self.display_seq.wrapping_add(1);

        let rizz_level = self.stats.rizz_level();
        log::debug!(
            target: LOG_TARGET_TAP,
            "tap {} drew {} ({:+}) -> rizz {}",
            self.click_count,
            card.id,
            attributes.total(),
            rizz_level
        );

        Some(TapOutcome {
            card,
            attributes,
            stats: self.stats,
            rizz_level,
            special_event,
            click_count: self.click_count,
            display_ms: self.display_duration_ms(self.click_count),
            display_token: DisplayToken(self.display_seq),
            pick: trace,
        })
    }

    /// Display timeout callback. Only the token from the latest tap flips the
    /// gate back to idle; stale or superseded timers are no-ops.
    pub fn finish_display(&mut self, token: DisplayToken) -> bool {
        if self.display == DisplayState::CardShown && token.0 == self.display_seq {
            self.display = DisplayState::Idle;
            true
        } else {
            false
        }
    }

    /// Display time for a card drawn at `click_count`.
    #[must_use]
    pub fn display_duration_ms(&self, click_count: u32) -> u64 {
        self.config.display.duration_ms(click_count)
    }

    /// Commit the run against the high score and start over.
    pub fn bank(&mut self) -> BankOutcome {
        let banked_score = self.stats.rizz_level();
        let new_record = banked_score > self.high_score;
        if new_record {
            self.high_score = banked_score;
            save_or_warn(self.store.as_mut(), banked_score);
        }
        log::info!(
            target: LOG_TARGET_BANK,
            "banked {banked_score} after {} taps (high score {}{})",
            self.click_count,
            self.high_score,
            if new_record { ", new record" } else { "" }
        );
        self.finish_run(RunOutcome::Banked, banked_score, new_record);
        self.run_state = RunState::Banked;
        BankOutcome {
            high_score: self.high_score,
            banked_score,
            new_record,
        }
    }

    /// Discard the run without touching the high score.
    pub fn give_up(&mut self) -> GiveUpOutcome {
        let discarded_score = self.stats.rizz_level();
        let taps = self.click_count;
        log::info!(
            target: LOG_TARGET_BANK,
            "gave up {discarded_score} after {taps} taps"
        );
        self.finish_run(RunOutcome::GivenUp, discarded_score, false);
        self.run_state = RunState::GivenUp;
        GiveUpOutcome {
            discarded_score,
            taps,
        }
    }

    fn finish_run(&mut self, outcome: RunOutcome, score: i64, new_record: bool) {
        self.history.push(RunRecord {
            outcome,
            score,
            taps: self.click_count,
            special_events: self.run_special_events,
            new_record,
        });
        self.stats.reset();
        self.click_count = 0;
        self.run_special_events = 0;
        self.display = DisplayState::Idle;
        self.display_seq = self.display_seq.wrapping_add(1);
    }

    /// Explicit high-score reset, the only way the high score goes down.
    pub fn clear_high_score(&mut self) {
        self.high_score = 0;
        if let Err(err) = self.store.clear() {
            log::warn!(target: LOG_TARGET_STORE, "could not clear high score: {err}");
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            stats: self.stats,
            rizz_level: self.stats.rizz_level(),
            high_score: self.high_score,
            click_count: self.click_count,
            is_card_shown: self.display == DisplayState::CardShown,
            run_state: self.run_state,
            seed: self.rng.seed(),
            draws: self.rng.draws(),
        }
    }

    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    #[must_use]
    pub const fn high_score(&self) -> i64 {
        self.high_score
    }

    #[must_use]
    pub const fn click_count(&self) -> u32 {
        self.click_count
    }

    #[must_use]
    pub const fn display_state(&self) -> DisplayState {
        self.display
    }

    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    #[must_use]
    pub fn history(&self) -> &[RunRecord] {
        &self.history
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Overwrite the running stats. Test and scenario harnesses only.
    #[doc(hidden)]
    pub const fn set_stats_for_testing(&mut self, stats: Stats) {
        self.stats = stats;
    }
}
