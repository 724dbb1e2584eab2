//! Rizz Game Engine
//!
//! Platform-agnostic scoring and random-event engine for the Rizz meme clicker.
//! Every roll comes from one seeded session PRNG, so a run replays exactly from
//! its seed and the sequence of taps. No UI, timers or storage backends live here.

pub mod attributes;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod numbers;
pub mod rng;
pub mod seed;
pub mod selector;
pub mod session;
pub mod special_event;
pub mod stats;
pub mod store;

use std::rc::Rc;

pub use attributes::{Attributes, generate_attributes};
pub use catalog::{Card, CardCatalog, CatalogError};
pub use config::{
    AttributeCfg, DisplayCfg, EngineConfig, EngineConfigError, SelectionCfg, SpecialEventCfg,
    StatRange,
};
pub use constants::HIGH_SCORE_KEY;
pub use rng::{SessionRng, seed_from_clock};
pub use seed::{decode_to_seed, derive_seed, encode_friendly, seed_from_entropy};
pub use selector::{CardPick, PickPool, PickTrace, select_card};
pub use session::{
    BankOutcome, DisplayState, DisplayToken, GameSession, GameSnapshot, GiveUpOutcome,
    RunOutcome, RunRecord, RunState, SessionError, TapOutcome,
};
pub use special_event::{EventType, SpecialEvent, StatType, generate_event, should_trigger};
pub use stats::Stats;
pub use store::{HighScoreStore, MemoryHighScoreStore, StoreError};

/// Trait for abstracting where the card table and tuning come from.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the card catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<CardCatalog, Self::Error>;

    /// Load engine tuning. Defaults are fine for most platforms.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_engine_config(&self) -> Result<EngineConfig, Self::Error> {
        Ok(EngineConfig::default())
    }
}

/// Loader backed by the catalog compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl DataLoader for BuiltinLoader {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<CardCatalog, Self::Error> {
        CardCatalog::builtin()
    }
}

/// Session factory sharing one catalog across sessions.
#[derive(Debug, Clone)]
pub struct GameEngine {
    catalog: Rc<CardCatalog>,
    config: EngineConfig,
}

impl GameEngine {
    /// Load catalog and tuning once through `loader`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if either load fails.
    pub fn from_loader<L: DataLoader>(loader: &L) -> Result<Self, L::Error> {
        Ok(Self {
            catalog: Rc::new(loader.load_catalog()?),
            config: loader.load_engine_config()?,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a new session over the shared catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the loaded configuration does not validate.
    pub fn create_session(
        &self,
        seed: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Result<GameSession, SessionError> {
        GameSession::new(Rc::clone(&self.catalog), self.config.clone(), seed, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct JsonLoader {
        catalog: &'static str,
        config: &'static str,
    }

    #[derive(Debug, thiserror::Error)]
    enum JsonLoaderError {
        #[error(transparent)]
        Catalog(#[from] CatalogError),
        #[error(transparent)]
        Config(#[from] serde_json::Error),
    }

    impl DataLoader for JsonLoader {
        type Error = JsonLoaderError;

        fn load_catalog(&self) -> Result<CardCatalog, Self::Error> {
            Ok(CardCatalog::from_json(self.catalog)?)
        }

        fn load_engine_config(&self) -> Result<EngineConfig, Self::Error> {
            Ok(EngineConfig::from_json(self.config)?)
        }
    }

    #[test]
    fn builtin_engine_creates_sessions() {
        let engine = GameEngine::from_loader(&BuiltinLoader).unwrap();
        let mut session = engine
            .create_session(42, Box::new(MemoryHighScoreStore::new()))
            .unwrap();
        assert!(session.tap().is_some());
    }

    #[test]
    fn custom_loader_config_is_validated_at_session_creation() {
        let loader = JsonLoader {
            catalog: r#"{"cards":[{"id":"w","name":"W","description":"d","bias":4,"isGood":true}]}"#,
            config: r#"{"special_events":{"period":0}}"#,
        };
        let engine = GameEngine::from_loader(&loader).unwrap();
        assert_eq!(engine.catalog().len(), 1);
        let err = engine
            .create_session(1, Box::new(MemoryHighScoreStore::new()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn broken_catalog_surfaces_from_loader() {
        let loader = JsonLoader {
            catalog: r#"{"cards":[]}"#,
            config: "{}",
        };
        assert!(matches!(
            GameEngine::from_loader(&loader),
            Err(JsonLoaderError::Catalog(CatalogError::Empty))
        ));
    }
}
