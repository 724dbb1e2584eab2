//! High-score persistence seam.
//!
//! The engine never touches storage directly. Platform layers implement
//! [`HighScoreStore`] against whatever durable key-value backend they have; the
//! session degrades on any failure because losing a high score is not fatal.
use crate::constants::{HIGH_SCORE_KEY, LOG_TARGET_STORE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage unavailable: {0}")]
    Unavailable(String),
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value for `{key}` is not a score: {value:?}")]
    Corrupt { key: String, value: String },
}

/// Durable home for the single persisted high score.
pub trait HighScoreStore: std::fmt::Debug {
    /// Read the saved score, `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read or holds garbage.
    fn load(&self) -> Result<Option<i64>, StoreError>;

    /// Persist a new high score.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the write.
    fn save(&mut self, score: i64) -> Result<(), StoreError>;

    /// Remove the saved score.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the removal.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Parse a raw stored value the way a string-typed key-value store holds it.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] when the value is not an integer.
pub fn parse_stored_score(raw: &str) -> Result<i64, StoreError> {
    raw.trim().parse().map_err(|_| StoreError::Corrupt {
        key: HIGH_SCORE_KEY.to_string(),
        value: raw.to_string(),
    })
}

/// Load the high score, treating any failure as "nothing saved".
#[must_use]
pub fn load_or_default(store: &dyn HighScoreStore) -> i64 {
    match store.load() {
        Ok(score) => score.unwrap_or(0),
        Err(err) => {
            log::warn!(target: LOG_TARGET_STORE, "could not load high score, starting from 0: {err}");
            0
        }
    }
}

/// Save the high score, logging and continuing on failure.
pub fn save_or_warn(store: &mut dyn HighScoreStore, score: i64) -> bool {
    match store.save(score) {
        Ok(()) => true,
        Err(err) => {
            log::warn!(target: LOG_TARGET_STORE, "could not save high score {score}: {err}");
            false
        }
    }
}

/// In-process store for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHighScoreStore {
    value: Option<i64>,
}

impl MemoryHighScoreStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    #[must_use]
    pub const fn with_score(score: i64) -> Self {
        Self { value: Some(score) }
    }

    #[must_use]
    pub const fn value(&self) -> Option<i64> {
        self.value
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: i64) -> Result<(), StoreError> {
        self.value = Some(score);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.value = None;
        Ok(())
    }
}
