//! Centralized balance and tuning constants for the Rizz engine.
//!
//! These values are the defaults behind [`crate::config::EngineConfig`]. They
//! define the deterministic math for a run; changing any of them changes the
//! replay of every seed.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_TAP: &str = "rizz::tap";
pub(crate) const LOG_TARGET_BANK: &str = "rizz::bank";
pub(crate) const LOG_TARGET_EVENT: &str = "rizz::event";
pub(crate) const LOG_TARGET_STORE: &str = "rizz::store";
pub(crate) const LOG_TARGET_CATALOG: &str = "rizz::catalog";

// PRNG ---------------------------------------------------------------------
pub(crate) const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
pub(crate) const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;
pub(crate) const UNIT_MANTISSA_BITS: u32 = 53;

// Card selection -----------------------------------------------------------
pub(crate) const BIAS_PREFERENCE_MIN: f64 = -1.0;
pub(crate) const BIAS_PREFERENCE_MAX: f64 = 1.0;
pub(crate) const BIAS_NARROWING_FACTOR: f64 = 0.8;

// Attribute generation -----------------------------------------------------
pub(crate) const ATTRIBUTE_SPREAD: i32 = 15;
pub(crate) const BIAS_SCALE: f64 = 15.0;

// Special events -----------------------------------------------------------
pub(crate) const SPECIAL_EVENT_PERIOD: u32 = 18;
pub(crate) const SPECIAL_EVENT_JITTER: u32 = 3;
pub(crate) const SPECIAL_EVENT_GOOD_CHANCE: f64 = 0.5;
pub(crate) const SPECIAL_EVENT_GOOD_RANGE: (i32, i32) = (10, 30);
pub(crate) const SPECIAL_EVENT_BAD_RANGE: (i32, i32) = (-30, -10);

// Presentation timing ------------------------------------------------------
pub(crate) const DISPLAY_BASE_MS: u64 = 1_000;
pub(crate) const DISPLAY_STEP_MS: u64 = 200;
pub(crate) const DISPLAY_CAP_MS: u64 = 4_000;

// Persistence --------------------------------------------------------------
/// Fixed key the high score is stored under in any key-value backend.
pub const HIGH_SCORE_KEY: &str = "rizzHighScore";

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
