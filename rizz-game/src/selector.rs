//! Card selection with an optional good/bad bias preference.
use crate::catalog::{Card, CardCatalog};
use crate::config::SelectionCfg;
use crate::constants::{BIAS_PREFERENCE_MAX, BIAS_PREFERENCE_MIN};
use crate::numbers::{floor_f64_to_usize, usize_to_f64};
use crate::rng::SessionRng;
use serde::{Deserialize, Serialize};

/// Which candidate pool the pick came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPool {
    /// No preference: uniform over the whole catalog.
    Full,
    Good,
    Bad,
    /// The preferred pool was empty, so the whole catalog was used.
    Fallback,
}

/// Raw samples behind a pick, kept for replay diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickTrace {
    pub pool: PickPool,
    pub pool_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_roll: Option<f64>,
    #[serde(default)]
    pub index_rolls: Vec<f64>,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardPick<'a> {
    pub card: &'a Card,
    pub trace: PickTrace,
}

/// Normalize a caller preference. Non-finite input counts as no preference.
#[must_use]
pub fn clamp_preference(preference: Option<f64>) -> Option<f64> {
    preference
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(BIAS_PREFERENCE_MIN, BIAS_PREFERENCE_MAX))
}

/// Probability of drawing from the good pool for a clamped preference.
#[must_use]
pub fn good_probability(preference: f64) -> f64 {
    (preference + 1.0) / 2.0
}

/// Pick one card.
///
/// Without a preference the pick is uniform over the catalog. With one, a first
/// draw chooses the good or bad pool, the pool is ordered most extreme first,
/// and the product of two draws picks an index that leans toward the front as
/// the preference strengthens.
pub fn select_card<'a>(
    catalog: &'a CardCatalog,
    preference: Option<f64>,
    cfg: &SelectionCfg,
    rng: &mut SessionRng,
) -> CardPick<'a> {
    let Some(preference) = clamp_preference(preference) else {
        return uniform_pick(catalog, PickPool::Full, None, rng);
    };

    let pool_roll = rng.next_f64();
    let want_good = pool_roll < good_probability(preference);
    let mut pool: Vec<&Card> = catalog.cards_where(want_good).collect();
    if pool.is_empty() {
        return uniform_pick(catalog, PickPool::Fallback, Some(pool_roll), rng);
    }

    if want_good {
        pool.sort_by(|a, b| b.bias.total_cmp(&a.bias));
    } else {
        pool.sort_by(|a, b| a.bias.total_cmp(&b.bias));
    }

    let strength = preference.abs();
    let first = rng.next_f64();
    let second = rng.next_f64();
    let reach = usize_to_f64(pool.len()) * (1.0 - strength * cfg.narrowing);
    let index = floor_f64_to_usize(first * second * reach).min(pool.len() - 1);

    CardPick {
        card: pool[index],
        trace: PickTrace {
            pool: if want_good { PickPool::Good } else { PickPool::Bad },
            pool_size: pool.len(),
            pool_roll: Some(pool_roll),
            index_rolls: vec![first, second],
            index,
        },
    }
}

fn uniform_pick<'a>(
    catalog: &'a CardCatalog,
    pool: PickPool,
    pool_roll: Option<f64>,
    rng: &mut SessionRng,
) -> CardPick<'a> {
    let cards = catalog.all_cards();
    let index = rng.next_index(cards.len());
    CardPick {
        card: &cards[index],
        trace: PickTrace {
            pool,
            pool_size: cards.len(),
            pool_roll,
            index_rolls: Vec::new(),
            index,
        },
    }
}
