//! Static meme card catalog.
//!
//! The catalog is parsed once at startup and shared read-only by every other
//! component. All structural checks happen at construction so a bad table fails
//! loudly before the first draw.

use crate::constants::LOG_TARGET_CATALOG;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/memes.json");

/// A single meme card. Display metadata is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Signed tuning value, an integer in roughly `[-10, 10]`.
    pub bias: f64,
    pub is_good: bool,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no cards")]
    Empty,
    #[error("duplicate card id `{0}`")]
    DuplicateId(String),
    #[error("card `{0}` has a non-finite bias")]
    NonFiniteBias(String),
    #[error("card `{0}` has zero bias")]
    ZeroBias(String),
    #[error("card `{id}` has bias {bias} but is_good = {is_good}")]
    PolarityMismatch { id: String, bias: f64, is_good: bool },
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    cards: Vec<Card>,
}

/// Immutable, validated, ordered card table.
#[derive(Debug, Clone, PartialEq)]
pub struct CardCatalog {
    cards: Vec<Card>,
}

impl CardCatalog {
    /// Validate and wrap a list of cards.
    ///
    /// # Errors
    ///
    /// Returns an error when the list is empty, ids repeat, or a card's bias
    /// disagrees with its good/bad flag.
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        if cards.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id.as_str()) {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
            validate_card(card)?;
        }
        let good = cards.iter().filter(|card| card.is_good).count();
        log::debug!(
            target: LOG_TARGET_CATALOG,
            "catalog loaded: {} cards ({} good, {} bad)",
            cards.len(),
            good,
            cards.len() - good
        );
        Ok(Self { cards })
    }

    /// Parse a `{ "cards": [...] }` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.cards)
    }

    /// The catalog compiled into the engine.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset itself is broken.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Serialize back into the document shape accepted by [`Self::from_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&CatalogFile {
            cards: self.cards.clone(),
        })
    }

    /// Every card in table order.
    #[must_use]
    pub fn all_cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards matching the good/bad flag, in table order.
    pub fn cards_where(&self, is_good: bool) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |card| card.is_good == is_good)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Fingerprint of the gameplay-relevant fields, in table order.
    #[must_use]
    pub fn signature(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for card in &self.cards {
            hasher.write(card.id.as_bytes());
            hasher.write_u8(0);
            hasher.write(&card.bias.to_le_bytes());
            hasher.write_u8(u8::from(card.is_good));
        }
        hasher.finish()
    }
}

fn validate_card(card: &Card) -> Result<(), CatalogError> {
    if !card.bias.is_finite() {
        return Err(CatalogError::NonFiniteBias(card.id.clone()));
    }
    if card.bias == 0.0 {
        return Err(CatalogError::ZeroBias(card.id.clone()));
    }
    if (card.bias > 0.0) != card.is_good {
        return Err(CatalogError::PolarityMismatch {
            id: card.id.clone(),
            bias: card.bias,
            is_good: card.is_good,
        });
    }
    Ok(())
}
