use std::collections::HashSet;

use rizz_game::{Card, CardCatalog, CatalogError};

use crate::images::ImageFile;
use crate::matcher::{MatchKind, match_image};
use crate::prompts::MemePrompt;

pub const DEFAULT_IMAGE_PREFIX: &str = "/memes/";

/// Cards built from the prompts plus everything that did not make it in.
#[derive(Debug)]
pub struct Conversion {
    pub catalog: CardCatalog,
    pub skipped_prompts: Vec<String>,
    pub unused_images: Vec<String>,
    pub fuzzy_matches: usize,
}

/// Pair prompts with images and validate the result as a catalog.
///
/// Each image backs at most one card. The card id is the image's slug so ids
/// stay stable when a title is reworded.
///
/// # Errors
///
/// Returns the catalog validation error when no card could be built or the
/// result is otherwise invalid.
pub fn build_catalog(
    prompts: &[MemePrompt],
    images: &[ImageFile],
    image_prefix: &str,
) -> Result<Conversion, CatalogError> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut cards = Vec::with_capacity(prompts.len());
    let mut skipped_prompts = Vec::new();
    let mut fuzzy_matches = 0;

    for prompt in prompts {
        let Some(found) = match_image(&prompt.title, images, &claimed) else {
            log::warn!(
                "line {}: no image matches `{}`, skipping",
                prompt.line,
                prompt.title
            );
            skipped_prompts.push(prompt.title.clone());
            continue;
        };
        if found.kind != MatchKind::Exact {
            fuzzy_matches += 1;
            log::info!(
                "`{}` matched {} by {:?}",
                prompt.title,
                found.image.file_name,
                found.kind
            );
        }
        claimed.insert(found.image.file_name.clone());
        cards.push(Card {
            id: found.image.slug.clone(),
            name: prompt.title.clone(),
            description: prompt.description.clone(),
            image: Some(join_prefix(image_prefix, &found.image.file_name)),
            bias: f64::from(prompt.signed_bias()),
            is_good: prompt.is_good,
        });
    }

    let unused_images = images
        .iter()
        .filter(|image| !claimed.contains(&image.file_name))
        .map(|image| image.file_name.clone())
        .collect();

    Ok(Conversion {
        catalog: CardCatalog::new(cards)?,
        skipped_prompts,
        unused_images,
        fuzzy_matches,
    })
}

fn join_prefix(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{prefix}{file_name}")
    } else {
        format!("{prefix}/{file_name}")
    }
}
