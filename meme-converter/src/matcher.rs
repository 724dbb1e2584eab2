//! Title to image matching.
use crate::images::{ImageFile, kebab_case};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Contains,
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMatch<'a> {
    pub image: &'a ImageFile,
    pub kind: MatchKind,
}

/// Find the image for a meme title, skipping images already claimed.
///
/// Tries an exact slug match, then an image slug that contains the title's
/// tokens (shortest wins), then a title that contains an image slug's tokens
/// (longest wins), then the greatest number of shared slug tokens. Ties keep
/// the first image in file-name order.
#[must_use]
pub fn match_image<'a>(
    title: &str,
    images: &'a [ImageFile],
    claimed: &HashSet<String>,
) -> Option<ImageMatch<'a>> {
    let slug = kebab_case(title);
    if slug.is_empty() {
        return None;
    }
    let free = move || {
        images
            .iter()
            .filter(move |image| !claimed.contains(&image.file_name))
    };

    if let Some(image) = free().find(|image| image.slug == slug) {
        return Some(ImageMatch {
            image,
            kind: MatchKind::Exact,
        });
    }

    let widened = free()
        .filter(|image| contains_tokens(&image.slug, &slug))
        .min_by_key(|image| image.slug.len());
    let narrowed = || {
        free()
            .filter(|image| contains_tokens(&slug, &image.slug))
            .rev()
            .max_by_key(|image| image.slug.len())
    };
    if let Some(image) = widened.or_else(narrowed) {
        return Some(ImageMatch {
            image,
            kind: MatchKind::Contains,
        });
    }

    let wanted: HashSet<&str> = slug.split('-').collect();
    let mut best: Option<(&ImageFile, usize)> = None;
    for image in free() {
        let shared = image
            .slug
            .split('-')
            .filter(|token| wanted.contains(token))
            .collect::<HashSet<_>>()
            .len();
        if shared > 0 && best.is_none_or(|(_, score)| shared > score) {
            best = Some((image, shared));
        }
    }
    best.map(|(image, _)| ImageMatch {
        image,
        kind: MatchKind::Overlap,
    })
}

/// Whether `needle` appears in `haystack` as a run of whole `-` tokens.
fn contains_tokens(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && format!("-{haystack}-").contains(&format!("-{needle}-"))
}
