use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// An image file eligible to back a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    /// Kebab-cased file stem used for matching and as the card id.
    pub slug: String,
}

/// Lowercase, runs of non-alphanumerics collapsed to a single `-`, trimmed.
#[must_use]
pub fn kebab_case(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// List supported images in `dir`, sorted by file name. Subdirectories are ignored.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or the extension pattern
/// fails to compile.
pub fn scan_images(dir: &Path) -> io::Result<Vec<ImageFile>> {
    let extension = Regex::new(r"(?i)\.(png|jpe?g|gif|webp)$").map_err(io::Error::other)?;
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            log::warn!("skipping non UTF-8 file name {}", path.display());
            continue;
        };
        let Some(found) = extension.find(file_name) else {
            log::debug!("skipping {file_name}: not an image");
            continue;
        };
        let slug = kebab_case(&file_name[..found.start()]);
        if slug.is_empty() {
            log::warn!("skipping {file_name}: no usable name");
            continue;
        }
        images.push(ImageFile {
            file_name: file_name.to_string(),
            slug,
        });
    }
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}
