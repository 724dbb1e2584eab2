mod convert;
mod images;
mod matcher;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use convert::{DEFAULT_IMAGE_PREFIX, build_catalog};
use images::scan_images;
use prompts::PromptParser;

#[derive(Debug, Parser)]
#[command(name = "meme-converter", version)]
#[command(about = "Turn a meme image folder and prompt markdown into the Rizz card catalog")]
struct Args {
    /// Directory holding the meme images (png, jpg, jpeg, gif, webp)
    #[arg(long)]
    images: PathBuf,

    /// Markdown file with `## Good` / `## Bad` sections and `### Title` entries
    #[arg(long)]
    prompts: PathBuf,

    /// Where to write the catalog JSON
    #[arg(long)]
    output: PathBuf,

    /// Path prefix the game serves the images from
    #[arg(long, default_value = DEFAULT_IMAGE_PREFIX)]
    image_prefix: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let markdown = fs::read_to_string(&args.prompts)
        .with_context(|| format!("failed to read {}", args.prompts.display()))?;
    let prompts = PromptParser::new()?
        .parse(&markdown)
        .with_context(|| format!("failed to parse {}", args.prompts.display()))?;
    let images = scan_images(&args.images)
        .with_context(|| format!("failed to scan {}", args.images.display()))?;
    log::info!("{} prompts, {} images", prompts.len(), images.len());

    let conversion =
        build_catalog(&prompts, &images, &args.image_prefix).context("catalog failed validation")?;
    let json = conversion.catalog.to_json_pretty()?;
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let catalog = &conversion.catalog;
    println!(
        "Wrote {} cards ({} good, {} bad) to {}",
        catalog.len(),
        catalog.cards_where(true).count(),
        catalog.cards_where(false).count(),
        args.output.display()
    );
    if conversion.fuzzy_matches > 0 {
        println!("Fuzzy title matches: {}", conversion.fuzzy_matches);
    }
    if !conversion.skipped_prompts.is_empty() {
        println!(
            "Skipped (no image): {}",
            conversion.skipped_prompts.join(", ")
        );
    }
    if !conversion.unused_images.is_empty() {
        println!("Unused images: {}", conversion.unused_images.join(", "));
    }
    Ok(())
}
