use std::fs;
use std::path::PathBuf;
use std::process::Command;

use rizz_game::CardCatalog;

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "meme-converter-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

const PROMPTS: &str = "\
# Rizz memes

## Good
### Chad Walk
Walking in like you own the place.
Bias: 9

### Sigma Stare
The grindset never sleeps.

## Bad
### Ohio Moment
Only in Ohio.
Bias: -8

### Missing Meme
There is no image for this one.
";

#[test]
fn converts_folder_into_valid_catalog() {
    let root = temp_dir("ok");
    let images = root.join("images");
    fs::create_dir_all(&images).unwrap();
    for name in ["chad_walk.png", "sigma-stare-final.JPG", "Ohio Moment.webp", "readme.txt"] {
        fs::write(images.join(name), b"img").unwrap();
    }
    let prompts = root.join("prompts.md");
    fs::write(&prompts, PROMPTS).unwrap();
    let output = root.join("out").join("memes.json");

    let run = Command::new(env!("CARGO_BIN_EXE_meme-converter"))
        .arg("--images")
        .arg(&images)
        .arg("--prompts")
        .arg(&prompts)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run converter");
    assert!(
        run.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&run.stderr)
    );
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("Wrote 3 cards (2 good, 1 bad)"));
    assert!(stdout.contains("Skipped (no image): Missing Meme"));

    let catalog = CardCatalog::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    let chad = catalog.get("chad-walk").expect("chad card");
    assert_eq!(chad.bias, 9.0);
    assert_eq!(chad.image.as_deref(), Some("/memes/chad_walk.png"));
    let sigma = catalog.get("sigma-stare-final").expect("fuzzy matched card");
    assert_eq!(sigma.bias, 5.0);
    let ohio = catalog.get("ohio-moment").expect("ohio card");
    assert_eq!(ohio.bias, -8.0);
    assert!(!ohio.is_good);
}

#[test]
fn fails_when_nothing_matches() {
    let root = temp_dir("empty");
    let prompts = root.join("prompts.md");
    fs::write(&prompts, "## Good\n### Lonely\n").unwrap();
    let run = Command::new(env!("CARGO_BIN_EXE_meme-converter"))
        .arg("--images")
        .arg(&root)
        .arg("--prompts")
        .arg(&prompts)
        .arg("--output")
        .arg(root.join("memes.json"))
        .output()
        .expect("run converter");
    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("catalog failed validation"));
    assert!(!root.join("memes.json").exists());
}

#[test]
fn reports_malformed_prompts() {
    let root = temp_dir("bad-prompts");
    let prompts = root.join("prompts.md");
    fs::write(&prompts, "### Before Any Section\n").unwrap();
    let run = Command::new(env!("CARGO_BIN_EXE_meme-converter"))
        .arg("--images")
        .arg(&root)
        .arg("--prompts")
        .arg(&prompts)
        .arg("--output")
        .arg(root.join("memes.json"))
        .output()
        .expect("run converter");
    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("before any"));
}
