mod common;
mod logic;
mod play;
mod storage;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios, scenario_names};
use common::split_csv;
use logic::{GameTester, LogicTester, ScenarioResult, SeedInfo, TesterAssets, resolve_seed_inputs};
use rizz_game::{GameEngine, HighScoreStore, MemoryHighScoreStore};
use storage::JsonFileHighScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "rizz-tester", version)]
#[command(about = "Automated QA for the Rizz meme clicker engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated numbers, share codes, `clock`, or `all`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Override the step budget of every scenario
    #[arg(long)]
    taps: Option<u32>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Engine tuning JSON (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card catalog JSON to test instead of the builtin one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Play a script of commands (t = tap, w = wait, b = bank, g = give up) instead of scenarios
    #[arg(long)]
    play: Option<String>,

    /// High score file used by --play (defaults to an in-memory score)
    #[arg(long)]
    high_score_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let assets = TesterAssets::new(args.catalog.clone(), args.config.clone());
    let engine = GameEngine::from_loader(&assets).context("failed to load game data")?;

    if let Some(script) = args.play.as_deref() {
        return run_play(&args, &engine, script);
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let tester = GameTester::new(engine, args.verbose);

    let all_results = run_logic_scenarios(&args, &scenarios, &seed_infos, tester);
    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Rizz Automated Tester".bright_cyan().bold());
    println!("{}", "========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for name in scenario_names() {
            if !scenarios.contains(&name) {
                scenarios.push(name);
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[SeedInfo],
    tester: GameTester,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(tester, args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        let Some(mut scenario) = get_scenario(scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        if let Some(taps) = args.taps {
            scenario.plan = scenario.plan.with_steps(taps);
        }
        results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let generated_at = Utc::now();

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                    generated_at,
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn run_play(args: &Args, engine: &GameEngine, script: &str) -> Result<()> {
    let commands = play::parse_script(script)?;
    let store: Box<dyn HighScoreStore> = match &args.high_score_file {
        Some(path) => Box::new(JsonFileHighScoreStore::new(path)),
        None => Box::new(MemoryHighScoreStore::new()),
    };
    let seed = resolve_seed_inputs(&split_csv(&args.seeds))?
        .first()
        .map_or(1337, |info| info.seed);
    let mut session = engine.create_session(seed, store)?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(
        output_target.writer(),
        "🎲 Seed {seed} ({})",
        rizz_game::encode_friendly(seed)
    )?;
    let tally = play::run_script(&mut session, &commands, output_target.writer())?;
    writeln!(
        output_target.writer(),
        "Taps: {} ({} ignored) | Banks: {} | Give ups: {}",
        tally.taps,
        tally.ignored_taps,
        tally.banks,
        tally.give_ups
    )?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            taps: None,
            report: ReportFormat::Json,
            output: None,
            config: None,
            catalog: None,
            verbose: false,
            play: None,
            high_score_file: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rizz-main-{}-{name}", std::process::id()))
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let scenarios = expand_scenarios("determinism,all");
        assert_eq!(scenarios[0], "determinism");
        assert_eq!(scenarios.len(), scenario_names().len());
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        assert_eq!(
            expand_scenarios("reset-complete, smoke"),
            vec!["reset-complete", "smoke"]
        );
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("special-event-gaps"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("report.md");
        let args = Args {
            report: ReportFormat::Markdown,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("_No scenarios executed._"));
    }

    #[test]
    fn taps_override_applies_to_every_scenario() {
        let args = Args {
            taps: Some(5),
            ..base_args()
        };
        let engine = GameEngine::from_loader(&TesterAssets::default()).unwrap();
        let results = run_logic_scenarios(
            &args,
            &["smoke".to_string()],
            &[SeedInfo::from_numeric(3)],
            GameTester::new(engine, false),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].taps_played, 5);
    }

    #[test]
    fn play_persists_high_score_file() {
        let score_file = temp_path("score.json");
        let _ = std::fs::remove_file(&score_file);
        let args = Args {
            seeds: "42".to_string(),
            output: Some(temp_path("play.txt")),
            high_score_file: Some(score_file.clone()),
            ..base_args()
        };
        let engine = GameEngine::from_loader(&TesterAssets::default()).unwrap();
        run_play(&args, &engine, "twtwtwb").unwrap();
        let store = JsonFileHighScoreStore::new(&score_file);
        let saved = store.load().unwrap();
        let transcript = std::fs::read_to_string(temp_path("play.txt")).unwrap();
        assert!(transcript.contains("Seed 42"));
        // A negative run never beats the absent (zero) high score.
        if transcript.contains("NEW HIGH SCORE") {
            assert!(saved.unwrap() > 0);
        } else {
            assert_eq!(saved, None);
        }
    }
}
