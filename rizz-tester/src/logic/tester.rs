use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};
use crate::logic::seeds::{SeedInfo, iteration_seed};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub share_code: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub taps_played: usize,
    pub special_events: usize,
    pub runs_finished: usize,
    pub best_bank: Option<i64>,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct LogicTester {
    tester: GameTester,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(tester: GameTester, verbose: bool) -> Self {
        Self { tester, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[SeedInfo],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {} / {})",
                        scenario.name.bright_white(),
                        seed.seed,
                        seed.share_code()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: &SeedInfo,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::with_capacity(iterations);
        let mut taps_played = 0;
        let mut special_events = 0;
        let mut best_bank: Option<i64> = None;
        let mut runs_finished = 0;

        for i in 0..iterations {
            let start_time = Instant::now();
            let run_seed = iteration_seed(seed.seed, i);
            let summary = match self.tester.run_plan(&scenario.plan, run_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    failures.push(format!("Iteration {} (seed {run_seed}): {err:#}", i + 1));
                    continue;
                }
            };
            durations.push(start_time.elapsed());
            taps_played += summary.taps().count();
            special_events += summary.special_event_count();
            runs_finished += summary.history.len();
            if let Some(best) = summary.best_bank() {
                best_bank = Some(best_bank.map_or(best, |prev| prev.max(best)));
            }

            match evaluate_expectations(&scenario.plan, &summary) {
                Some(err) => {
                    let final_state = &summary.final_snapshot;
                    failures.push(format!(
                        "Iteration {} (seed {}, strategy {}, steps {}): {} | final rizz {} taps {} high score {}",
                        i + 1,
                        summary.seed,
                        summary.strategy,
                        summary.steps.len(),
                        err,
                        final_state.rizz_level,
                        final_state.click_count,
                        final_state.high_score
                    ));
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.red()
                        );
                    }
                }
                None => {
                    successes += 1;
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({:?}) taps:{} events:{} policy:{}",
                            i + 1,
                            iterations,
                            start_time.elapsed(),
                            summary.taps().count(),
                            summary.special_event_count(),
                            summary.policy_name
                        );
                    }
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed: seed.seed,
            share_code: seed.share_code(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            taps_played,
            special_events,
            runs_finished,
            best_bank,
            failures,
            average_duration: average(&durations),
        }
    }
}

fn average(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        Duration::ZERO
    } else {
        durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
