use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use rizz_game::{
    BankOutcome, EngineConfig, GameEngine, GameSession, GameSnapshot, GiveUpOutcome,
    MemoryHighScoreStore, RunOutcome, RunRecord, TapOutcome,
};
use serde::Serialize;

use crate::logic::policy::{PlayAction, PlayStrategy};

pub const DEFAULT_STEPS: u32 = 120;

/// What one scenario run does: a strategy, a step budget and the checks to
/// run on the finished summary.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: PlayStrategy,
    pub steps: u32,
    pub starting_high_score: Option<i64>,
    pub replay_check: bool,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: PlayStrategy) -> Self {
        Self {
            strategy,
            steps: DEFAULT_STEPS,
            starting_high_score: None,
            replay_check: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    #[must_use]
    pub const fn with_high_score(mut self, score: i64) -> Self {
        self.starting_high_score = Some(score);
        self
    }

    /// Play the run a second time from the same seed and keep both records.
    #[must_use]
    pub const fn with_replay(mut self) -> Self {
        self.replay_check = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's failure message.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Result of a single action, with the session state on both sides of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: u32,
    pub action: PlayAction,
    pub before: GameSnapshot,
    pub after: GameSnapshot,
    pub tap: Option<TapOutcome>,
    pub bank: Option<BankOutcome>,
    pub give_up: Option<GiveUpOutcome>,
    /// A second tap sent while the card was still up; must have been rejected.
    pub rejected_while_shown: bool,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: PlayStrategy,
    pub policy_name: &'static str,
    pub config: EngineConfig,
    pub starting_high_score: i64,
    pub steps: Vec<StepRecord>,
    pub history: Vec<RunRecord>,
    pub final_snapshot: GameSnapshot,
    pub replay: Option<Vec<StepRecord>>,
}

impl SimulationSummary {
    pub fn taps(&self) -> impl Iterator<Item = &TapOutcome> + '_ {
        self.steps.iter().filter_map(|step| step.tap.as_ref())
    }

    pub fn banks(&self) -> impl Iterator<Item = &BankOutcome> + '_ {
        self.steps.iter().filter_map(|step| step.bank.as_ref())
    }

    /// Best score banked across all finished runs.
    #[must_use]
    pub fn best_bank(&self) -> Option<i64> {
        self.history
            .iter()
            .filter(|run| run.outcome == RunOutcome::Banked)
            .map(|run| run.score)
            .max()
    }

    #[must_use]
    pub fn special_event_count(&self) -> usize {
        self.taps()
            .filter(|tap| tap.special_event.is_some())
            .count()
    }
}

/// Drives engine sessions under a play strategy.
#[derive(Debug, Clone)]
pub struct GameTester {
    engine: GameEngine,
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(engine: GameEngine, verbose: bool) -> Self {
        Self { engine, verbose }
    }

    /// Run `plan` once from `seed`, plus a replay when the plan asks for one.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses to create a session.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut summary = self.play(plan, seed)?;
        if plan.replay_check {
            summary.replay = Some(self.play(plan, seed)?.steps);
        }
        Ok(summary)
    }

    fn play(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let store = plan
            .starting_high_score
            .map_or_else(MemoryHighScoreStore::new, MemoryHighScoreStore::with_score);
        let mut session = self.engine.create_session(seed, Box::new(store))?;
        let starting_high_score = session.high_score();
        let mut policy = plan.strategy.build(seed);

        let mut steps = Vec::with_capacity(usize::try_from(plan.steps).unwrap_or(0));
        for step in 0..plan.steps {
            let before = session.snapshot();
            let action = policy.next_action(&before);
            let record = apply_action(&mut session, step, action, before);
            if self.verbose {
                log_step(&record);
            }
            steps.push(record);
        }

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            policy_name: policy.name(),
            config: self.engine.config().clone(),
            starting_high_score,
            steps,
            history: session.history().to_vec(),
            final_snapshot: session.snapshot(),
            replay: None,
        })
    }
}

fn apply_action(
    session: &mut GameSession,
    step: u32,
    action: PlayAction,
    before: GameSnapshot,
) -> StepRecord {
    let mut tap = None;
    let mut bank = None;
    let mut give_up = None;
    let mut rejected_while_shown = false;

    match action {
        PlayAction::Tap | PlayAction::BiasedTap(_) => {
            let preference = match action {
                PlayAction::BiasedTap(pref) => Some(pref),
                _ => None,
            };
            if let Some(outcome) = session.tap_with_bias(preference) {
                // An impatient second tap must bounce off the shown card.
                rejected_while_shown = session.tap().is_none();
                session.finish_display(outcome.display_token);
                tap = Some(outcome);
            }
        }
        PlayAction::Bank => bank = Some(session.bank()),
        PlayAction::GiveUp => give_up = Some(session.give_up()),
    }

    StepRecord {
        step,
        action,
        before,
        after: session.snapshot(),
        tap,
        bank,
        give_up,
        rejected_while_shown,
    }
}

fn log_step(record: &StepRecord) {
    if let Some(tap) = &record.tap {
        let event = tap
            .special_event
            .as_ref()
            .map_or_else(String::new, |event| format!(" | {}", event.message));
        println!(
            "     #{:<4} {:<10} {:<28} {:+4} -> rizz {}{}",
            record.step,
            record.action.to_string(),
            tap.card.name,
            tap.attributes.total(),
            tap.rizz_level,
            event
        );
    } else if let Some(bank) = &record.bank {
        println!(
            "     #{:<4} bank {} (high score {})",
            record.step, bank.banked_score, bank.high_score
        );
    } else if let Some(give_up) = &record.give_up {
        println!(
            "     #{:<4} give up {} after {} taps",
            record.step, give_up.discarded_score, give_up.taps
        );
    }
}
