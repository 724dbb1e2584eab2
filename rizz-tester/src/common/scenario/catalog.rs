use anyhow::{Result, ensure};
use rizz_game::numbers::floor_f64_to_i32;
use rizz_game::{EventType, PickPool, StatType};

use crate::common::scenario::TestScenario;
use crate::logic::{PlayAction, PlayStrategy, SimulationPlan, SimulationSummary, StepRecord};

/// Runs shorter than this many event periods may legitimately see no event.
const EVENT_REQUIRED_AFTER_PERIODS: u32 = 10;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Tap through a short run; every tap lands and the display gate holds",
            SimulationPlan::new(PlayStrategy::TapOnly)
                .with_steps(30)
                .with_expectation(smoke_expectation)
                .with_expectation(display_gate_expectation),
        ),
        TestScenario::new(
            "determinism",
            "Replay a random run from the same seed and compare every step",
            SimulationPlan::new(PlayStrategy::Random)
                .with_steps(150)
                .with_replay()
                .with_expectation(determinism_expectation),
        ),
        TestScenario::new(
            "rizz-invariant",
            "Rizz Level always equals the sum of the three stats",
            SimulationPlan::new(PlayStrategy::Random)
                .with_steps(300)
                .with_expectation(rizz_invariant_expectation),
        ),
        TestScenario::new(
            "bank-monotonic",
            "Banking never lowers the high score and only raises it on a better run",
            SimulationPlan::new(PlayStrategy::BankEvery(7))
                .with_steps(200)
                .with_high_score(25)
                .with_expectation(bank_monotonic_expectation),
        ),
        TestScenario::new(
            "reset-complete",
            "Bank and give up always zero the stats and the tap counter",
            SimulationPlan::new(PlayStrategy::Random)
                .with_steps(300)
                .with_expectation(reset_complete_expectation),
        ),
        TestScenario::new(
            "bias-extremes",
            "Full good/bad preference never returns a card of the other polarity",
            SimulationPlan::new(PlayStrategy::PolarityFlip)
                .with_steps(200)
                .with_expectation(bias_extremes_expectation),
        ),
        TestScenario::new(
            "special-event-gaps",
            "Special events only fire on taps divisible by a jittered target",
            SimulationPlan::new(PlayStrategy::TapOnly)
                .with_steps(400)
                .with_expectation(special_event_gap_expectation),
        ),
        TestScenario::new(
            "attribute-range",
            "Attributes stay in the biased spread and fold into stats exactly",
            SimulationPlan::new(PlayStrategy::Random)
                .with_steps(250)
                .with_expectation(attribute_range_expectation),
        ),
        TestScenario::new(
            "random-play",
            "Long seeded random session checked against every run invariant",
            SimulationPlan::new(PlayStrategy::Random)
                .with_steps(500)
                .with_expectation(rizz_invariant_expectation)
                .with_expectation(reset_complete_expectation)
                .with_expectation(high_score_never_drops_expectation)
                .with_expectation(display_gate_expectation)
                .with_expectation(attribute_range_expectation),
        ),
    ]
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let taps = summary.taps().count();
    ensure!(
        taps == summary.steps.len(),
        "only {taps} of {} taps were accepted",
        summary.steps.len()
    );
    let expected = u32::try_from(taps)?;
    ensure!(
        summary.final_snapshot.click_count == expected,
        "click count {} after {expected} taps",
        summary.final_snapshot.click_count
    );
    ensure!(
        !summary.final_snapshot.is_card_shown,
        "card still shown after the display elapsed"
    );
    Ok(())
}

fn display_gate_expectation(summary: &SimulationSummary) -> Result<()> {
    for step in summary.steps.iter().filter(|step| step.tap.is_some()) {
        ensure!(
            step.rejected_while_shown,
            "step {}: a second tap was accepted while the card was shown",
            step.step
        );
    }
    Ok(())
}

fn determinism_expectation(summary: &SimulationSummary) -> Result<()> {
    let Some(replay) = summary.replay.as_ref() else {
        anyhow::bail!("replay was not recorded");
    };
    ensure!(
        replay.len() == summary.steps.len(),
        "replay length {} differs from {}",
        replay.len(),
        summary.steps.len()
    );
    if let Some((original, replayed)) = summary
        .steps
        .iter()
        .zip(replay)
        .find(|(original, replayed)| original != replayed)
    {
        anyhow::bail!(
            "step {} diverged on replay: {} vs {}",
            original.step,
            describe(original),
            describe(replayed)
        );
    }
    Ok(())
}

fn rizz_invariant_expectation(summary: &SimulationSummary) -> Result<()> {
    for step in &summary.steps {
        let stats = step.after.stats;
        ensure!(
            step.after.rizz_level == stats.vibe_level + stats.swagger + stats.cringe_avoidance,
            "step {}: rizz {} != {:?}",
            step.step,
            step.after.rizz_level,
            stats
        );
        if let Some(tap) = &step.tap {
            ensure!(
                tap.rizz_level == tap.stats.rizz_level(),
                "step {}: tap reported rizz {} for {:?}",
                step.step,
                tap.rizz_level,
                tap.stats
            );
        }
    }
    Ok(())
}

fn bank_monotonic_expectation(summary: &SimulationSummary) -> Result<()> {
    high_score_never_drops_expectation(summary)?;
    ensure!(summary.banks().next().is_some(), "plan never banked");
    for step in &summary.steps {
        let Some(bank) = &step.bank else { continue };
        let previous = step.before.high_score;
        ensure!(
            bank.new_record == (bank.banked_score > previous),
            "step {}: banked {} over {previous} but new_record = {}",
            step.step,
            bank.banked_score,
            bank.new_record
        );
        ensure!(
            bank.high_score == previous.max(bank.banked_score),
            "step {}: high score {} after banking {} over {previous}",
            step.step,
            bank.high_score,
            bank.banked_score
        );
    }
    Ok(())
}

fn high_score_never_drops_expectation(summary: &SimulationSummary) -> Result<()> {
    for step in &summary.steps {
        ensure!(
            step.after.high_score >= step.before.high_score,
            "step {}: high score dropped from {} to {}",
            step.step,
            step.before.high_score,
            step.after.high_score
        );
    }
    ensure!(
        summary.final_snapshot.high_score >= summary.starting_high_score,
        "final high score below the starting one"
    );
    Ok(())
}

fn reset_complete_expectation(summary: &SimulationSummary) -> Result<()> {
    for step in &summary.steps {
        if !matches!(step.action, PlayAction::Bank | PlayAction::GiveUp) {
            continue;
        }
        let after = &step.after;
        ensure!(
            after.rizz_level == 0 && after.stats.vibe_level == 0 && after.stats.swagger == 0,
            "step {}: stats not reset after {}: {:?}",
            step.step,
            step.action,
            after.stats
        );
        ensure!(
            after.stats.cringe_avoidance == 0,
            "step {}: cringe avoidance left at {}",
            step.step,
            after.stats.cringe_avoidance
        );
        ensure!(
            after.click_count == 0,
            "step {}: click count {} after {}",
            step.step,
            after.click_count,
            step.action
        );
        ensure!(!after.is_card_shown, "step {}: card still shown", step.step);
        if step.give_up.is_some() {
            ensure!(
                after.high_score == step.before.high_score,
                "step {}: give up changed the high score",
                step.step
            );
        }
    }
    Ok(())
}

fn bias_extremes_expectation(summary: &SimulationSummary) -> Result<()> {
    for step in &summary.steps {
        let (PlayAction::BiasedTap(preference), Some(tap)) = (step.action, &step.tap) else {
            continue;
        };
        let want_good = preference > 0.0;
        ensure!(
            tap.card.is_good == want_good,
            "step {}: preference {preference:+} drew {} ({})",
            step.step,
            tap.card.id,
            tap.card.bias
        );
        let expected_pool = if want_good {
            PickPool::Good
        } else {
            PickPool::Bad
        };
        ensure!(
            tap.pick.pool == expected_pool,
            "step {}: picked from {:?}",
            step.step,
            tap.pick.pool
        );
    }
    Ok(())
}

fn special_event_gap_expectation(summary: &SimulationSummary) -> Result<()> {
    let cfg = &summary.config.special_events;
    let min_target = cfg.period.saturating_sub(cfg.jitter);
    let max_target = cfg.period + cfg.jitter;
    let mut fired = 0;
    let mut deepest_click = 0;
    for tap in summary.taps() {
        deepest_click = deepest_click.max(tap.click_count);
        let Some(event) = &tap.special_event else {
            continue;
        };
        fired += 1;
        let click = tap.click_count;
        ensure!(
            click >= min_target,
            "special event fired on tap {click}, before the earliest target {min_target}"
        );
        ensure!(
            (min_target..=max_target).any(|target| target > 0 && click % target == 0),
            "tap {click} is not a multiple of any target in {min_target}..={max_target}"
        );
        let range = match event.event_type {
            EventType::Good => cfg.good_range,
            EventType::Bad => cfg.bad_range,
        };
        ensure!(
            range.contains(event.stat_change),
            "tap {click}: {:?} event changed stats by {}",
            event.event_type,
            event.stat_change
        );
        ensure!(!event.message.is_empty(), "tap {click}: empty event message");
    }
    if deepest_click >= cfg.period.saturating_mul(EVENT_REQUIRED_AFTER_PERIODS) {
        ensure!(fired > 0, "no special event in a run of {deepest_click} taps");
    }
    Ok(())
}

fn attribute_range_expectation(summary: &SimulationSummary) -> Result<()> {
    let cfg = &summary.config.attributes;
    for step in &summary.steps {
        let Some(tap) = &step.tap else { continue };
        let shift = floor_f64_to_i32(tap.card.bias * cfg.bias_scale);
        let attrs = tap.attributes;
        for value in [attrs.vibe_level, attrs.swagger, attrs.cringe_avoidance] {
            ensure!(
                (shift - cfg.spread..=shift + cfg.spread).contains(&value),
                "step {}: attribute {value} outside {shift}±{} for {}",
                step.step,
                cfg.spread,
                tap.card.id
            );
        }

        let mut expected = step.before.stats.apply_attributes(&attrs);
        if let Some(event) = &tap.special_event {
            expected = expected.apply_special_event(event);
            if event.stat_type == StatType::All {
                ensure!(
                    event.rizz_swing() == 3 * i64::from(event.stat_change),
                    "step {}: all-stat event swing is not tripled",
                    step.step
                );
            }
        }
        ensure!(
            tap.stats == expected,
            "step {}: stats {:?} but expected {:?}",
            step.step,
            tap.stats,
            expected
        );
    }
    Ok(())
}

fn describe(step: &StepRecord) -> String {
    match (&step.tap, &step.bank, &step.give_up) {
        (Some(tap), _, _) => format!("{} drew {} rizz {}", step.action, tap.card.id, tap.rizz_level),
        (_, Some(bank), _) => format!("bank {}", bank.banked_score),
        (_, _, Some(give_up)) => format!("give up {}", give_up.discarded_score),
        _ => format!("{} (ignored)", step.action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;
    use rizz_game::{BuiltinLoader, GameEngine};

    fn run(name: &str, seed: u64) -> Result<()> {
        let scenario = catalog_scenarios()
            .into_iter()
            .find(|scenario| scenario.name == name)
            .unwrap();
        let tester = GameTester::new(GameEngine::from_loader(&BuiltinLoader).unwrap(), false);
        let summary = tester.run_plan(&scenario.plan, seed)?;
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn every_scenario_passes_on_fixed_seeds() {
        for scenario in catalog_scenarios() {
            for seed in [1_u64, 1337, 0xC0FFEE] {
                if let Err(err) = run(&scenario.name, seed) {
                    panic!("{} failed on seed {seed}: {err:#}", scenario.name);
                }
            }
        }
    }

    #[test]
    fn short_runs_need_no_special_event() {
        let tester = GameTester::new(GameEngine::from_loader(&BuiltinLoader).unwrap(), false);
        for steps in [0, 10, 14, 40] {
            let plan = SimulationPlan::new(PlayStrategy::TapOnly).with_steps(steps);
            for seed in [1_u64, 1337, 0xC0FFEE] {
                let summary = tester.run_plan(&plan, seed).unwrap();
                if let Err(err) = special_event_gap_expectation(&summary) {
                    panic!("{steps} taps on seed {seed}: {err:#}");
                }
            }
        }
    }

    #[test]
    fn divergent_replay_is_caught() {
        let tester = GameTester::new(GameEngine::from_loader(&BuiltinLoader).unwrap(), false);
        let plan = SimulationPlan::new(PlayStrategy::TapOnly)
            .with_steps(5)
            .with_replay();
        let mut summary = tester.run_plan(&plan, 4).unwrap();
        if let Some(replay) = summary.replay.as_mut() {
            replay[2].after.click_count += 1;
        }
        assert!(determinism_expectation(&summary).is_err());
    }
}
