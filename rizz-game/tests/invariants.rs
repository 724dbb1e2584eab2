use rizz_game::{
    Attributes, CardCatalog, EngineConfig, EventType, GameSession, MemoryHighScoreStore,
    RunOutcome, RunState, SessionRng, SpecialEvent, StatType, Stats, generate_attributes,
};
use std::rc::Rc;

fn session(seed: u64, high_score: Option<i64>) -> GameSession {
    let store = high_score.map_or_else(MemoryHighScoreStore::new, MemoryHighScoreStore::with_score);
    GameSession::new(
        Rc::new(CardCatalog::builtin().unwrap()),
        EngineConfig::default(),
        seed,
        Box::new(store),
    )
    .unwrap()
}

fn tap(session: &mut GameSession) {
    let outcome = session.tap().unwrap();
    assert_eq!(
        outcome.rizz_level,
        outcome.stats.vibe_level + outcome.stats.swagger + outcome.stats.cringe_avoidance
    );
    session.finish_display(outcome.display_token);
}

#[test]
fn rizz_level_is_always_the_sum_of_stats() {
    for seed in [1_u64, 42, 0xDEAD_BEEF] {
        let mut s = session(seed, None);
        for step in 0..500 {
            tap(&mut s);
            let snap = s.snapshot();
            assert_eq!(
                snap.rizz_level,
                snap.stats.vibe_level + snap.stats.swagger + snap.stats.cringe_avoidance,
                "seed {seed} step {step}"
            );
        }
    }
}

#[test]
fn high_score_never_decreases_across_banks() {
    let mut s = session(1234, Some(10));
    let mut previous = s.high_score();
    for round in 0..40 {
        for _ in 0..(round % 9 + 1) {
            tap(&mut s);
        }
        let before = s.snapshot().rizz_level;
        let outcome = s.bank();
        assert!(outcome.high_score >= previous);
        assert_eq!(outcome.new_record, before > previous);
        if !outcome.new_record {
            assert_eq!(outcome.high_score, previous);
        }
        previous = outcome.high_score;
    }
}

#[test]
fn bank_and_give_up_always_reset_the_run() {
    let mut s = session(77, None);
    for round in 0..20 {
        for _ in 0..round {
            tap(&mut s);
        }
        if round % 3 == 0 {
            s.give_up();
            assert_eq!(s.run_state(), RunState::GivenUp);
        } else {
            s.bank();
            assert_eq!(s.run_state(), RunState::Banked);
        }
        let snap = s.snapshot();
        assert_eq!(snap.stats, Stats::zero());
        assert_eq!(snap.click_count, 0);
        assert!(!snap.is_card_shown);
    }
    assert_eq!(s.history().len(), 20);
    assert_eq!(
        s.history()
            .iter()
            .filter(|run| run.outcome == RunOutcome::GivenUp)
            .count(),
        7
    );
}

#[test]
fn give_up_keeps_high_score() {
    let mut s = session(5, Some(500));
    for _ in 0..30 {
        tap(&mut s);
    }
    s.give_up();
    assert_eq!(s.high_score(), 500);
}

#[test]
fn seed_42_zero_bias_attributes_stay_in_spread() {
    let mut rng = SessionRng::new(42);
    let cfg = EngineConfig::default().attributes;
    let attributes = generate_attributes(0.0, &cfg, &mut rng);
    for value in [
        attributes.vibe_level,
        attributes.swagger,
        attributes.cringe_avoidance,
    ] {
        assert!((-15..=15).contains(&value), "{value} outside spread");
    }
}

#[test]
fn all_stat_event_adds_to_every_stat() {
    let event = SpecialEvent::new(EventType::Good, 10, StatType::All);
    let stats = Stats::zero().apply_special_event(&event);
    assert_eq!(stats, Stats::new(10, 10, 10));
    assert_eq!(stats.rizz_level(), 30);
}

#[test]
fn bank_at_fifty_over_thirty_sets_new_high_score() {
    let mut s = session(3, Some(30));
    s.set_stats_for_testing(Stats::zero().apply_attributes(&Attributes::new(20, 20, 10)));
    assert_eq!(s.snapshot().rizz_level, 50);
    let outcome = s.bank();
    assert_eq!(outcome.high_score, 50);
    assert_eq!(s.snapshot().stats, Stats::zero());
}
