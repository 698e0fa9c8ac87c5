use playlab_core::{Outcome, RngSource, ScriptedRandom, SessionStatus, TrialState};
use playlab_session::games::{
    AimParams, AimTrainer, Click, ColorPerception, ColorPerceptionParams, Direction,
    MemoryMatch, MemoryMatchParams, NumberSequence, NumberSequenceParams, Press, ReactionParams,
    ReactionTest, ShapeRecognition, ShapeRecognitionParams, SimonParams, SimonSays, Typed,
    TypingParams, TypingSpeed, VerbalAnswer, VerbalMemory, VerbalMemoryParams, VisualMemory,
    VisualMemoryParams,
};
use playlab_session::{Game, GamesConfig, InputEffect, SessionError, SessionEvent, SessionMachine};
use playlab_timing::{Clock, ManualClock};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

fn reaction_with(min_delay_ms: u64, spread_ms: u64) -> ReactionTest {
    ReactionTest::visual(ReactionParams {
        min_delay: Duration::from_millis(min_delay_ms),
        delay_spread: Duration::from_millis(spread_ms),
        ..ReactionParams::default()
    })
}

fn onset(trial: usize) -> SessionEvent {
    SessionEvent::StimulusOnset { trial }
}

#[test]
fn reaction_latency_is_measured_from_onset() {
    let clock = ManualClock::new();
    // 0.3334 * 3001 -> 1000, so the wait is 1000 + 1000 ms
    let rng = ScriptedRandom::new([0.3334]);
    let mut m = SessionMachine::new(reaction_with(1000, 3000), clock.clone(), rng);
    m.start().unwrap();
    let events = m.update();
    assert!(events.contains(&SessionEvent::Started));
    assert!(events.contains(&SessionEvent::TrialArmed { trial: 0, level: 1 }));
    assert_eq!(m.current_trial_state(), Some(TrialState::Armed));

    clock.advance_ms(1999);
    assert!(!m.update().contains(&onset(0)));
    assert!(m.visible_stimulus().is_none());

    clock.advance_ms(1);
    assert!(m.update().contains(&onset(0)));
    assert_eq!(m.current_trial_state(), Some(TrialState::Active));

    clock.advance_ms(200);
    assert_eq!(m.respond(Press), InputEffect::Resolved(Outcome::OnTimeCorrect));
    let rec = &m.session().trials()[0];
    assert_eq!(rec.latency(), Some(Duration::from_millis(200)));
    assert_eq!(rec.onset_ns(), Some(2_000_000_000));

    let events = m.update();
    assert!(events.contains(&SessionEvent::TrialResolved {
        trial: 0,
        outcome: Outcome::OnTimeCorrect,
        latency_ms: Some(200.0),
    }));
}

#[test]
fn early_press_cancels_the_pending_onset() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(reaction_with(1500, 0), clock.clone(), ScriptedRandom::new([0.0]));
    m.start().unwrap();
    assert!(m.has_pending_timer());

    clock.advance_ms(500);
    assert_eq!(m.respond(Press), InputEffect::Resolved(Outcome::Premature));
    let rec = &m.session().trials()[0];
    assert_eq!(rec.outcome(), Outcome::Premature);
    assert_eq!(rec.onset_ns(), None);
    assert_eq!(rec.latency(), None);

    // the old onset deadline at 1500 ms must not surface for trial 0
    clock.advance_ms(1000);
    let events = m.update();
    assert!(!events.contains(&onset(0)));
    assert!(events.contains(&SessionEvent::TrialArmed { trial: 1, level: 1 }));
    assert_eq!(m.session().trials().len(), 1);
    assert_eq!(m.summary().premature, 1);
}

#[test]
fn reaction_session_ends_after_configured_trials() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(reaction_with(1000, 0), clock.clone(), ScriptedRandom::new([0.0]));
    m.start().unwrap();
    for i in 0..5u64 {
        clock.advance_ms(1000);
        assert!(m.update().contains(&onset(i as usize)));
        clock.advance_ms(150 + i * 10);
        assert!(matches!(m.respond(Press), InputEffect::Resolved(_)));
        if i < 4 {
            clock.advance_ms(1000);
            m.update();
        }
    }
    assert_eq!(m.status(), SessionStatus::Terminated);
    let summary = m.summary();
    assert_eq!(summary.trials, 5);
    assert_eq!(summary.mean_latency_ms, Some(170.0));
    assert_eq!(summary.best_latency_ms, Some(150.0));
    assert_eq!(summary.accuracy, 1.0);
    assert!(!m.has_pending_timer());
}

#[test]
fn number_sequence_levels_up_with_a_longer_sequence() {
    let clock = ManualClock::new();
    let rng = ScriptedRandom::new([0.45, 0.75, 0.25]);
    let mut m = SessionMachine::new(
        NumberSequence::new(NumberSequenceParams::default()),
        clock.clone(),
        rng,
    );
    m.start().unwrap();
    assert_eq!(m.current_trial_state(), Some(TrialState::Presenting));
    assert_eq!(m.visible_stimulus().map(|d| d.0.clone()), Some(vec![4, 7, 2]));
    assert_eq!(m.respond(vec![4, 7, 2]), InputEffect::Ignored);

    clock.advance_ms(2900);
    assert!(m.update().contains(&SessionEvent::RecallOpened { trial: 0 }));
    assert!(m.visible_stimulus().is_none());

    clock.advance_ms(1500);
    assert_eq!(m.respond(vec![4, 7]), InputEffect::Rejected);
    assert_eq!(m.respond(vec![4, 7, 2]), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(
        m.session().trials()[0].latency(),
        Some(Duration::from_millis(1500))
    );
    assert_eq!(m.session().level(), 2);
    assert_eq!(m.session().score(), 30);

    clock.advance_ms(1000);
    let events = m.update();
    assert!(events.contains(&SessionEvent::TrialArmed { trial: 1, level: 2 }));
    let next = m.current_trial().unwrap();
    assert_eq!(next.stimulus.0, vec![4, 7, 2, 4]);
}

#[test]
fn verbal_memory_scores_seen_and_new_answers() {
    let clock = ManualClock::new();
    let params = VerbalMemoryParams {
        words: vec!["alpha".into(), "beta".into(), "gamma".into()],
        ..VerbalMemoryParams::default()
    };
    // new alpha | reshow alpha | no reshow, new beta
    let rng = ScriptedRandom::new([0.0, 0.1, 0.0, 0.9, 0.0]);
    let mut m = SessionMachine::new(VerbalMemory::new(params), clock.clone(), rng);
    m.start().unwrap();

    let card = m.visible_stimulus().unwrap().clone();
    assert_eq!(card.word, "alpha");
    assert!(!card.seen_before);
    assert_eq!(m.respond(VerbalAnswer::Seen), InputEffect::Resolved(Outcome::OnTimeIncorrect));
    assert_eq!(m.session().lives_remaining(), Some(2));

    clock.advance_ms(400);
    m.update();
    let card = m.visible_stimulus().unwrap().clone();
    assert_eq!(card.word, "alpha");
    assert!(card.seen_before);
    assert_eq!(m.respond(VerbalAnswer::Seen), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(m.session().score(), 1);

    clock.advance_ms(400);
    m.update();
    let card = m.visible_stimulus().unwrap().clone();
    assert_eq!(card.word, "beta");
    assert_eq!(m.respond(VerbalAnswer::New), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(m.session().score(), 2);
    assert_eq!(m.session().lives_remaining(), Some(2));
}

#[test]
fn losing_the_last_life_terminates_and_blocks_input() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(
        SimonSays::new(SimonParams::default()),
        clock.clone(),
        ScriptedRandom::new([0.0]),
    );
    m.start().unwrap();
    clock.advance_ms(700);
    assert!(m.update().contains(&SessionEvent::RecallOpened { trial: 0 }));
    assert_eq!(
        m.respond(Direction::Down),
        InputEffect::Resolved(Outcome::OnTimeIncorrect)
    );
    assert_eq!(m.status(), SessionStatus::Terminated);
    assert!(m.update().contains(&SessionEvent::Terminated));
    assert_eq!(m.respond(Direction::Up), InputEffect::Ignored);
    assert_eq!(m.start(), Err(SessionError::AlreadyTerminated));

    let finished = m.replay().unwrap();
    assert_eq!(finished.trials().len(), 1);
    assert_eq!(m.status(), SessionStatus::NotStarted);
    assert!(m.game().sequence().is_empty());
    m.start().unwrap();
    assert_eq!(m.session().trials().len(), 0);
}

#[test]
fn replay_requires_a_finished_session() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(reaction_with(1000, 0), clock, ScriptedRandom::new([0.0]));
    m.start().unwrap();
    assert_eq!(m.start(), Err(SessionError::AlreadyStarted));
    assert!(matches!(m.replay(), Err(SessionError::StillRunning)));
}

#[test]
fn a_trial_resolves_only_once() {
    let clock = ManualClock::new();
    let game = ReactionTest::visual(ReactionParams {
        min_delay: Duration::from_millis(1000),
        delay_spread: Duration::ZERO,
        response_window: Some(Duration::from_millis(500)),
        ..ReactionParams::default()
    });
    let mut m = SessionMachine::new(game, clock.clone(), ScriptedRandom::new([0.0]));
    m.start().unwrap();
    clock.advance_ms(1000);
    m.update();

    clock.advance_ms(100);
    assert_eq!(m.respond(Press), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(m.respond(Press), InputEffect::Ignored);
    clock.advance_ms(600);
    let events = m.update();
    let resolved = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::TrialResolved { trial: 0, .. }))
        .count();
    assert_eq!(resolved, 1);
    assert_eq!(m.session().trials().len(), 1);

    // next trial is left to time out
    clock.advance_ms(400);
    m.update();
    clock.advance_ms(1000);
    assert!(m.update().contains(&onset(1)));
    clock.advance_ms(500);
    let events = m.update();
    assert!(events.contains(&SessionEvent::TrialResolved {
        trial: 1,
        outcome: Outcome::Missed,
        latency_ms: None,
    }));
    assert_eq!(m.respond(Press), InputEffect::Ignored);
    assert_eq!(m.session().trials().len(), 2);
}

#[test]
fn time_limit_abandons_the_trial_in_flight() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(
        ShapeRecognition::new(ShapeRecognitionParams::default()),
        clock.clone(),
        ScriptedRandom::new([0.0]),
    );
    m.start().unwrap();
    clock.advance_ms(800);
    assert_eq!(m.respond(0), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(m.session().score(), 12);
    assert!(m.current_trial().is_some());
    assert_eq!(m.time_remaining(), Some(Duration::from_millis(29_200)));

    clock.advance(Duration::from_secs(30));
    assert!(m.update().contains(&SessionEvent::Terminated));
    assert!(m.current_trial().is_none());
    let summary = m.summary();
    assert_eq!(summary.trials, 1);
    assert_eq!(summary.duration_ms, Some(30_800));
}

#[test]
fn aim_session_stops_at_the_hit_target() {
    let clock = ManualClock::new();
    // every target lands centred on (300, 200)
    let mut m = SessionMachine::new(
        AimTrainer::new(AimParams::default()),
        clock.clone(),
        ScriptedRandom::new([0.5]),
    );
    m.start().unwrap();
    assert!(m.visible_stimulus().is_none());
    clock.advance_ms(500);
    m.update();

    clock.advance_ms(250);
    assert_eq!(
        m.respond(Click { x: 300.0, y: 200.0 }),
        InputEffect::Resolved(Outcome::OnTimeCorrect)
    );
    assert_eq!(m.session().score(), 75);
    assert_eq!(
        m.respond(Click { x: 0.0, y: 0.0 }),
        InputEffect::Resolved(Outcome::OnTimeIncorrect)
    );
    assert_eq!(m.session().score(), 50);

    for _ in 0..19 {
        clock.advance_ms(2000);
        m.respond(Click { x: 300.0, y: 200.0 });
    }
    assert_eq!(m.status(), SessionStatus::Terminated);
    let summary = m.summary();
    assert_eq!(summary.correct, 20);
    assert_eq!(summary.incorrect, 1);
    assert!((summary.accuracy - 20.0 / 21.0).abs() < 1e-9);
    assert_eq!(m.trial_progress(), Some((20, 20)));
}

#[test]
fn teardown_releases_the_timer() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(reaction_with(1000, 3000), clock.clone(), ScriptedRandom::new([0.5]));
    m.start().unwrap();
    assert!(m.has_pending_timer());
    m.teardown();
    assert!(!m.has_pending_timer());
    assert_eq!(m.status(), SessionStatus::Terminated);
    m.teardown();
    clock.advance_ms(10_000);
    assert!(!m.update().contains(&onset(0)));
}

#[test]
fn seeded_sessions_keep_measurements_in_bounds() {
    for seed in 0..8u64 {
        let clock = ManualClock::new();
        let mut m = SessionMachine::new(
            ReactionTest::visual(ReactionParams::default()),
            clock.clone(),
            RngSource(StdRng::seed_from_u64(seed)),
        );
        m.start().unwrap();
        let mut steps = 0;
        while m.status().is_active() && steps < 10_000 {
            clock.advance_ms(50);
            m.update();
            if m.visible_stimulus().is_some() && seed % 2 == 0 {
                m.respond(Press);
            }
            steps += 1;
        }
        if seed % 2 == 1 {
            // never answering leaves every trial without a response
            assert!(m.status().is_active());
            m.teardown();
        }
        let s = m.session();
        assert!((0.0..=1.0).contains(&s.accuracy()));
        for t in s.trials() {
            if let (Some(on), Some(resp)) = (t.onset_ns(), t.response_ns()) {
                assert!(resp >= on);
            }
            assert!(t.latency().is_none_or(|d| d.as_nanos() as u64 <= clock.now()));
        }
    }
}

#[test]
fn visual_memory_grid_stays_capped_through_max_level() {
    let clock = ManualClock::new();
    let game = VisualMemory::new(VisualMemoryParams::default());
    let max = game.max_level();
    let mut m = SessionMachine::new(
        game,
        clock.clone(),
        ScriptedRandom::new([0.37, 0.81, 0.05, 0.62, 0.93]),
    );
    m.start().unwrap();
    m.update();
    for level in 1..=max {
        let trial = m.current_trial().unwrap();
        assert_eq!(trial.level, level);
        let pattern = trial.stimulus.clone();
        let side = pattern.side as usize;
        assert!(side <= 6, "side {side} at level {level}");
        assert!(pattern.cells.len() <= side * side - 2);
        let mut distinct = pattern.cells.clone();
        distinct.dedup();
        assert_eq!(distinct.len(), pattern.cells.len());
        assert!(pattern.cells.iter().all(|&c| c < side * side));

        clock.advance_ms(10_000);
        m.update();
        assert_eq!(m.current_trial_state(), Some(TrialState::Recalling));
        for &cell in &pattern.cells {
            m.respond(cell);
        }
        clock.advance_ms(10_000);
        m.update();
    }
    assert_eq!(m.session().level(), max);
    let last = &m.current_trial().unwrap().stimulus;
    assert_eq!(last.side, 6);
    assert_eq!(last.cells.len(), 34);
    assert!(m.status().is_active());
}

#[test]
fn color_delta_never_drops_below_its_floor() {
    let clock = ManualClock::new();
    let game = ColorPerception::new(ColorPerceptionParams {
        max_reduction: 30.0,
        ..ColorPerceptionParams::default()
    });
    let max = game.max_level();
    let mut m = SessionMachine::new(game, clock.clone(), ScriptedRandom::new([0.2, 0.7, 0.45, 0.9]));
    m.start().unwrap();
    m.update();
    for level in 1..=max {
        let grid = m.current_trial().unwrap().stimulus.clone();
        assert_eq!(m.current_trial().unwrap().level, level);
        assert!(grid.side <= 6);
        assert!(grid.odd_index < (grid.side * grid.side) as usize);
        assert!(grid.odd.l - grid.base.l >= 3.0 - 1e-9, "delta below floor at level {level}");
        assert_eq!(m.respond(grid.odd_index), InputEffect::Resolved(Outcome::OnTimeCorrect));
        clock.advance_ms(1000);
        m.update();
    }
    let grid = &m.current_trial().unwrap().stimulus;
    assert_eq!(grid.side, 6);
    assert!((grid.odd.l - grid.base.l - 3.0).abs() < 1e-9);
}

#[test]
fn number_sequence_grows_one_digit_per_level_up_to_its_cap() {
    let clock = ManualClock::new();
    let game = NumberSequence::new(NumberSequenceParams::default());
    let max = game.max_level();
    assert_eq!(max, 18);
    let mut m = SessionMachine::new(game, clock.clone(), ScriptedRandom::new([0.15, 0.55, 0.95, 0.35]));
    m.start().unwrap();
    m.update();
    for level in 1..=max {
        let digits = m.current_trial().unwrap().stimulus.clone();
        assert_eq!(digits.len(), (level as usize + 2).min(20));
        clock.advance_ms(30_000);
        m.update();
        assert_eq!(
            m.respond(digits.0.clone()),
            InputEffect::Resolved(Outcome::OnTimeCorrect)
        );
        clock.advance_ms(5_000);
        m.update();
    }
    assert_eq!(m.session().level(), max);
    assert_eq!(m.current_trial().unwrap().stimulus.len(), 20);
}

#[test]
fn extreme_durations_saturate_instead_of_panicking() {
    let cfg = GamesConfig::from_json_str(
        r#"{
            "number_sequence": { "per_digit": 9223372036854775807, "max_length": 100000 },
            "simon": { "flash": 18446744073709551615, "gap": 18446744073709551615 },
            "reaction": { "min_delay": 18446744073709551615, "delay_spread": 18446744073709551615 }
        }"#,
    )
    .unwrap();

    let clock = ManualClock::new();
    let mut m = SessionMachine::new(
        NumberSequence::new(cfg.number_sequence),
        clock.clone(),
        ScriptedRandom::new([0.5]),
    );
    m.start().unwrap();
    m.update();
    assert_eq!(
        m.current_trial().unwrap().durations.presentation,
        Some(Duration::MAX)
    );
    clock.advance(Duration::from_secs(86_400));
    assert!(m.update().is_empty());
    assert_eq!(m.current_trial_state(), Some(TrialState::Presenting));
    assert!(m.has_pending_timer());

    let mut s = SessionMachine::new(
        SimonSays::new(cfg.simon),
        clock.clone(),
        ScriptedRandom::new([0.5]),
    );
    s.start().unwrap();
    s.update();
    assert!(s.has_pending_timer());
    assert!(s.next_wake_in().is_some());

    let mut r = SessionMachine::new(
        ReactionTest::visual(cfg.reaction),
        clock.clone(),
        ScriptedRandom::new([0.999]),
    );
    r.start().unwrap();
    clock.advance(Duration::from_secs(86_400));
    assert!(!r.update().contains(&onset(0)));
    assert_eq!(r.current_trial_state(), Some(TrialState::Armed));
}

#[test]
fn memory_match_ends_once_every_pair_is_found() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(
        MemoryMatch::new(MemoryMatchParams {
            pairs: 2,
            ..MemoryMatchParams::default()
        }),
        clock.clone(),
        ScriptedRandom::new([0.0, 0.6]),
    );
    m.start().unwrap();
    let board = m.current_trial().unwrap().stimulus.clone();
    let twin_of = |i: usize| {
        (0..board.len())
            .find(|&j| j != i && board.faces[j] == board.faces[i])
            .unwrap()
    };
    let twin = twin_of(0);
    let miss = (1..board.len()).find(|&j| j != twin).unwrap();

    assert_eq!(m.respond(0), InputEffect::Progress { accepted: 1 });
    assert_eq!(m.respond(0), InputEffect::Ignored);
    assert_eq!(m.respond(miss), InputEffect::Resolved(Outcome::OnTimeIncorrect));
    clock.advance_ms(1000);
    m.update();

    assert_eq!(m.respond(0), InputEffect::Progress { accepted: 1 });
    assert_eq!(m.respond(twin), InputEffect::Resolved(Outcome::OnTimeCorrect));
    clock.advance_ms(1000);
    m.update();
    let next = &m.current_trial().unwrap().stimulus;
    assert_eq!(next.pairs_left(), 1);
    assert_eq!(m.respond(0), InputEffect::Ignored);

    let rest = twin_of(miss);
    m.respond(miss);
    assert_eq!(m.respond(rest), InputEffect::Resolved(Outcome::OnTimeCorrect));
    assert_eq!(m.status(), SessionStatus::Terminated);
    assert_eq!(m.session().trials().len(), 3);
    assert_eq!(
        m.share_text(),
        "I completed Memory Match (2 pairs) in 3 moves and 2.0s! Can you beat me?"
    );
}

#[test]
fn typing_round_scores_its_words_per_minute() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(
        TypingSpeed::new(TypingParams::default()),
        clock.clone(),
        ScriptedRandom::new([0.0]),
    );
    m.start().unwrap();
    let passage = m.current_trial().unwrap().stimulus.0.clone();
    assert_eq!(m.respond(Typed(String::new())), InputEffect::Rejected);
    clock.advance_ms(9_000);
    assert_eq!(
        m.respond(Typed(passage.replace("fox", "fix"))),
        InputEffect::Resolved(Outcome::OnTimeIncorrect)
    );
    assert_eq!(m.status(), SessionStatus::Terminated);
    assert_eq!(m.session().score(), 60);
    assert_eq!(
        m.share_text(),
        "I typed at 60 WPM with 98% accuracy! Can you beat me?"
    );
}

#[test]
fn next_wake_tracks_the_pending_deadline() {
    let clock = ManualClock::new();
    let mut m = SessionMachine::new(reaction_with(1000, 3000), clock.clone(), ScriptedRandom::new([0.3334]));
    assert_eq!(m.next_wake_in(), None);
    m.start().unwrap();
    assert_eq!(m.next_wake_in(), Some(Duration::from_millis(2000)));
    clock.advance_ms(1500);
    assert_eq!(m.next_wake_in(), Some(Duration::from_millis(500)));
    assert_eq!(m.respond(Press), InputEffect::Resolved(Outcome::Premature));
}
