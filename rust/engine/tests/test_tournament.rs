mod helpers;

use cardroom_engine::config::TableConfig;
use cardroom_engine::engine::EngineState;
use cardroom_engine::helper::Notification;
use helpers::*;

fn tournament(seed: u64) -> TableConfig {
    TableConfig {
        tournament: true,
        ..seeded(seed)
    }
}

fn increases(sink: &cardroom_engine::helper::RecordingSink) -> Vec<(u64, u64)> {
    sink.notifications()
        .into_iter()
        .filter_map(|n| match n {
            Notification::BlindsIncreased { ante, small_raise } => Some((ante, small_raise)),
            _ => None,
        })
        .collect()
}

#[test]
fn blinds_rise_by_their_starting_value_after_seven_hands() {
    let (mut eng, sink) = engine_with(tournament(1), 4, ScriptedSource::folding());
    for _ in 0..6 {
        let outcome = eng.play_round().expect("round plays");
        assert!(outcome.eliminated.is_empty());
    }
    assert_eq!((eng.ante(), eng.small_raise()), (100, 250));
    assert!(increases(&sink).is_empty());

    eng.play_round().expect("round plays");
    assert_eq!((eng.ante(), eng.small_raise()), (200, 500));
    assert_eq!(increases(&sink), vec![(200, 500)]);
}

#[test]
fn blinds_never_exceed_half_the_money_in_play() {
    let config = TableConfig {
        starting_money: 1000,
        ante: 100,
        small_raise: 400,
        auto_increase_on_hand_divider: 1,
        ..tournament(2)
    };
    let (mut eng, sink) = engine_with(config, 2, ScriptedSource::folding());
    eng.play_round().expect("round plays");
    assert_eq!((eng.ante(), eng.small_raise()), (200, 800));
    eng.play_round().expect("round plays");
    assert_eq!((eng.ante(), eng.small_raise()), (300, 1000));
    eng.play_round().expect("round plays");
    assert_eq!((eng.ante(), eng.small_raise()), (400, 1000));
    assert_eq!(increases(&sink), vec![(200, 800), (300, 1000), (400, 1000)]);
}

#[test]
fn elimination_escalates_blinds_immediately() {
    let config = TableConfig {
        starting_money: 300,
        auto_increase_on_hand_divider: 1000,
        ..tournament(3)
    };
    let (mut eng, _sink) = engine_with(config, 3, ScriptedSource::calling());
    for _ in 0..50 {
        let outcome = eng.play_round().expect("round plays");
        if !outcome.eliminated.is_empty() {
            let cap = eng.total_money() / 2;
            assert_eq!(eng.ante(), 200.min(cap));
            assert_eq!(eng.small_raise(), 500.min(cap));
            return;
        }
        assert_eq!(eng.ante(), 100);
    }
    panic!("nobody was eliminated");
}

#[test]
fn tournaments_admit_no_late_joiners() {
    let source = ScriptedSource::folding().with_joiners(&["zed"]);
    let open_log = source.open_seats_log.clone();
    let (mut eng, _sink) = engine_with(tournament(4), 3, source);
    let outcome = eng.play_round().expect("round plays");
    assert!(outcome.joined.is_empty());
    assert!(open_log.lock().unwrap().is_empty());
    assert_eq!(eng.players().len(), 3);
}

#[test]
fn escalation_stays_capped_under_random_play() {
    for seed in 0..16u64 {
        let config = TableConfig {
            starting_money: 1500,
            auto_increase_on_hand_divider: 2,
            ..tournament(seed)
        };
        let (mut eng, _sink) = engine_with(config, 4, RandomSource::new(seed, 60));
        while eng.state() != EngineState::GameOver && eng.round() < 60 {
            eng.play_round().expect("round plays");
            let cap = eng.total_money() / 2;
            assert!(eng.small_raise() <= cap.max(250), "seed {seed}");
            assert!(eng.ante() <= cap.max(100), "seed {seed}");
            assert_eq!(money_in_play(&eng), eng.total_money());
        }
    }
}
