mod helpers;

use cardroom_cli::logging::TestLogSubscriber;
use helpers::{cardroom, EnvGuard};
use serial_test::serial;

fn standings(stdout: &str) -> Vec<(String, u64)> {
    stdout
        .lines()
        .filter_map(|l| l.strip_prefix("  "))
        .filter_map(|l| l.split_once(": "))
        .map(|(name, money)| (name.to_string(), money.parse().unwrap()))
        .collect()
}

#[test]
#[serial]
fn sim_uses_the_configured_table() {
    let _env = EnvGuard::clean(&[
        ("CARDROOM_VARIANT", "omaha"),
        ("CARDROOM_STARTING_MONEY", "800"),
        ("CARDROOM_SEED", "31"),
    ]);
    let res = cardroom(&["sim", "--players", "3", "--rounds", "4"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.starts_with("Variant: Omaha | Players: 3 | Seed: 31"));
    let table = standings(&res.stdout);
    assert_eq!(table.iter().map(|(_, m)| m).sum::<u64>(), 2400);
    assert!(table.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
#[serial]
fn flags_override_config() {
    let _env = EnvGuard::clean(&[("CARDROOM_VARIANT", "omaha"), ("CARDROOM_SEED", "31")]);
    let res = cardroom(&[
        "sim", "--players", "2", "--rounds", "1", "--variant", "draw", "--seed", "8",
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.starts_with("Variant: Five-Card Draw | Players: 2 | Seed: 8"));
    assert!(res.stdout.contains("Round 1: pot "));
}

#[test]
#[serial]
fn heads_up_sim_runs_until_one_bot_is_left() {
    let _env = EnvGuard::clean(&[("CARDROOM_STARTING_MONEY", "300"), ("CARDROOM_ANTE", "100")]);
    let res = cardroom(&["sim", "--players", "2", "--rounds", "500", "--seed", "77"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let winner = res
        .stdout
        .lines()
        .find_map(|l| l.strip_prefix("Winner: "))
        .unwrap();
    assert!(winner == "bot1" || winner == "bot2", "winner line: {}", winner);
    assert_eq!(standings(&res.stdout), vec![(winner.to_string(), 600)]);
}

#[test]
#[serial]
fn sim_logs_round_lifecycle() {
    let _env = EnvGuard::clean(&[]);
    let logs = TestLogSubscriber::new();
    let res = logs.capture(|| cardroom(&["sim", "--players", "3", "--rounds", "2", "--seed", "5"]));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let started = logs.with_message("simulation started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].field("seed"), Some("5"));

    let rounds = logs.with_message("round started");
    assert!(!rounds.is_empty());
    assert_eq!(rounds[0].field("round"), Some("1"));
    assert!(rounds.iter().all(|e| e.target.starts_with("cardroom_engine")));
    assert!(!logs.with_message("pot awarded").is_empty());
}

#[test]
#[serial]
fn zero_rounds_is_rejected() {
    let _env = EnvGuard::clean(&[]);
    let res = cardroom(&["sim", "--rounds", "0"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("rounds must be >= 1"));
}
