mod helpers;

use helpers::{cardroom, EnvGuard};
use serial_test::serial;

#[test]
#[serial]
fn help_lists_every_subcommand() {
    let res = cardroom(&["--help"]);
    assert_eq!(res.code, 0);
    for cmd in ["sim", "eval", "deal", "cfg"] {
        assert!(res.stdout.contains(cmd), "help should list `{}`", cmd);
    }
}

#[test]
#[serial]
fn unknown_subcommand_prints_usage() {
    let res = cardroom(&["serve"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Usage: cardroom <command>"));
    assert!(res.stdout.is_empty());
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    let _env = EnvGuard::clean(&[]);
    let res = cardroom(&["cfg"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["variant"]["value"], "texas_holdem");
    assert_eq!(json["starting_money"]["value"].as_u64(), Some(5000));
    assert_eq!(json["ante"]["value"].as_u64(), Some(100));
    assert_eq!(json["small_raise"]["value"].as_u64(), Some(250));
    assert_eq!(json["raise_limit"]["value"].as_u64(), Some(3));
    assert_eq!(json["auto_increase_on_hand_divider"]["value"].as_u64(), Some(7));
    assert_eq!(json["decision_timeout_ms"]["value"].as_u64(), Some(30_000));
    assert!(json["seed"]["value"].is_null());
    for field in ["variant", "ante", "seed", "max_players", "tournament"] {
        assert_eq!(json[field]["source"], "default", "{}", field);
    }
}

#[test]
#[serial]
fn cfg_layers_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.toml");
    std::fs::write(
        &path,
        "variant = \"five_card_draw\"\nstarting_money = 2000\nseed = 456\nmax_players = 4\n",
    )
    .unwrap();
    let path = path.to_string_lossy().to_string();
    let _env = EnvGuard::clean(&[
        ("CARDROOM_CONFIG", path.as_str()),
        ("CARDROOM_SEED", "123"),
        ("CARDROOM_TOURNAMENT", "on"),
    ]);

    let res = cardroom(&["cfg"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["variant"]["value"], "five_card_draw");
    assert_eq!(json["variant"]["source"], "file");
    assert_eq!(json["starting_money"]["value"].as_u64(), Some(2000));
    assert_eq!(json["max_players"]["value"].as_u64(), Some(4));
    assert_eq!(json["seed"]["value"].as_u64(), Some(123));
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["tournament"]["value"], true);
    assert_eq!(json["tournament"]["source"], "env");
    assert_eq!(json["ante"]["source"], "default");
}

#[test]
#[serial]
fn cfg_rejects_invalid_values() {
    let _env = EnvGuard::clean(&[("CARDROOM_SMALL_RAISE", "0")]);
    let res = cardroom(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid configuration"));
    assert!(res.stderr.contains("small_raise"));
    assert!(res.stdout.is_empty());
}

#[test]
#[serial]
fn eval_describes_and_compares() {
    let res = cardroom(&["eval", "As Ad Ah Ks Kd", "--against", "2c 2d 2h 2s 3c"]);
    assert_eq!(res.code, 0);
    let lines: Vec<&str> = res.stdout.lines().collect();
    assert_eq!(lines[0], "As Ad Ah Ks Kd => Full House, Aces over Kings");
    assert_eq!(lines[1], "2c 2d 2h 2s 3c => Four of a Kind, Twos");
    assert_eq!(lines[2], "Winner: second");
}

#[test]
#[serial]
fn eval_reports_bad_cards() {
    let res = cardroom(&["eval", "Ah Xx"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.starts_with("Error: Invalid input"));
}

#[test]
#[serial]
fn deal_is_reproducible_from_a_seed() {
    let a = cardroom(&["deal", "--players", "4", "--variant", "omaha", "--seed", "2024"]);
    let b = cardroom(&["deal", "--players", "4", "--variant", "omaha", "--seed", "2024"]);
    assert_eq!(a.code, 0);
    assert_eq!(a.stdout, b.stdout);
    let seat0 = a.stdout.lines().find(|l| l.starts_with("Seat 0: ")).unwrap();
    let cards = seat0["Seat 0: ".len()..].split(" (").next().unwrap();
    assert_eq!(cards.split_whitespace().count(), 4);
}

#[test]
#[serial]
fn deal_rejects_oversized_tables() {
    let res = cardroom(&["deal", "--players", "8", "--variant", "stud", "--seed", "1"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid player count: 8 (max 7)"));
}
