use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cardcount() -> Command {
    Command::cargo_bin("cardcount").expect("binary built")
}

#[test]
fn play_reads_gestures_from_stdin() {
    cardcount()
        .arg("play")
        .write_stdin("+5h\n-5h\n+As\n+As\n+As\n*As\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("> recorded 5♥ (+2)"))
        .stdout(predicate::str::contains("> undid 5♥ (0 left)"))
        .stdout(predicate::str::contains("> cleared 3 mark(s) of A♠"))
        .stdout(predicate::str::contains(
            "Session over: 6 gestures, 0 errors, final count -3 over 3 entries",
        ));
}

#[test]
fn play_is_the_default_command() {
    cardcount()
        .write_stdin("+2c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: +1 (1 card, high)"));
}

#[test]
fn json_format_emits_status_lines() {
    let output = cardcount()
        .args(["play", "--format", "json", "--system", "hi_lo"])
        .write_stdin("+5h\n+Kd\n+Kd\n")
        .output()
        .expect("runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let last = stdout.lines().last().expect("status lines");
    let value: serde_json::Value = serde_json::from_str(last).expect("json");
    assert_eq!(value["total"], -1);
    assert_eq!(value["entries"], 3);
    assert_eq!(value["advice"], "bet_low");
}

#[test]
fn script_and_config_file_drive_truncation() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("cardcount.yaml");
    fs::write(
        &config_path,
        "ledger:\n  capacity: 2\n  overflow: truncate\ndisplay:\n  recent: 2\n",
    )
    .expect("write config");
    let script_path = dir.path().join("shoe.txt");
    fs::write(&script_path, "# opening hand\n+Ah\n+4h\n+4c\n").expect("write script");

    cardcount()
        .arg("--config")
        .arg(&config_path)
        .arg("play")
        .arg("--script")
        .arg(&script_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("> recorded 4♣ (+2); dropped 1 oldest"))
        .stdout(predicate::str::contains("Total: +4 (2 cards, high)"));
}

#[test]
fn bad_gesture_lines_do_not_abort() {
    cardcount()
        .write_stdin("+9z\n+9s\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: bad card '9z'"))
        .stdout(predicate::str::contains("1 error, final count 0 over 1 entries"));
}

#[test]
fn drill_is_deterministic_per_seed() {
    let run = || {
        cardcount()
            .args(["drill", "--seed", "77", "--cards", "10"])
            .output()
            .expect("runs")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8(first.stdout).expect("utf8");
    assert!(stdout.starts_with("Drill seed 77: 1 deck, weighted count."));
    assert!(stdout.contains("Dealt 10 cards"));
}

#[test]
fn drill_rejects_out_of_range_decks() {
    for decks in ["0", "9", "100", "18446744073709551615"] {
        cardcount()
            .args(["drill", "--seed", "1", "--decks", decks])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("--decks"))
            .stderr(predicate::str::contains("panicked").not());
    }
}

#[test]
fn drill_accepts_largest_shoe() {
    cardcount()
        .args(["drill", "--seed", "1", "--decks", "8", "--cards", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drill seed 1: 8 decks,"))
        .stdout(predicate::str::contains("415 left in shoe"));
}

#[test]
fn check_config_rejects_invalid_file() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("bad.yaml");
    fs::write(&config_path, "display:\n  recent: 0\n").expect("write config");

    cardcount()
        .args(["check-config", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("display.recent"));
}

#[test]
fn check_config_reports_defaults() {
    cardcount()
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configuration OK: weighted count, reject at 200 entries, recent window 10",
        ));
}

#[test]
fn check_config_reports_policy_default_capacity() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("truncate.yaml");
    fs::write(&config_path, "ledger:\n  overflow: truncate\n").expect("write config");

    cardcount()
        .args(["check-config", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("truncate at 330 entries"));
}

#[test]
fn structured_logging_writes_session_file() {
    let dir = tempdir().expect("temp dir");
    let log_dir = dir.path().join("logs");
    let config_path = dir.path().join("logging.yaml");
    fs::write(
        &config_path,
        format!(
            "logging:\n  enable_structured: true\n  tracing_level: debug\n  log_dir: \"{}\"\n",
            log_dir.display()
        ),
    )
    .expect("write config");

    cardcount()
        .arg("--config")
        .arg(&config_path)
        .write_stdin("+3d\n")
        .env_remove("RUST_LOG")
        .assert()
        .success();

    let log = fs::read_to_string(log_dir.join("session.jsonl")).expect("log file");
    assert!(log.contains("session started"));
    assert!(log.contains("recorded"));
}
