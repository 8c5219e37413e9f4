//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;

fn haven_chat() -> Command {
    let mut cmd = Command::cargo_bin("haven-chat").expect("binary builds");
    // Keep the real user config out of the tests
    cmd.env("HOME", "/nonexistent");
    cmd.env("XDG_CONFIG_HOME", "/nonexistent");
    cmd.env_remove("OPENAI_API_KEY");
    cmd
}

#[test]
fn help_mentions_voice_messages() {
    haven_chat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("supportive reply"));
}

#[test]
fn version_flag_works() {
    haven_chat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("haven-chat"));
}

#[test]
fn missing_api_key_fails_fast() {
    haven_chat()
        .args(["--message", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn config_get_unknown_key() {
    haven_chat()
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_unknown_key() {
    haven_chat()
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_invalid_advisory_limit() {
    haven_chat()
        .args(["config", "set", "advisory_limit", "not-a-duration"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}
