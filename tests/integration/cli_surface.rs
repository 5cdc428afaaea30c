use assert_cmd::Command;
use predicates::prelude::*;

fn updraft() -> Command {
    Command::cargo_bin("updraft").unwrap()
}

#[test]
fn help_lists_the_subcommands() {
    updraft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn bare_invocation_shows_usage_and_fails() {
    updraft()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn check_requires_repository_coordinates() {
    updraft()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--owner"));
}

#[test]
fn unknown_channel_is_rejected_at_parse_time() {
    updraft()
        .args([
            "check", "--owner", "acme", "--repo", "app", "--current", "0.1.0", "--asset",
            "app.zip", "--channel", "nightly",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nightly"));
}

#[test]
fn verbose_and_quiet_conflict() {
    updraft()
        .args([
            "--verbose", "--quiet", "check", "--owner", "acme", "--repo", "app", "--current",
            "0.1.0", "--asset", "app.zip",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
