use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("cdash")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("saved"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_admin_help_shows_subcommands() {
    cargo_bin_cmd!("cdash")
        .args(["admin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("analytics"))
        .stdout(predicate::str::contains("add-credits"))
        .stdout(predicate::str::contains("toggle-role"))
        .stdout(predicate::str::contains("aggregate-linkedin"));
}

#[test]
fn test_profile_help_shows_password_flag() {
    cargo_bin_cmd!("cdash")
        .args(["profile", "update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--password-stdin"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("cdash")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cdash"));
}

#[test]
fn test_missing_subcommand_fails() {
    cargo_bin_cmd!("cdash").assert().failure();
}
