use assert_cmd::Command;
use predicates::prelude::*;

use super::TestEnv;

#[test]
fn test_help() {
    Command::cargo_bin("tgswitch")
        .unwrap()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Switch between Terragrunt versions"))
        .stdout(predicate::str::contains("--chdir"))
        .stdout(predicate::str::contains("--bin"));
}

#[test]
fn test_long_help() {
    Command::cargo_bin("tgswitch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("installs the requested Terragrunt version"))
        .stdout(predicate::str::contains("--chdir"))
        .stdout(predicate::str::contains("--bin"));
}

#[test]
fn test_version_flag() {
    for flag in ["-v", "--version"] {
        Command::cargo_bin("tgswitch")
            .unwrap()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::starts_with(format!("Version: {}", env!("CARGO_PKG_VERSION"))));
    }
}

#[test]
fn test_invalid_version_argument() {
    let env = TestEnv::new();

    env.command()
        .arg("abc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid terragrunt version 'abc' from command line argument"))
        .stderr(predicate::str::contains("Format should be #.#.#"))
        .stderr(predicate::str::contains("Supply the terragrunt version as an argument"));
}

#[test]
fn test_missing_chdir() {
    let env = TestEnv::new();

    Command::cargo_bin("tgswitch")
        .unwrap()
        .env("HOME", env.home())
        .arg("-c")
        .arg(env.home().join("does-not-exist"))
        .arg("0.38.4")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Directory does not exist"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    Command::cargo_bin("tgswitch")
        .unwrap()
        .arg("--nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--nope"));
}
