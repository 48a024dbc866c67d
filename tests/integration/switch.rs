#![cfg(unix)]

use predicates::prelude::*;
use std::fs;

use super::TestEnv;

#[test]
fn test_switch_to_installed_pinned_version() {
    let env = TestEnv::new();
    let binary = env.install_fake("0.38.4");
    env.write(".terragrunt-version", "0.38.4\n");

    env.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading required terragrunt version from .terragrunt-version"))
        .stdout(predicate::str::contains("Switched terragrunt to version"))
        .stdout(predicate::str::contains("0.38.4"));

    assert_eq!(fs::read_link(env.bin_path()).unwrap(), binary);
    let recent = fs::read_to_string(env.install_dir().join("RECENT")).unwrap();
    assert_eq!(recent.lines().collect::<Vec<_>>(), ["0.38.4"]);
}

#[test]
fn test_switch_replaces_existing_symlink() {
    let env = TestEnv::new();
    env.install_fake("0.37.0");
    let newer = env.install_fake("0.38.4");

    env.command().env("TG_VERSION", "0.37.0").assert().success();
    env.command().env("TG_VERSION", "0.38.4").assert().success();

    assert_eq!(fs::read_link(env.bin_path()).unwrap(), newer);
    let recent = fs::read_to_string(env.install_dir().join("RECENT")).unwrap();
    assert_eq!(recent.lines().collect::<Vec<_>>(), ["0.38.4", "0.37.0"]);
}

#[test]
fn test_toml_bin_used_without_explicit_bin() {
    let env = TestEnv::new();
    let binary = env.install_fake("0.38.4");
    let toml_bin = env.home().join("tools").join("terragrunt");
    env.write(
        ".tgswitch.toml",
        &format!("bin = \"{}\"\nversion = \"0.38.4\"\n", toml_bin.display()),
    );

    // No -b: the command-line bin stays at its default, so the TOML bin wins
    assert_cmd::Command::cargo_bin("tgswitch")
        .unwrap()
        .env("HOME", env.home())
        .env("NO_COLOR", "1")
        .env("TGSWITCH_NO_PROGRESS", "1")
        .env_remove("TG_VERSION")
        .env_remove("TGS_PREFER_LOCAL")
        .arg("-c")
        .arg(env.work())
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading required terragrunt version from .tgswitch.toml"));

    assert_eq!(fs::read_link(&toml_bin).unwrap(), binary);
}

#[test]
fn test_explicit_bin_beats_toml_bin() {
    let env = TestEnv::new();
    env.install_fake("0.38.4");
    let toml_bin = env.home().join("tools").join("terragrunt");
    env.write(
        ".tgswitch.toml",
        &format!("bin = \"{}\"\nversion = \"0.38.4\"\n", toml_bin.display()),
    );

    env.command().assert().success();

    assert!(fs::symlink_metadata(env.bin_path()).is_ok());
    assert!(fs::symlink_metadata(&toml_bin).is_err());
}

#[test]
fn test_quiet_suppresses_progress_lines() {
    let env = TestEnv::new();
    env.install_fake("0.38.4");
    env.write(".tgswitchrc", "0.38.4");

    env.command().arg("-q").assert().success().stdout(predicate::str::is_empty());
}
