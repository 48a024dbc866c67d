use predicates::prelude::*;

use super::TestEnv;

#[test]
fn test_invalid_rc_file() {
    let env = TestEnv::new();
    env.write(".tgswitchrc", "latest\n");
    env.write(".terragrunt-version", "0.38.4\n");

    env.command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid terragrunt version 'latest' from .tgswitchrc"));
}

#[test]
fn test_invalid_pin_file() {
    let env = TestEnv::new();
    env.write(".terragrunt-version", "0.38\n");

    env.command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("from .terragrunt-version"));
}

#[test]
fn test_invalid_env_version() {
    let env = TestEnv::new();

    env.command()
        .env("TG_VERSION", "v1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid terragrunt version 'v1' from TG_VERSION environment variable"));
}

#[test]
fn test_malformed_hcl() {
    let env = TestEnv::new();
    env.write("terragrunt.hcl", "terragrunt_version_constraint = \n");

    env.command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to parse"));
}

#[cfg(unix)]
#[test]
fn test_malformed_hcl_ignored_when_rc_wins() {
    let env = TestEnv::new();
    env.install_fake("0.38.4");
    env.write(".tgswitchrc", "0.38.4");
    env.write("terragrunt.hcl", "terragrunt_version_constraint = \n");

    env.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading required terragrunt version from .tgswitchrc"));
}

#[test]
fn test_malformed_toml() {
    let env = TestEnv::new();
    env.write(".tgswitch.toml", "bin = [\n");

    env.command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to parse"))
        .stderr(predicate::str::contains(".tgswitch.toml"));
}

#[test]
fn test_toml_version_is_validated() {
    let env = TestEnv::new();
    env.write(".tgswitch.toml", "version = \"one\"\n");

    env.command()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Reading configuration from current directory"))
        .stderr(predicate::str::contains("Invalid terragrunt version 'one' from .tgswitch.toml"));
}

#[test]
fn test_env_version_beats_toml_version() {
    let env = TestEnv::new();
    env.write(".tgswitch.toml", "version = \"0.1.0\"\n");

    env.command()
        .env("TG_VERSION", "not-a-version")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("from TG_VERSION environment variable"));
}

#[test]
fn test_toml_in_home_directory() {
    let env = TestEnv::new();
    std::fs::write(env.home().join(".tgswitch.toml"), "version = \"x.y.z\"\n").unwrap();

    env.command()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Reading configuration from home directory"))
        .stderr(predicate::str::contains("'x.y.z'"));
}
