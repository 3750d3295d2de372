//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn mallctl(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mallctl").unwrap();
    cmd.env("HOME", home)
        .env_remove("DATABASE_URL")
        .env_remove("MALLCTL_BIND")
        .env_remove("MALLCTL_SHARE_BASE_URL")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    mallctl(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_serve_help() {
    let home = tempfile::tempdir().unwrap();
    mallctl(home.path())
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep everything in memory"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_migrate_help() {
    let home = tempfile::tempdir().unwrap();
    mallctl(home.path())
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database URL"));
}

// === Config ===

#[test]
fn test_dotenv_sets_log_filter() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".env"), "RUST_LOG=debug\n").unwrap();
    mallctl(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded .env from"))
        .stdout(predicate::str::contains("No config at"));
}

#[test]
fn test_config_path_honors_flag() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("custom.toml");
    mallctl(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    mallctl(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:8080"))
        .stdout(predicate::str::contains("max_connections = 5"));
}

#[test]
fn test_config_show_applies_env() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("mall.toml");
    std::fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();

    mallctl(home.path())
        .env("MALLCTL_SHARE_BASE_URL", "https://cdn.test/share")
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9000"))
        .stdout(predicate::str::contains("https://cdn.test/share"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("mall.toml");

    mallctl(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    mallctl(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

// === Serve ===

#[test]
fn test_serve_without_database_fails() {
    let home = tempfile::tempdir().unwrap();
    mallctl(home.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}
