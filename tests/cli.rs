// ABOUTME: Integration tests for the berth CLI commands.
// ABOUTME: Validates help output, init and direct-mode commands against a fake tool.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use support::FakeTool;

fn berth_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("berth"));
    cmd.env_remove("BERTH_SOCKET").env_remove("BERTH_TOOL");
    cmd
}

#[test]
fn help_shows_commands() {
    berth_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("helper"))
        .stdout(predicate::str::contains("ps"))
        .stdout(predicate::str::contains("logs"))
        .stdout(predicate::str::contains("dns"));
}

#[test]
fn version_flag_prints_version() {
    berth_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("berth.yml");

    berth_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "berth.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("listing_timeout:"), "{content}");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("berth.yml"), "tool: {}\n").unwrap();

    berth_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn direct_ps_lists_containers_as_json() {
    let tool = FakeTool::standard();

    berth_cmd()
        .current_dir(tool.dir.path())
        .env("BERTH_TOOL", &tool.path)
        .args(["--direct", "--json", "ps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc123"))
        .stdout(predicate::str::contains("web1"));
}

#[test]
fn direct_start_resolves_container_by_hostname() {
    let tool = FakeTool::standard();

    berth_cmd()
        .current_dir(tool.dir.path())
        .env("BERTH_TOOL", &tool.path)
        .args(["--direct", "start", "web1"])
        .assert()
        .success();

    assert!(tool.calls().contains(&"start abc123".to_string()));
}

#[test]
fn direct_command_reports_tool_failure() {
    let tool = FakeTool::new("echo 'Error: service exploded' >&2\nexit 1");

    berth_cmd()
        .current_dir(tool.dir.path())
        .env("BERTH_TOOL", &tool.path)
        .args(["--direct", "images"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service exploded"));
}

#[test]
fn ping_without_helper_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    berth_cmd()
        .current_dir(temp_dir.path())
        .arg("--socket")
        .arg(temp_dir.path().join("absent.sock"))
        .arg("ping")
        .assert()
        .failure()
        .stderr(predicate::str::contains("connection lost"));
}
