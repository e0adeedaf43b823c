//! Integration tests for the corten binary

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn corten_cmd(project: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("corten");
    cmd.arg("--project-dir").arg(project);
    cmd
}

/// Minimal project carrying only the manager plugin in its manifest
fn fixture_project() -> Option<TempDir> {
    let Ok(dir) = TempDir::new() else {
        return None;
    };
    let vendor = dir.path().join("vendor");
    let Ok(()) = std::fs::create_dir_all(&vendor) else {
        return None;
    };

    let manifest = r#"{"packages": [
        {"name": "corten/manager-bundle", "extra": {"corten-plugin": "corten::manager"}}
    ]}"#;
    let Ok(()) = std::fs::write(vendor.join("installed.json"), manifest) else {
        return None;
    };

    Some(dir)
}

#[test]
fn test_version() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("corten"));

    corten_cmd(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("corten"));
}

#[test]
fn test_help() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Management commands for a Corten installation"));
}

#[test]
fn test_invalid_command() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path()).arg("invalid").assert().failure();
}

#[test]
fn test_unknown_environment_is_rejected() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["--env", "staging", "debug", "bundles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown environment"));
}

#[test]
fn test_dotenv_round_trip() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path()).args(["dotenv", "set", "FOO", "BAR"]).assert().success();

    let content = std::fs::read_to_string(dir.path().join(".env"));
    assert!(content.is_ok_and(|env| env == "FOO='BAR'\n"));

    corten_cmd(dir.path())
        .args(["dotenv", "get", "FOO"])
        .assert()
        .success()
        .stdout(predicate::str::diff("BAR\n"));

    corten_cmd(dir.path()).args(["dotenv", "remove", "FOO"]).assert().success();
    assert!(!dir.path().join(".env").exists());

    // a missing key is an empty success
    corten_cmd(dir.path())
        .args(["dotenv", "get", "FOO"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_dotenv_get_prefers_the_local_file() {
    let Some(dir) = fixture_project() else {
        return;
    };
    assert!(std::fs::write(dir.path().join(".env"), "A='base'\n").is_ok());
    assert!(std::fs::write(dir.path().join(".env.local"), "A='local'\n").is_ok());

    corten_cmd(dir.path())
        .args(["dotenv", "get", "A"])
        .assert()
        .success()
        .stdout(predicate::str::diff("local\n"));
}

#[test]
fn test_maintenance_toggle() {
    let Some(dir) = fixture_project() else {
        return;
    };
    let page = dir.path().join("var").join("maintenance.html");

    corten_cmd(dir.path())
        .args(["maintenance", "enable", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enabled\":true"));
    assert!(page.is_file());

    corten_cmd(dir.path())
        .args(["maintenance", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enabled\":true"));

    corten_cmd(dir.path()).args(["maintenance", "disable"]).assert().success();
    assert!(!page.exists());

    corten_cmd(dir.path())
        .args(["maintenance", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enabled\":false"));
}

#[test]
fn test_config_set_and_get() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["config", "set", "license", "abc123"])
        .assert()
        .success();

    corten_cmd(dir.path())
        .args(["config", "get", "license"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc123"));

    corten_cmd(dir.path())
        .args(["config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("license"));
}

#[test]
fn test_jwt_cookie_generate_and_parse() {
    let Some(dir) = fixture_project() else {
        return;
    };

    let assert = corten_cmd(dir.path())
        .args(["jwt-cookie", "generate", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("corten_debug="))
        .stdout(predicate::str::contains("HttpOnly"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let Some(rest) = stdout.trim_end().strip_prefix("corten_debug=") else {
        return;
    };
    let Some((token, _)) = rest.split_once(';') else {
        return;
    };

    corten_cmd(dir.path())
        .args(["jwt-cookie", "parse", token])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"debug\": true"))
        .stdout(predicate::str::contains("\"exp\""));

    corten_cmd(dir.path())
        .args(["jwt-cookie", "parse", "tampered.token.value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid token"));
}

#[test]
fn test_install_web_dir() {
    let Some(dir) = fixture_project() else {
        return;
    };
    let web_dir = dir.path().join("public");

    corten_cmd(dir.path()).arg("install-web-dir").assert().success();
    assert!(web_dir.join("index.html").is_file());
    assert!(web_dir.join("robots.txt").is_file());
    assert!(web_dir.join("preview.html").is_file());

    corten_cmd(dir.path())
        .args(["install-web-dir", "--no-dev"])
        .assert()
        .success();
    assert!(!web_dir.join("preview.html").exists());
}

#[test]
fn test_debug_plugins_lists_the_manager() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["debug", "plugins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corten/manager-bundle"))
        .stdout(predicate::str::contains("corten::manager"));

    corten_cmd(dir.path())
        .args(["debug", "plugins", "corten/manager-bundle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corten/framework-bundle"));

    corten_cmd(dir.path())
        .args(["debug", "plugins", "acme/ghost"])
        .assert()
        .failure();
}

#[test]
fn test_debug_bundles_respects_the_environment() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["--env", "dev", "debug", "bundles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corten/framework-bundle"))
        .stdout(predicate::str::contains("corten/profiler-bundle"));

    corten_cmd(dir.path())
        .args(["--env", "prod", "debug", "bundles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corten/profiler-bundle").not());
}

#[test]
fn test_debug_access_key_round_trip() {
    let Some(dir) = fixture_project() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["debug", "access-key", "admin:s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("APP_DEV_ACCESSKEY"));

    let content = std::fs::read_to_string(dir.path().join(".env"));
    assert!(content.is_ok_and(|env| env == "APP_DEV_ACCESSKEY='admin:s3cret'\n"));

    // no value removes the key, and the file with it
    corten_cmd(dir.path()).args(["debug", "access-key"]).assert().success();
    assert!(!dir.path().join(".env").exists());
}

#[test]
fn test_debug_plugins_without_a_manifest_fails() {
    let Ok(dir) = TempDir::new() else {
        return;
    };

    corten_cmd(dir.path())
        .args(["debug", "plugins"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be read"));
}

#[test]
fn test_cache_clear() {
    let Some(dir) = fixture_project() else {
        return;
    };

    // a prod resolution writes the cache artifact
    corten_cmd(dir.path()).args(["cache", "clear"]).assert().success();

    let cache_dir = dir.path().join("var").join("cache").join("prod");
    assert!(std::fs::create_dir_all(&cache_dir).is_ok());
    assert!(std::fs::write(cache_dir.join("bundles.map"), "[]").is_ok());

    corten_cmd(dir.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));
    assert!(!cache_dir.join("bundles.map").exists());
}
