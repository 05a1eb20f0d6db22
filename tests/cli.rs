use std::fs;
use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn prints_version() {
    let exe = env!("CARGO_BIN_EXE_reels");
    let output = Command::new(exe)
        .arg("--version")
        .output()
        .expect("run reels --version");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "stdout was: {}",
        stdout.trim()
    );
}

#[test]
fn prints_help() {
    AssertCommand::cargo_bin("reels")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reels-TUI"))
        .stdout(predicate::str::contains("--category"))
        .stdout(predicate::str::contains("--list-categories"));
}

#[test]
fn lists_categories_from_catalog_file() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.yaml");
    fs::write(
        &catalog,
        "categories:\n  - name: Nature\n    videos: [a.mp4, b.mp4]\n  - name: Sport\n    videos: [c.mp4]\n",
    )
    .unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        format!("catalog:\n  path: {}\n", catalog.display()),
    )
    .unwrap();

    AssertCommand::cargo_bin("reels")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--list-categories")
        .assert()
        .success()
        .stdout("Nature\t2\nSport\t1\n");
}

#[test]
fn lists_builtin_categories() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "{}\n").unwrap();

    AssertCommand::cargo_bin("reels")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--list-categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nature"));
}

#[test]
fn rejects_duplicate_catalog_categories() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.yaml");
    fs::write(
        &catalog,
        "categories:\n  - name: Nature\n  - name: Nature\n",
    )
    .unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, format!("catalog:\n  path: {}\n", catalog.display())).unwrap();

    AssertCommand::cargo_bin("reels")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--list-categories")
        .assert()
        .failure()
        .stderr(predicate::str::contains("declared more than once"));
}
