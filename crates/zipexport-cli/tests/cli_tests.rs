//! Integration tests for zipexport-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

fn zipexport_cmd(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("zipexport");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn archive_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).expect("archive should exist");
    let archive = ZipArchive::new(file).expect("archive should be a valid ZIP");
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

fn write_file(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    zipexport_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zipexport"));
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    zipexport_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("EXPORT.zip"));
}

#[test]
fn test_default_run_in_empty_directory() {
    let temp = TempDir::new().unwrap();

    zipexport_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating EXPORT.zip..."))
        .stdout(predicate::str::contains(
            "Warning: termux not found, skipping...",
        ))
        .stdout(predicate::str::contains(
            "Warning: .gitignore not found, skipping...",
        ))
        .stdout(predicate::str::contains(
            "✓ EXPORT.zip created successfully (0.0 KB)",
        ))
        .stdout(predicate::str::contains("Location: "));

    assert!(temp.path().join("EXPORT.zip").exists());
    assert!(archive_names(&temp.path().join("EXPORT.zip")).is_empty());
}

#[test]
fn test_default_run_exports_project() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "src/engine.js", "engine");
    write_file(root, "src/node_modules/dep/index.js", "dep");
    write_file(root, "data/a.txt", "a");
    write_file(root, "data/tmp.log", "log");
    write_file(root, "README.md", "# readme");
    write_file(root, "CONFIG.json", "{}");

    zipexport_cmd(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding: src/engine.js"))
        .stdout(predicate::str::contains("Adding: data/a.txt"))
        .stdout(predicate::str::contains("Adding file: README.md"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains("tmp.log").not())
        .stdout(predicate::str::contains(
            "Warning: AUDIT.md not found, skipping...",
        ));

    assert_eq!(
        archive_names(&root.join("EXPORT.zip")),
        vec!["README.md", "data/a.txt", "src/engine.js"]
    );
}

#[test]
fn test_include_and_exclude_flags() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "data/a.txt", "a");
    write_file(root, "data/tmp.log", "log");

    zipexport_cmd(root)
        .args(["--include", "data", "--include", "missing_dir"])
        .args(["--exclude", ".log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Warning: missing_dir not found, skipping...",
        ))
        .stdout(predicate::str::contains("Warning:").count(1));

    assert_eq!(archive_names(&root.join("EXPORT.zip")), vec!["data/a.txt"]);
}

#[test]
fn test_empty_exclude_pattern_excludes_everything() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "data/a.txt", "a");

    zipexport_cmd(root)
        .args(["-i", "data", "-x", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding").not());

    assert!(archive_names(&root.join("EXPORT.zip")).is_empty());
}

#[test]
fn test_custom_output_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "README.md", "# readme");

    zipexport_cmd(root)
        .args(["-i", "README.md", "-o", "bundle.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ bundle.zip created successfully",
        ));

    assert!(root.join("bundle.zip").exists());
    assert!(!root.join("EXPORT.zip").exists());
}

#[test]
fn test_second_run_overwrites_archive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "data/first.txt", "1");

    zipexport_cmd(root).args(["-i", "data"]).assert().success();
    assert_eq!(archive_names(&root.join("EXPORT.zip")), vec!["data/first.txt"]);

    fs::remove_file(root.join("data/first.txt")).unwrap();
    write_file(root, "data/second.txt", "2");

    zipexport_cmd(root).args(["-i", "data"]).assert().success();
    assert_eq!(
        archive_names(&root.join("EXPORT.zip")),
        vec!["data/second.txt"]
    );
}

#[test]
fn test_quiet_suppresses_output() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "data/a.txt", "a");

    zipexport_cmd(temp.path())
        .args(["--quiet", "-i", "data", "-i", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(temp.path().join("EXPORT.zip").exists());
}

#[test]
fn test_verbose_lists_excluded_paths() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "data/a.txt", "a");
    write_file(temp.path(), "data/tmp.log", "log");

    zipexport_cmd(temp.path())
        .args(["--verbose", "-i", "data", "-x", ".log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Excluded: data/tmp.log (matches '.log')",
        ))
        .stdout(predicate::str::contains("Files added: 1"));
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "data/a.txt", "a");
    write_file(temp.path(), "data/tmp.log", "log");

    let output = zipexport_cmd(temp.path())
        .args(["--json", "-i", "data", "-i", "termux", "-x", ".log"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be a single JSON document");
    assert_eq!(json["operation"], "export");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["files_added"], 1);
    assert_eq!(json["data"]["excluded"], 1);
    assert_eq!(json["data"]["missing"][0], "termux");
    assert!(
        json["data"]["output_path"]
            .as_str()
            .unwrap()
            .ends_with("EXPORT.zip")
    );
}

#[test]
fn test_config_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "lib/keep.rs", "fn main() {}");
    write_file(root, "lib/drop.bak", "old");
    write_file(
        root,
        "export.json",
        r#"{"include": ["lib"], "exclude": [".bak"], "output": "lib.zip"}"#,
    );

    zipexport_cmd(root)
        .args(["--config", "export.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating lib.zip..."));

    assert_eq!(archive_names(&root.join("lib.zip")), vec!["lib/keep.rs"]);
}

#[test]
fn test_invalid_config_file_fails_with_hint() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "export.json", r#"{"exclusions": []}"#);

    zipexport_cmd(temp.path())
        .args(["--config", "export.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!temp.path().join("EXPORT.zip").exists());
}

#[test]
fn test_invalid_level_rejected() {
    let temp = TempDir::new().unwrap();

    zipexport_cmd(temp.path())
        .args(["--level", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--level"));
}

#[test]
fn test_output_directory_rejected() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("dist")).unwrap();

    zipexport_cmd(temp.path())
        .args(["--output", "dist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot write archive"));
}
