use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn carbon_manifest() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures/carbon-api/Manifold.toml")
}

fn tree_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("manifold").unwrap();
    cmd.env("MANIFOLD_HOME", home.path())
        .env_remove("RUST_LOG")
        .arg("tree")
        .arg("--manifest-path")
        .arg(carbon_manifest());
    cmd
}

#[test]
fn test_tree_shows_scope_sections() {
    let home = TempDir::new().unwrap();
    tree_cmd(&home)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "net.draycia.carbon:carbonchat-api:3.0.0",
        ))
        .stdout(predicate::str::contains("[api]"))
        .stdout(predicate::str::contains("[compile-only-api]"))
        .stdout(predicate::str::contains("net.kyori:adventure-bom:4.17.0 (platform)"));
}

#[test]
fn test_tree_why() {
    let home = TempDir::new().unwrap();
    tree_cmd(&home)
        .args(["--why", "examination-api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path to examination-api:"))
        .stdout(predicate::str::contains("  net.kyori:adventure-api:4.17.0"));
}

#[test]
fn test_tree_declaration_honors_exclusions() {
    let home = TempDir::new().unwrap();
    tree_cmd(&home)
        .args(["--declaration", "adventure-text-serializer-gson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("adventure-text-serializer-json"))
        .stdout(predicate::str::contains("com.google.code.gson").not());
}

#[test]
fn test_tree_unknown_declaration_fails() {
    let home = TempDir::new().unwrap();
    tree_cmd(&home)
        .args(["--declaration", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_tree_constraints_and_conflicts() {
    let home = TempDir::new().unwrap();
    tree_cmd(&home)
        .arg("--constraints")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "org.apache.logging.log4j:log4j-api:2.22.1 (platform log4j-bom, api)",
        ));

    tree_cmd(&home)
        .arg("--conflicts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No version conflicts."));
}
