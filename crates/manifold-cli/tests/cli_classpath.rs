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

fn classpath_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("manifold").unwrap();
    cmd.env("MANIFOLD_HOME", home.path())
        .env_remove("RUST_LOG")
        .arg("classpath")
        .arg("--manifest-path")
        .arg(carbon_manifest());
    cmd
}

#[test]
fn test_compile_classpath_lists_jars() {
    let home = TempDir::new().unwrap();
    classpath_cmd(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("adventure-api-4.17.0.jar"))
        .stdout(predicate::str::contains("gson-2.10.1.jar"))
        .stdout(predicate::str::contains("adventure-bom").not());
}

#[test]
fn test_runtime_classpath_is_empty() {
    let home = TempDir::new().unwrap();
    classpath_cmd(&home)
        .arg("--runtime")
        .assert()
        .success()
        .stdout(predicate::str::diff("\n"));
}

#[test]
fn test_exported_json_includes_constraints() {
    let home = TempDir::new().unwrap();
    classpath_cmd(&home)
        .args(["--exported", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"constraints\""))
        .stdout(predicate::str::contains("\"platform\": \"log4j-bom\""));
}

#[test]
fn test_runtime_and_exported_conflict() {
    let home = TempDir::new().unwrap();
    classpath_cmd(&home)
        .args(["--runtime", "--exported"])
        .assert()
        .failure();
}
