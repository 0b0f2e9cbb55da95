use manifold_core::config::GlobalConfig;
use manifold_core::manifest::{ConflictStrategy, Manifest};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[package]
name = "app"
version = "1.0.0"
"#;

#[test]
fn test_global_config_defaults() {
    let config = GlobalConfig::default();
    assert!(config.repositories.is_empty());
    assert!(config.resolution.conflict.is_none());
}

#[test]
fn test_global_config_parse_from_toml() {
    let config: GlobalConfig = toml::from_str(
        r#"
[resolution]
conflict = "highest"

[repositories]
m2 = "/home/me/.m2/repository"
"#,
    )
    .unwrap();
    assert_eq!(config.resolution.conflict, Some(ConflictStrategy::Highest));
    assert_eq!(config.repositories["m2"], "/home/me/.m2/repository");
}

#[test]
fn test_load_from_missing_file_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
    assert!(config.repositories.is_empty());
}

#[test]
fn test_load_from_malformed_file_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[resolution\nconflict = ").unwrap();
    assert!(GlobalConfig::load_from(&path).is_err());
}

#[test]
fn test_effective_strategy_defaults_to_fail() {
    let manifest = Manifest::parse_toml(MANIFEST).unwrap();
    let config = GlobalConfig::default();
    assert_eq!(config.effective_strategy(&manifest), ConflictStrategy::Fail);
}

#[test]
fn test_manifest_strategy_overrides_global() {
    let manifest = Manifest::parse_toml(&format!("{MANIFEST}\n[resolution]\nconflict = \"nearest\"\n")).unwrap();
    let config: GlobalConfig = toml::from_str("[resolution]\nconflict = \"highest\"").unwrap();
    assert_eq!(config.effective_strategy(&manifest), ConflictStrategy::Nearest);
}

#[test]
fn test_global_strategy_applies_when_manifest_silent() {
    let manifest = Manifest::parse_toml(MANIFEST).unwrap();
    let config: GlobalConfig = toml::from_str("[resolution]\nconflict = \"highest\"").unwrap();
    assert_eq!(config.effective_strategy(&manifest), ConflictStrategy::Highest);
}
