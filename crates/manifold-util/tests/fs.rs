use manifold_util::fs::{find_ancestor_with, find_manifest, resolve_relative, MANIFEST_FILE};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_find_ancestor_with_direct() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();
    let result = find_ancestor_with(tmp.path(), MANIFEST_FILE);
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_manifest_from_nested_directory() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();
    let nested = tmp.path().join("src").join("main").join("java");
    std::fs::create_dir_all(&nested).unwrap();
    let result = find_manifest(&nested);
    assert_eq!(result, Some(tmp.path().join(MANIFEST_FILE)));
}

#[test]
fn test_find_ancestor_with_not_found() {
    let tmp = TempDir::new().unwrap();
    let result = find_ancestor_with(tmp.path(), "NonExistent.file");
    assert_eq!(result, None);
}

#[test]
fn test_resolve_relative_joins_relative_paths() {
    let resolved = resolve_relative(Path::new("/project"), "vendor/maven");
    assert_eq!(resolved, Path::new("/project/vendor/maven"));
}

#[test]
fn test_resolve_relative_keeps_absolute_paths() {
    let tmp = TempDir::new().unwrap();
    let abs = tmp.path().to_string_lossy().to_string();
    let resolved = resolve_relative(Path::new("/project"), &abs);
    assert_eq!(resolved, tmp.path());
}
