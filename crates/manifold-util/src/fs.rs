use std::path::{Path, PathBuf};

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "Manifold.toml";

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Locate the `Manifold.toml` governing `start`, searching parent directories.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    find_ancestor_with(start, MANIFEST_FILE).map(|dir| dir.join(MANIFEST_FILE))
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_relative(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}
