//! On-disk Maven-layout repositories (e.g. `~/.m2/repository` or a vendored tree).

use std::fs;
use std::path::{Path, PathBuf};

use manifold_core::manifest::RepositoryEntry;
use manifold_util::errors::ManifoldError;

use crate::index::PackageIndex;
use crate::pom::{self, Pom};

/// A Maven repository rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    pub name: String,
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(name: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            root: root.into(),
        }
    }

    /// Build a repository from a manifest entry; relative paths are resolved
    /// against `base_dir` (the manifest's directory).
    pub fn from_entry(name: &str, entry: &RepositoryEntry, base_dir: &Path) -> Self {
        Self::new(
            name,
            manifold_util::fs::resolve_relative(base_dir, entry.path()),
        )
    }

    /// The user's local Maven repository (`~/.m2/repository`).
    pub fn maven_local() -> Option<Self> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;
        let root = Path::new(&home).join(".m2").join("repository");
        root.is_dir().then(|| Self::new("maven-local", root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `net.kyori:adventure-api:4.17.0` becomes `net/kyori/adventure-api/4.17.0`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> PathBuf {
        let mut path: PathBuf = group.split('.').collect();
        path.push(artifact);
        path.push(version);
        path
    }

    pub fn pom_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.root
            .join(Self::coordinate_path(group, artifact, version))
            .join(format!("{artifact}-{version}.pom"))
    }

    pub fn jar_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.root
            .join(Self::coordinate_path(group, artifact, version))
            .join(format!("{artifact}-{version}.jar"))
    }
}

impl PackageIndex for LocalRepository {
    fn module(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        let path = self.pom_path(group, artifact, version);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(ManifoldError::Io)?;
        let pom = pom::parse_pom(&content).map_err(|e| ManifoldError::Index {
            message: format!("{}: {e}", path.display()),
        })?;
        Ok(Some(pom))
    }

    fn artifact_path(&self, group: &str, artifact: &str, version: &str) -> Option<PathBuf> {
        let path = self.jar_path(group, artifact, version);
        path.is_file().then_some(path)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name, self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pom(repo: &LocalRepository, group: &str, artifact: &str, version: &str, xml: &str) {
        let path = repo.pom_path(group, artifact, version);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, xml).unwrap();
    }

    #[test]
    fn coordinate_path_splits_group() {
        let path = LocalRepository::coordinate_path("net.kyori", "adventure-api", "4.17.0");
        assert_eq!(path, Path::new("net/kyori/adventure-api/4.17.0"));
    }

    #[test]
    fn pom_and_jar_paths() {
        let repo = LocalRepository::new("test", "/repo");
        assert_eq!(
            repo.pom_path("com.google.code.gson", "gson", "2.10.1"),
            Path::new("/repo/com/google/code/gson/gson/2.10.1/gson-2.10.1.pom")
        );
        assert!(repo
            .jar_path("com.google.code.gson", "gson", "2.10.1")
            .ends_with("gson-2.10.1.jar"));
    }

    #[test]
    fn from_entry_resolves_relative_path() {
        let entry = RepositoryEntry::Path("vendor/maven".to_string());
        let repo = LocalRepository::from_entry("vendor", &entry, Path::new("/project"));
        assert_eq!(repo.root(), Path::new("/project/vendor/maven"));
        assert_eq!(repo.describe(), "vendor (/project/vendor/maven)");
    }

    #[test]
    fn module_reads_pom_from_layout() {
        let tmp = TempDir::new().unwrap();
        let repo = LocalRepository::new("tmp", tmp.path());
        write_pom(
            &repo,
            "org.checkerframework",
            "checker-qual",
            "3.42.0",
            "<project><groupId>org.checkerframework</groupId><artifactId>checker-qual</artifactId><version>3.42.0</version></project>",
        );
        let pom = repo
            .module("org.checkerframework", "checker-qual", "3.42.0")
            .unwrap()
            .unwrap();
        assert_eq!(pom.artifact_id.as_deref(), Some("checker-qual"));
        assert!(repo
            .module("org.checkerframework", "checker-qual", "3.41.0")
            .unwrap()
            .is_none());
    }

    #[test]
    fn module_with_malformed_pom_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let repo = LocalRepository::new("tmp", tmp.path());
        write_pom(&repo, "g", "a", "1", "<project><artifactId>a</version>");
        let err = repo.module("g", "a", "1").unwrap_err();
        assert!(err.to_string().contains("a-1.pom"), "got: {err}");
    }

    #[test]
    fn artifact_path_requires_existing_jar() {
        let tmp = TempDir::new().unwrap();
        let repo = LocalRepository::new("tmp", tmp.path());
        assert!(repo.artifact_path("g", "a", "1").is_none());
        let jar = repo.jar_path("g", "a", "1");
        fs::create_dir_all(jar.parent().unwrap()).unwrap();
        fs::write(&jar, b"").unwrap();
        assert_eq!(repo.artifact_path("g", "a", "1"), Some(jar));
    }
}
