//! High-level operations behind the `manifold` commands.
//!
//! Each `ops_*` module loads a [`Project`], resolves it and renders the
//! result. Rendering returns a `String` so the output can be tested without
//! capturing stdout.

pub mod ops_classpath;
pub mod ops_resolve;
pub mod ops_tree;

use std::path::{Path, PathBuf};

use manifold_core::config::{self, GlobalConfig};
use manifold_core::manifest::Manifest;
use manifold_maven::index::IndexChain;
use manifold_maven::repository::LocalRepository;
use manifold_resolver::resolver::{self, Resolution, ResolveOptions};
use manifold_util::errors::ManifoldError;
use manifold_util::fs::{find_manifest, resolve_relative, MANIFEST_FILE};

/// A parsed manifest together with the global configuration it resolves under.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub config: GlobalConfig,
}

impl Project {
    /// Load the manifest at `manifest_path` and the global configuration.
    ///
    /// An unreadable global config is reported and replaced by defaults.
    pub fn load(manifest_path: &Path) -> miette::Result<Self> {
        let manifest = Manifest::from_path(manifest_path)?;
        let config = GlobalConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring global config: {e}");
            GlobalConfig::default()
        });
        Ok(Self {
            manifest_path: manifest_path.to_path_buf(),
            manifest,
            config,
        })
    }

    pub fn with_config(mut self, config: GlobalConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory containing the manifest.
    pub fn root(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The package indices consulted during resolution.
    ///
    /// Manifest repositories come first, then global ones. The local Maven
    /// repository is used only when neither declares any.
    pub fn index(&self) -> IndexChain {
        let mut chain = IndexChain::new();
        for (name, entry) in &self.manifest.repositories {
            chain.push(LocalRepository::from_entry(name, entry, self.root()));
        }
        let home = config::dirs_path();
        for (name, path) in &self.config.repositories {
            chain.push(LocalRepository::new(name, resolve_relative(&home, path)));
        }
        if chain.is_empty() {
            if let Some(local) = LocalRepository::maven_local() {
                tracing::debug!("Using {}", local.root().display());
                chain.push(local);
            }
        }
        chain
    }

    pub fn options(&self) -> ResolveOptions {
        ResolveOptions::with_strategy(self.config.effective_strategy(&self.manifest))
    }

    pub fn resolve(&self) -> miette::Result<Resolution> {
        resolver::resolve_manifest(&self.manifest, &self.index(), &self.options())
    }

    /// `name v1.2.3`, as shown in status lines.
    pub fn display_name(&self) -> String {
        format!(
            "{} v{}",
            self.manifest.package.name, self.manifest.package.version
        )
    }
}

/// Find the manifest to operate on.
///
/// An explicit path may name the manifest itself or its directory; without
/// one, the nearest `Manifold.toml` at or above the working directory is used.
pub fn locate_manifest(explicit: Option<&Path>) -> miette::Result<PathBuf> {
    if let Some(path) = explicit {
        let candidate = if path.is_dir() {
            path.join(MANIFEST_FILE)
        } else {
            path.to_path_buf()
        };
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(ManifoldError::Manifest {
            message: format!("no manifest found at {}", candidate.display()),
        }
        .into());
    }

    let cwd = std::env::current_dir().map_err(ManifoldError::Io)?;
    let found = find_manifest(&cwd).ok_or_else(|| ManifoldError::Manifest {
        message: format!(
            "could not find {MANIFEST_FILE} in {} or any parent directory",
            cwd.display()
        ),
    })?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_directory_resolves_to_its_manifest() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();
        let found = locate_manifest(Some(tmp.path())).unwrap();
        assert_eq!(found, tmp.path().join(MANIFEST_FILE));
    }

    #[test]
    fn explicit_missing_manifest_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = locate_manifest(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
