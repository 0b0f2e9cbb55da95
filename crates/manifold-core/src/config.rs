use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use manifold_util::errors::ManifoldError;

use crate::manifest::{ConflictStrategy, Manifest, ResolutionConfig};

/// Global user configuration loaded from `~/.manifold/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Extra package indices consulted after the manifest's own.
    #[serde(default)]
    pub repositories: BTreeMap<String, String>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ManifoldError::Generic {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            ManifoldError::Generic {
                message: format!("Failed to parse global config {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The conflict strategy in effect: manifest first, then global, then `fail`.
    pub fn effective_strategy(&self, manifest: &Manifest) -> ConflictStrategy {
        manifest
            .conflict_strategy()
            .or(self.resolution.conflict)
            .unwrap_or_default()
    }
}

/// Returns the Manifold data directory.
///
/// `MANIFOLD_HOME` overrides the default `~/.manifold/`.
pub fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var("MANIFOLD_HOME") {
        return PathBuf::from(home);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".manifold")
}
