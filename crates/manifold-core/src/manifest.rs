use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use manifold_util::errors::ManifoldError;

use crate::dependency::{
    self, Coordinate, DeclarationKind, Dependency, DependencyDeclaration, Exclusion, Scope,
};
use crate::version_catalog::{self, ResolvedCatalogEntry};

/// The parsed representation of a `Manifold.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub package: PackageMetadata,

    #[serde(default)]
    pub plugins: BTreeMap<String, PluginRef>,

    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryEntry>,

    #[serde(default)]
    pub catalog: Option<CatalogConfig>,

    #[serde(default)]
    pub api: BTreeMap<String, Dependency>,

    #[serde(default)]
    pub implementation: BTreeMap<String, Dependency>,

    #[serde(default, rename = "compile-only-api")]
    pub compile_only_api: BTreeMap<String, Dependency>,

    #[serde(default, rename = "compile-only")]
    pub compile_only: BTreeMap<String, Dependency>,

    #[serde(default, rename = "runtime-only")]
    pub runtime_only: BTreeMap<String, Dependency>,

    #[serde(default)]
    pub resolution: Option<ResolutionConfig>,
}

/// Package identity and metadata from the `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// A build plugin reference, either a simple ID string or a detailed specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginRef {
    Id(String),
    Detailed { id: String, version: Option<String> },
}

impl PluginRef {
    pub fn id(&self) -> &str {
        match self {
            PluginRef::Id(id) => id,
            PluginRef::Detailed { id, .. } => id,
        }
    }
}

/// A package index location: a path string or a detailed table.
///
/// Relative paths are resolved against the manifest's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositoryEntry {
    Path(String),
    Detailed { path: String },
}

impl RepositoryEntry {
    pub fn path(&self) -> &str {
        match self {
            RepositoryEntry::Path(p) => p,
            RepositoryEntry::Detailed { path } => path,
        }
    }
}

/// Version catalog configuration from `[catalog]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    #[serde(default)]
    pub libraries: BTreeMap<String, CatalogLibrary>,
    #[serde(default)]
    pub bundles: BTreeMap<String, Vec<String>>,
}

/// A library entry in the version catalog.
///
/// Identity is given either as `module = "group:artifact"` or as separate
/// `group` and `artifact` keys. The version is optional so that platforms
/// can supply it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogLibrary {
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub artifact: Option<String>,
    #[serde(default, rename = "version.ref")]
    pub version_ref: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// How disagreeing version requests are settled when no platform pins them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Abort resolution with a version conflict error.
    #[default]
    Fail,
    /// The request closest to the root wins (first in breadth-first order).
    Nearest,
    /// The highest requested version wins.
    Highest,
}

/// Resolution settings from `[resolution]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub conflict: Option<ConflictStrategy>,
}

impl Manifest {
    /// Load and parse a `Manifold.toml` file from the given path.
    ///
    /// Before parsing, `${env:VAR}` references in the manifest content are
    /// resolved using `.manifold.env` (if present alongside `Manifold.toml`)
    /// and process environment variables.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifoldError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars =
            crate::properties::load_env_file(&dir.join(".manifold.env")).unwrap_or_default();
        let resolved = crate::properties::interpolate(&content, &env_vars);

        Self::parse_toml(&resolved)
    }

    /// Parse a `Manifold.toml` from a string (no interpolation).
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            ManifoldError::Manifest {
                message: format!("Failed to parse Manifold.toml: {e}"),
            }
            .into()
        })
    }

    /// The declarations of one scope section.
    pub fn section(&self, scope: Scope) -> &BTreeMap<String, Dependency> {
        match scope {
            Scope::Api => &self.api,
            Scope::Implementation => &self.implementation,
            Scope::CompileOnlyApi => &self.compile_only_api,
            Scope::CompileOnly => &self.compile_only,
            Scope::RuntimeOnly => &self.runtime_only,
        }
    }

    /// The project's own coordinate; the group defaults to empty.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.package.group.clone().unwrap_or_default(),
            self.package.name.clone(),
        )
    }

    pub fn conflict_strategy(&self) -> Option<ConflictStrategy> {
        self.resolution.as_ref().and_then(|r| r.conflict)
    }

    /// Expand every scope section into an ordered list of declarations.
    ///
    /// Order is section order (`api`, `implementation`, `compile-only-api`,
    /// `compile-only`, `runtime-only`), then manifest key order. Catalog
    /// references and bundles are expanded here.
    pub fn declarations(&self) -> miette::Result<Vec<DependencyDeclaration>> {
        let catalog = match &self.catalog {
            Some(c) => version_catalog::resolve_catalog(c)?,
            None => BTreeMap::new(),
        };

        let mut out = Vec::new();
        for scope in Scope::ALL {
            for (name, dep) in self.section(scope) {
                self.expand(name, dep, scope, &catalog, &mut out)?;
            }
        }
        dependency::check_platform_overlap(&out)?;
        Ok(out)
    }

    fn expand(
        &self,
        name: &str,
        dep: &Dependency,
        scope: Scope,
        catalog: &BTreeMap<String, ResolvedCatalogEntry>,
        out: &mut Vec<DependencyDeclaration>,
    ) -> miette::Result<()> {
        let kind = if dep.is_platform() {
            DeclarationKind::Platform
        } else {
            DeclarationKind::Library
        };
        let exclusions: Vec<Exclusion> = dep.exclusions().to_vec();

        let mut push = |decl_name: String, coordinate: Coordinate, version: Option<String>| {
            out.push(DependencyDeclaration {
                name: decl_name,
                coordinate,
                version,
                scope,
                kind,
                exclusions: exclusions.clone(),
            });
        };

        match dep {
            Dependency::Short(s) => {
                let (coordinate, version) =
                    Coordinate::parse(s).ok_or_else(|| ManifoldError::Manifest {
                        message: format!(
                            "[{scope}] {name}: expected \"group:artifact[:version]\", got \"{s}\""
                        ),
                    })?;
                push(name.to_string(), coordinate, version);
            }
            Dependency::Detailed(d) => {
                push(
                    name.to_string(),
                    Coordinate::new(d.group.clone(), d.artifact.clone()),
                    d.version.clone(),
                );
            }
            Dependency::Catalog(c) if c.bundle => {
                let members = self
                    .catalog
                    .as_ref()
                    .and_then(|cat| cat.bundles.get(&c.catalog))
                    .ok_or_else(|| ManifoldError::Manifest {
                        message: format!("[{scope}] {name}: unknown catalog bundle '{}'", c.catalog),
                    })?;
                for member in members {
                    let entry = catalog.get(member).ok_or_else(|| ManifoldError::Manifest {
                        message: format!(
                            "catalog bundle '{}' references unknown library '{member}'",
                            c.catalog
                        ),
                    })?;
                    push(
                        format!("{name}/{member}"),
                        entry.coordinate.clone(),
                        entry.version.clone(),
                    );
                }
            }
            Dependency::Catalog(c) => {
                let entry = catalog.get(&c.catalog).ok_or_else(|| ManifoldError::Manifest {
                    message: format!("[{scope}] {name}: unknown catalog library '{}'", c.catalog),
                })?;
                push(
                    name.to_string(),
                    entry.coordinate.clone(),
                    entry.version.clone(),
                );
            }
        }
        Ok(())
    }
}
