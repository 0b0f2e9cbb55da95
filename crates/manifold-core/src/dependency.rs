use std::fmt;

use serde::{Deserialize, Serialize};

use manifold_util::errors::ManifoldError;

/// A dependency specification in one of the `Manifold.toml` scope sections.
///
/// Supports shorthand (`"group:artifact[:version]"`), detailed and
/// version-catalog forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Short(String),
    Detailed(DetailedDependency),
    Catalog(CatalogDependency),
}

/// A dependency with explicit group and artifact.
///
/// `version` may be omitted when a platform manages it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedDependency {
    pub group: String,
    pub artifact: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub platform: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

/// A reference to a version catalog library or bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDependency {
    pub catalog: String,
    #[serde(default)]
    pub bundle: bool,
    #[serde(default)]
    pub platform: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    /// Whether this entry refers to a platform (BOM) rather than a library.
    pub fn is_platform(&self) -> bool {
        match self {
            Dependency::Short(_) => false,
            Dependency::Detailed(d) => d.platform,
            Dependency::Catalog(c) => c.platform,
        }
    }

    /// Exclusions attached to this entry.
    pub fn exclusions(&self) -> &[Exclusion] {
        match self {
            Dependency::Short(_) => &[],
            Dependency::Detailed(d) => &d.exclusions,
            Dependency::Catalog(c) => &c.exclusions,
        }
    }
}

/// A transitive dependency to exclude from one declaration's subtree.
///
/// Without an `artifact`, every artifact of `group` is excluded. `*` matches
/// any group or artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exclusion {
    pub group: String,
    #[serde(default)]
    pub artifact: Option<String>,
}

const WILDCARD: &str = "*";

impl Exclusion {
    pub fn matches(&self, group: &str, artifact: &str) -> bool {
        (self.group == WILDCARD || self.group == group)
            && self
                .artifact
                .as_deref()
                .map_or(true, |a| a == WILDCARD || a == artifact)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artifact {
            Some(artifact) => write!(f, "{}:{}", self.group, artifact),
            None => write!(f, "{}", self.group),
        }
    }
}

/// Where a declaration is visible: this module's classpaths and what it
/// re-exports to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Compiled against, packaged, and re-exported to consumers.
    Api,
    /// Compiled against and packaged; consumers only see it at runtime.
    Implementation,
    /// Compiled against and re-exported for consumers' compilation; never packaged.
    CompileOnlyApi,
    /// Compiled against only.
    CompileOnly,
    /// Packaged only.
    RuntimeOnly,
}

impl Scope {
    /// All scopes in manifest section order.
    pub const ALL: [Scope; 5] = [
        Scope::Api,
        Scope::Implementation,
        Scope::CompileOnlyApi,
        Scope::CompileOnly,
        Scope::RuntimeOnly,
    ];

    /// The `Manifold.toml` section holding declarations of this scope.
    pub fn section(self) -> &'static str {
        match self {
            Scope::Api => "api",
            Scope::Implementation => "implementation",
            Scope::CompileOnlyApi => "compile-only-api",
            Scope::CompileOnly => "compile-only",
            Scope::RuntimeOnly => "runtime-only",
        }
    }

    pub fn on_compile_classpath(self) -> bool {
        !matches!(self, Scope::RuntimeOnly)
    }

    pub fn on_runtime_classpath(self) -> bool {
        matches!(self, Scope::Api | Scope::Implementation | Scope::RuntimeOnly)
    }

    /// Visible on the compile classpath of modules consuming this one.
    pub fn exports_compile(self) -> bool {
        matches!(self, Scope::Api | Scope::CompileOnlyApi)
    }

    /// Visible on the runtime classpath of modules consuming this one.
    pub fn exports_runtime(self) -> bool {
        self.on_runtime_classpath()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// An artifact's identity: `group:artifact`, without version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Parse `"group:artifact"` or `"group:artifact:version"`.
    ///
    /// Returns the coordinate and the version, if one was given.
    pub fn parse(s: &str) -> Option<(Self, Option<String>)> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return None;
        }
        match parts.as_slice() {
            [group, artifact] => Some((Self::new(*group, *artifact), None)),
            [group, artifact, version] => {
                Some((Self::new(*group, *artifact), Some(version.to_string())))
            }
            _ => None,
        }
    }

    /// `group:artifact` identifier used as a graph and pin-table key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// Whether a declaration contributes code or only version constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Library,
    Platform,
}

/// One fully expanded manifest entry, ready for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    /// Manifest key (or `key/member` for bundle members).
    pub name: String,
    pub coordinate: Coordinate,
    pub version: Option<String>,
    pub scope: Scope,
    pub kind: DeclarationKind,
    pub exclusions: Vec<Exclusion>,
}

impl DependencyDeclaration {
    pub fn library(name: &str, coordinate: Coordinate, version: Option<&str>, scope: Scope) -> Self {
        Self {
            name: name.to_string(),
            coordinate,
            version: version.map(str::to_string),
            scope,
            kind: DeclarationKind::Library,
            exclusions: Vec::new(),
        }
    }

    pub fn platform(name: &str, coordinate: Coordinate, version: &str, scope: Scope) -> Self {
        Self {
            kind: DeclarationKind::Platform,
            ..Self::library(name, coordinate, Some(version), scope)
        }
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn is_platform(&self) -> bool {
        self.kind == DeclarationKind::Platform
    }

    /// Whether `group:artifact` is excluded from this declaration's subtree.
    pub fn excludes(&self, group: &str, artifact: &str) -> bool {
        self.exclusions.iter().any(|e| e.matches(group, artifact))
    }
}

/// Reject a library declared with the coordinate of a platform.
///
/// A platform contributes only version pins, so the two cannot share one
/// graph node.
pub fn check_platform_overlap(declarations: &[DependencyDeclaration]) -> miette::Result<()> {
    for library in declarations.iter().filter(|d| !d.is_platform()) {
        if let Some(platform) = declarations
            .iter()
            .find(|d| d.is_platform() && d.coordinate == library.coordinate)
        {
            return Err(ManifoldError::Manifest {
                message: format!(
                    "[{}] {}: {} is already declared as platform '{}'",
                    library.scope, library.name, library.coordinate, platform.name
                ),
            }
            .into());
        }
    }
    Ok(())
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}", self.coordinate, v),
            None => write!(f, "{}", self.coordinate),
        }
    }
}
