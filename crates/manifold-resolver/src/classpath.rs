//! Classpath views of a resolution: what this module compiles and runs
//! against, and what it exposes to its consumers.

use std::path::PathBuf;

use serde::Serialize;

use crate::graph::{ResolvedNode, Usage};
use crate::resolver::Resolution;

/// A resolved module as it appears on a classpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl From<&ResolvedNode> for ResolvedArtifact {
    fn from(node: &ResolvedNode) -> Self {
        Self {
            group: node.coordinate.group.clone(),
            artifact: node.coordinate.artifact.clone(),
            version: node.version.clone(),
            path: node.path.clone(),
        }
    }
}

impl std::fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// A version constraint re-exported to consumers through a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedConstraint {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub platform: String,
}

/// What a consumer of this module inherits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportedApi {
    /// Modules on every consumer's compile classpath.
    pub api: Vec<ResolvedArtifact>,
    /// Modules on every consumer's runtime classpath.
    pub runtime: Vec<ResolvedArtifact>,
    /// Platform pins consumers resolve against.
    pub constraints: Vec<ExportedConstraint>,
}

impl Resolution {
    /// Modules needed to compile this module, in first-visit order.
    pub fn compile_classpath(&self) -> Vec<ResolvedArtifact> {
        self.classpath(|usage| usage.compile)
    }

    /// Modules needed to run this module, in first-visit order.
    pub fn runtime_classpath(&self) -> Vec<ResolvedArtifact> {
        self.classpath(|usage| usage.runtime)
    }

    fn classpath(&self, wanted: impl Fn(Usage) -> bool) -> Vec<ResolvedArtifact> {
        self.graph
            .nodes()
            .filter(|node| !node.platform && wanted(node.usage()))
            .map(ResolvedArtifact::from)
            .collect()
    }

    /// The view a consumer of this module inherits.
    ///
    /// A module is exported for compilation when some declaration with an
    /// exporting scope (`api`, `compile-only-api`) needs it at compile time,
    /// and exported for runtime when some declaration packaged with this
    /// module (`api`, `implementation`, `runtime-only`) needs it at runtime.
    pub fn exported(&self) -> ExportedApi {
        let exported_by = |node: &ResolvedNode, compile: bool| {
            node.origins.iter().any(|(origin, usage)| {
                let scope = self.declarations[*origin].scope;
                if compile {
                    usage.compile && scope.exports_compile()
                } else {
                    usage.runtime && scope.exports_runtime()
                }
            })
        };
        let pick = |compile: bool| -> Vec<ResolvedArtifact> {
            self.graph
                .nodes()
                .filter(|node| !node.platform && exported_by(node, compile))
                .map(ResolvedArtifact::from)
                .collect()
        };

        ExportedApi {
            api: pick(true),
            runtime: pick(false),
            constraints: self
                .constraints
                .exported()
                .map(|(coordinate, pin)| ExportedConstraint {
                    group: coordinate.group.clone(),
                    artifact: coordinate.artifact.clone(),
                    version: pin.version.clone(),
                    platform: pin.platform.clone(),
                })
                .collect(),
        }
    }
}

/// Binary paths of `artifacts`, plus the artifacts that have none.
pub fn artifact_paths(artifacts: &[ResolvedArtifact]) -> (Vec<PathBuf>, Vec<&ResolvedArtifact>) {
    let mut paths = Vec::new();
    let mut missing = Vec::new();
    for artifact in artifacts {
        match &artifact.path {
            Some(path) => paths.push(path.clone()),
            None => missing.push(artifact),
        }
    }
    (paths, missing)
}

/// Join JAR paths into a classpath string suitable for `-classpath`.
pub fn to_classpath_string(jars: &[PathBuf]) -> String {
    jars.iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(classpath_separator())
}

fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
