//! The package-index seam: where module descriptors come from.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::pom::{self, Pom};

/// A source of module descriptors (POMs) keyed by exact coordinates.
///
/// Lookups are synchronous; the resolver treats implementations as opaque
/// external collaborators.
pub trait PackageIndex {
    /// Fetch the module descriptor for `group:artifact:version`.
    ///
    /// `Ok(None)` means this index does not know the module; errors are
    /// reserved for descriptors that exist but cannot be read or parsed.
    fn module(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>>;

    /// Location of the module's binary artifact, if this index has one.
    fn artifact_path(&self, _group: &str, _artifact: &str, _version: &str) -> Option<PathBuf> {
        None
    }

    /// Human-readable name used in logs and error messages.
    fn describe(&self) -> String;
}

impl<T: PackageIndex + ?Sized> PackageIndex for Box<T> {
    fn module(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        (**self).module(group, artifact, version)
    }

    fn artifact_path(&self, group: &str, artifact: &str, version: &str) -> Option<PathBuf> {
        (**self).artifact_path(group, artifact, version)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// An index held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    modules: HashMap<String, Pom>,
    artifacts: HashMap<String, PathBuf>,
}

fn gav(group: &str, artifact: &str, version: &str) -> String {
    format!("{group}:{artifact}:{version}")
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own effective coordinates.
    ///
    /// Descriptors without a resolvable group or version are ignored.
    pub fn insert(&mut self, pom: Pom) {
        let (Some(group), Some(artifact), Some(version)) = (
            pom.effective_group_id(),
            pom.artifact_id.as_deref(),
            pom.effective_version(),
        ) else {
            tracing::warn!("Ignoring POM without complete coordinates: {pom:?}");
            return;
        };
        self.modules.insert(gav(group, artifact, version), pom);
    }

    /// Builder form of [`MemoryIndex::insert`].
    pub fn with(mut self, pom: Pom) -> Self {
        self.insert(pom);
        self
    }

    /// Parse and register a POM document.
    pub fn insert_xml(&mut self, xml: &str) -> miette::Result<()> {
        let pom = pom::parse_pom(xml)?;
        self.insert(pom);
        Ok(())
    }

    pub fn set_artifact_path(&mut self, group: &str, artifact: &str, version: &str, path: PathBuf) {
        self.artifacts.insert(gav(group, artifact, version), path);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl PackageIndex for MemoryIndex {
    fn module(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        Ok(self.modules.get(&gav(group, artifact, version)).cloned())
    }

    fn artifact_path(&self, group: &str, artifact: &str, version: &str) -> Option<PathBuf> {
        self.artifacts.get(&gav(group, artifact, version)).cloned()
    }

    fn describe(&self) -> String {
        format!("memory index ({} modules)", self.modules.len())
    }
}

/// Several indices consulted in order; the first that knows a module wins.
#[derive(Default)]
pub struct IndexChain {
    indices: Vec<Box<dyn PackageIndex>>,
}

impl IndexChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: impl PackageIndex + 'static) {
        self.indices.push(Box::new(index));
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl PackageIndex for IndexChain {
    fn module(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        for index in &self.indices {
            if let Some(pom) = index.module(group, artifact, version)? {
                tracing::debug!("{group}:{artifact}:{version} found in {}", index.describe());
                return Ok(Some(pom));
            }
        }
        Ok(None)
    }

    fn artifact_path(&self, group: &str, artifact: &str, version: &str) -> Option<PathBuf> {
        self.indices
            .iter()
            .find_map(|index| index.artifact_path(group, artifact, version))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.indices.iter().map(|i| i.describe()).collect();
        names.join(", ")
    }
}
