//! Resolution session cache: effective POMs and per-declaration visit tracking.

use std::collections::HashMap;

use manifold_maven::index::PackageIndex;
use manifold_maven::pom::Pom;

use crate::graph::Usage;

/// Parent chains and BOM imports deeper than this are cut off.
const MAX_POM_NESTING: usize = 32;

/// Memoizes effective POMs for one resolution session.
///
/// An effective POM has its parent chain applied, its properties
/// interpolated and imported BOMs folded into its dependency management
/// (entries it declares itself win).
pub struct ModuleCache<'a> {
    index: &'a dyn PackageIndex,
    poms: HashMap<String, Option<Pom>>,
}

impl<'a> ModuleCache<'a> {
    pub fn new(index: &'a dyn PackageIndex) -> Self {
        Self {
            index,
            poms: HashMap::new(),
        }
    }

    pub fn index(&self) -> &'a dyn PackageIndex {
        self.index
    }

    /// Explanation attached to unresolved-coordinate errors.
    pub fn not_found_reason(&self) -> String {
        let searched = self.index.describe();
        if searched.is_empty() {
            "no package index is configured".to_string()
        } else {
            format!("not found in {searched}")
        }
    }

    /// The effective POM for `group:artifact:version`, or `None` when no
    /// index knows the module.
    pub fn effective_pom(
        &mut self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Option<Pom>> {
        let mut stack = Vec::new();
        self.load(group, artifact, version, &mut stack)
    }

    fn load(
        &mut self,
        group: &str,
        artifact: &str,
        version: &str,
        stack: &mut Vec<String>,
    ) -> miette::Result<Option<Pom>> {
        let key = format!("{group}:{artifact}:{version}");
        if let Some(cached) = self.poms.get(&key) {
            return Ok(cached.clone());
        }
        if stack.contains(&key) || stack.len() >= MAX_POM_NESTING {
            tracing::warn!("POM cycle through {key}: {}", stack.join(" -> "));
            return Ok(None);
        }

        stack.push(key.clone());
        let result = self.load_uncached(group, artifact, version, stack);
        stack.pop();

        let pom = result?;
        self.poms.insert(key, pom.clone());
        Ok(pom)
    }

    fn load_uncached(
        &mut self,
        group: &str,
        artifact: &str,
        version: &str,
        stack: &mut Vec<String>,
    ) -> miette::Result<Option<Pom>> {
        let Some(mut pom) = self.index.module(group, artifact, version)? else {
            return Ok(None);
        };

        if let Some(parent) = pom.parent.clone() {
            match self.load(&parent.group_id, &parent.artifact_id, &parent.version, stack)? {
                Some(parent_pom) => pom.apply_parent(&parent_pom),
                None => tracing::warn!(
                    "Parent {}:{}:{} of {group}:{artifact}:{version} not found",
                    parent.group_id,
                    parent.artifact_id,
                    parent.version
                ),
            }
        }
        pom.resolve_properties();

        let imports: Vec<(String, String, String)> = pom
            .bom_imports()
            .into_iter()
            .filter_map(|d| {
                d.version
                    .clone()
                    .map(|v| (d.group_id.clone(), d.artifact_id.clone(), v))
            })
            .collect();
        for (bom_group, bom_artifact, bom_version) in imports {
            let Some(bom) = self.load(&bom_group, &bom_artifact, &bom_version, stack)? else {
                tracing::warn!(
                    "BOM {bom_group}:{bom_artifact}:{bom_version} imported by {group}:{artifact}:{version} not found"
                );
                continue;
            };
            for managed in bom.managed_versions() {
                if pom
                    .managed_version(&managed.group_id, &managed.artifact_id)
                    .is_none()
                {
                    pom.dependency_management.push(managed.clone());
                }
            }
        }

        Ok(Some(pom))
    }
}

/// Tracks which coordinates each declaration has expanded, and with what usage.
///
/// Revisiting is allowed when a later path widens the usage (e.g. a module
/// first reached through a runtime-only edge and then through a compile edge).
#[derive(Debug, Default)]
pub struct VisitedSet {
    visited: HashMap<(usize, String), Usage>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit. Returns `false` if nothing new would be learned.
    pub fn visit(&mut self, origin: usize, key: &str, usage: Usage) -> bool {
        let seen = self
            .visited
            .entry((origin, key.to_string()))
            .or_default();
        let widened = seen.union(usage);
        if widened == *seen {
            return false;
        }
        *seen = widened;
        true
    }

    pub fn contains(&self, origin: usize, key: &str) -> bool {
        self.visited.contains_key(&(origin, key.to_string()))
    }
}
