//! Core dependency resolution: platform pins, breadth-first traversal per
//! declaration, exclusions, scope narrowing and conflict settlement.

use std::collections::{BTreeMap, HashMap, VecDeque};

use manifold_core::dependency::{self, Coordinate, DependencyDeclaration, Exclusion};
use manifold_core::manifest::{ConflictStrategy, Manifest};
use manifold_maven::index::PackageIndex;
use manifold_maven::pom::PomDependency;
use manifold_util::errors::ManifoldError;
use petgraph::graph::NodeIndex;

use crate::cache::{ModuleCache, VisitedSet};
use crate::conflict::{ConflictReason, ConflictReport, VersionConflict};
use crate::graph::{DependencyGraph, ResolvedNode, Usage};
use crate::platform::{self, PlatformConstraints};
use crate::version::MavenVersion;

/// Upper bound on re-resolution passes under the `highest` strategy.
const MAX_PASSES: usize = 16;

/// Knobs for a single resolution run.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    pub strategy: ConflictStrategy,
    pub max_passes: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            strategy: ConflictStrategy::default(),
            max_passes: MAX_PASSES,
        }
    }
}

impl ResolveOptions {
    pub fn with_strategy(strategy: ConflictStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// The output of dependency resolution.
#[derive(Debug)]
pub struct Resolution {
    /// Declarations in resolution order; node origins index into this list.
    pub declarations: Vec<DependencyDeclaration>,
    pub graph: DependencyGraph,
    pub constraints: PlatformConstraints,
    pub conflicts: ConflictReport,
    /// Every version requested for each `group:artifact`, in breadth-first order.
    pub version_requests: BTreeMap<String, Vec<String>>,
    pub strategy: ConflictStrategy,
}

impl Resolution {
    /// Index and declaration for a manifest entry name.
    pub fn declaration(&self, name: &str) -> Option<(usize, &DependencyDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .find(|(_, d)| d.name == name)
    }

    /// Every module the named declaration reaches, itself included, honoring
    /// its exclusions. `None` if no declaration has that name.
    pub fn subtree_of(&self, name: &str) -> Option<Vec<&ResolvedNode>> {
        let (origin, _) = self.declaration(name)?;
        Some(
            self.graph
                .nodes()
                .filter(|n| !n.platform && n.origins.contains_key(&origin))
                .collect(),
        )
    }

    /// The resolved module for `group:artifact`, if it is part of the graph.
    pub fn module(&self, key: &str) -> Option<&ResolvedNode> {
        self.graph.find(key).map(|idx| self.graph.node(idx))
    }

    /// Render the subtree of one declaration.
    pub fn print_declaration_tree(&self, name: &str, max_depth: Option<usize>) -> Option<String> {
        let (origin, _) = self.declaration(name)?;
        Some(self.graph.print_declaration_tree(origin, max_depth))
    }
}

/// Resolve the declarations of a manifest.
pub fn resolve_manifest(
    manifest: &Manifest,
    index: &dyn PackageIndex,
    options: &ResolveOptions,
) -> miette::Result<Resolution> {
    let declarations = manifest.declarations()?;
    resolve(
        &manifest.coordinate(),
        &manifest.package.version,
        &declarations,
        index,
        options,
    )
}

/// Resolve `declarations` for the module `root` at `root_version`.
///
/// Platforms are expanded first; their pins override every other request.
/// Libraries are then traversed breadth-first, each declaration carrying its
/// own exclusions down its subtree. Unpinned modules requested at more than
/// one version are settled by `options.strategy`.
pub fn resolve(
    root: &Coordinate,
    root_version: &str,
    declarations: &[DependencyDeclaration],
    index: &dyn PackageIndex,
    options: &ResolveOptions,
) -> miette::Result<Resolution> {
    dependency::check_platform_overlap(declarations)?;
    let mut cache = ModuleCache::new(index);
    let mut platform_conflicts = ConflictReport::new();
    let constraints = platform::collect_constraints(
        declarations,
        &mut cache,
        options.strategy,
        &mut platform_conflicts,
    )?;

    let mut preferred: HashMap<String, String> = HashMap::new();
    for pass_number in 1..=options.max_passes.max(1) {
        let pass = Pass::run(
            root,
            root_version,
            declarations,
            &mut cache,
            &constraints,
            &preferred,
        )?;
        let mut conflicts = platform_conflicts.clone();
        let raised = settle(&pass, &constraints, options.strategy, &mut preferred, &mut conflicts)?;
        if raised == 0 {
            tracing::debug!(
                "Resolved {} modules in {pass_number} pass(es), {} conflict(s)",
                pass.graph.len(),
                conflicts.len()
            );
            return Ok(Resolution {
                declarations: declarations.to_vec(),
                graph: pass.graph,
                constraints,
                conflicts,
                version_requests: pass.requests,
                strategy: options.strategy,
            });
        }
        tracing::debug!("Pass {pass_number}: raised {raised} version(s), resolving again");
    }

    Err(ManifoldError::Generic {
        message: format!(
            "Dependency versions did not settle after {} passes",
            options.max_passes
        ),
    }
    .into())
}

/// Entry in the BFS queue.
struct QueueEntry {
    coordinate: Coordinate,
    requested: Option<String>,
    usage: Usage,
    depth: usize,
    parent: NodeIndex,
    /// Label of the edge from `parent`.
    scope: String,
    origin: usize,
    exclusions: Vec<Exclusion>,
}

/// One breadth-first traversal of every declaration.
struct Pass {
    graph: DependencyGraph,
    requests: BTreeMap<String, Vec<String>>,
}

impl Pass {
    fn run(
        root: &Coordinate,
        root_version: &str,
        declarations: &[DependencyDeclaration],
        cache: &mut ModuleCache<'_>,
        constraints: &PlatformConstraints,
        preferred: &HashMap<String, String>,
    ) -> miette::Result<Self> {
        let mut graph = DependencyGraph::new(root.clone(), root_version);
        let root_idx = graph.root();
        let mut requests: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut selected: HashMap<String, String> = HashMap::new();
        let mut visited = VisitedSet::new();
        let mut queue: VecDeque<QueueEntry> = VecDeque::new();

        for (origin, decl) in declarations.iter().enumerate() {
            if decl.is_platform() {
                let idx = graph.add_node(
                    decl.coordinate.clone(),
                    decl.version.as_deref().unwrap_or_default(),
                );
                graph.node_mut(idx).platform = true;
                graph.add_edge(root_idx, idx, decl.scope.section(), origin);
                continue;
            }
            queue.push_back(QueueEntry {
                coordinate: decl.coordinate.clone(),
                requested: decl.version.clone(),
                usage: Usage::of_scope(decl.scope),
                depth: 1,
                parent: root_idx,
                scope: decl.scope.section().to_string(),
                origin,
                exclusions: decl.exclusions.clone(),
            });
        }

        while let Some(entry) = queue.pop_front() {
            let key = entry.coordinate.key();
            if let Some(requested) = &entry.requested {
                requests.entry(key.clone()).or_default().push(requested.clone());
            }

            let pin = constraints.pinned(&entry.coordinate);
            let version = match pin {
                Some(pin) => pin.version.clone(),
                None => match selected
                    .get(&key)
                    .or_else(|| preferred.get(&key))
                    .or(entry.requested.as_ref())
                {
                    Some(version) => version.clone(),
                    None => {
                        return Err(ManifoldError::UnresolvedCoordinate {
                            coordinate: key,
                            reason: missing_version_reason(&entry, declarations, &graph),
                        }
                        .into())
                    }
                },
            };
            selected.entry(key.clone()).or_insert_with(|| version.clone());

            let idx = graph.add_node(entry.coordinate.clone(), &version);
            {
                let node = graph.node_mut(idx);
                node.record_origin(entry.origin, entry.usage);
                if let Some(pin) = pin {
                    node.pinned_by = Some(pin.platform.clone());
                }
            }
            graph.add_edge(entry.parent, idx, &entry.scope, entry.origin);

            if !visited.visit(entry.origin, &key, entry.usage) {
                continue;
            }

            let group = &entry.coordinate.group;
            let artifact = &entry.coordinate.artifact;
            let pom = cache
                .effective_pom(group, artifact, &version)?
                .ok_or_else(|| ManifoldError::UnresolvedCoordinate {
                    coordinate: format!("{key}:{version}"),
                    reason: cache.not_found_reason(),
                })?;
            if graph.node(idx).path.is_none() {
                graph.node_mut(idx).path = cache.index().artifact_path(group, artifact, &version);
            }

            for dep in &pom.dependencies {
                if dep.optional {
                    continue;
                }
                let usage = entry.usage.through(dep.effective_scope());
                if usage.is_empty() {
                    continue;
                }
                if let Some(exclusion) = entry
                    .exclusions
                    .iter()
                    .find(|e| e.matches(&dep.group_id, &dep.artifact_id))
                {
                    tracing::debug!(
                        "{}:{} excluded below {key} by {exclusion} ({})",
                        dep.group_id,
                        dep.artifact_id,
                        declarations[entry.origin].name
                    );
                    continue;
                }

                let requested = dep.version.clone().or_else(|| {
                    pom.managed_version(&dep.group_id, &dep.artifact_id)
                        .map(str::to_string)
                });
                let mut exclusions = entry.exclusions.clone();
                exclusions.extend(pom_exclusions(dep));

                queue.push_back(QueueEntry {
                    coordinate: Coordinate::new(dep.group_id.clone(), dep.artifact_id.clone()),
                    requested,
                    usage,
                    depth: entry.depth + 1,
                    parent: idx,
                    scope: dep.effective_scope().to_string(),
                    origin: entry.origin,
                    exclusions,
                });
            }
        }

        Ok(Self { graph, requests })
    }
}

fn pom_exclusions(dep: &PomDependency) -> impl Iterator<Item = Exclusion> + '_ {
    dep.exclusions.iter().map(|e| Exclusion {
        group: e.group_id.clone(),
        artifact: e.artifact_id.clone().filter(|a| a != "*"),
    })
}

fn missing_version_reason(
    entry: &QueueEntry,
    declarations: &[DependencyDeclaration],
    graph: &DependencyGraph,
) -> String {
    if entry.depth == 1 {
        format!(
            "declaration '{}' has no version and no platform constrains it",
            declarations[entry.origin].name
        )
    } else {
        format!(
            "{} depends on it without a version and no platform constrains it",
            graph.node(entry.parent)
        )
    }
}

/// Versions in first-seen order, with equal Maven versions collapsed.
fn distinct_versions(requested: &[String]) -> Vec<String> {
    let mut seen: Vec<(MavenVersion, String)> = Vec::new();
    for version in requested {
        let parsed = MavenVersion::parse(version);
        if !seen.iter().any(|(v, _)| *v == parsed) {
            seen.push((parsed, version.clone()));
        }
    }
    seen.into_iter().map(|(_, v)| v).collect()
}

/// Apply the conflict strategy to a finished pass.
///
/// Returns how many preferred versions were raised; a non-zero count means
/// the pass must be repeated.
fn settle(
    pass: &Pass,
    constraints: &PlatformConstraints,
    strategy: ConflictStrategy,
    preferred: &mut HashMap<String, String>,
    report: &mut ConflictReport,
) -> miette::Result<usize> {
    let mut raised = 0;
    for (key, requested) in &pass.requests {
        let Some(idx) = pass.graph.find(key) else {
            continue;
        };
        let node = pass.graph.node(idx);
        let resolved = MavenVersion::parse(&node.version);
        let distinct = distinct_versions(requested);

        let mut record_losers = |reason: ConflictReason| {
            for version in distinct.iter().filter(|v| MavenVersion::parse(v) != resolved) {
                report.add(VersionConflict {
                    coordinate: node.coordinate.clone(),
                    requested: version.clone(),
                    resolved: node.version.clone(),
                    reason: reason.clone(),
                });
            }
        };

        if let Some(pin) = constraints.pinned(&node.coordinate) {
            record_losers(ConflictReason::PinnedByPlatform(pin.platform.clone()));
            continue;
        }
        if distinct.len() < 2 {
            continue;
        }

        match strategy {
            ConflictStrategy::Fail => {
                return Err(ManifoldError::VersionConflict {
                    coordinate: key.clone(),
                    versions: distinct.clone(),
                }
                .into())
            }
            ConflictStrategy::Nearest => record_losers(ConflictReason::Nearest),
            ConflictStrategy::Highest => {
                let highest = distinct
                    .iter()
                    .map(|v| MavenVersion::parse(v))
                    .max()
                    .unwrap_or_else(|| resolved.clone());
                if highest > resolved {
                    preferred.insert(key.clone(), highest.as_str().to_string());
                    raised += 1;
                } else {
                    record_losers(ConflictReason::Highest);
                }
            }
        }
    }
    Ok(raised)
}
