//! Resolved dependency graph construction and traversal.
//!
//! Nodes are unique per `group:artifact`. Each node records, per declaration
//! that reaches it, whether it is needed at compile time and/or at runtime.
//! Edges record which declarations' subtrees they belong to, so one
//! declaration's view of the graph can be recovered after exclusions.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

use manifold_core::dependency::{Coordinate, Scope};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Which classpaths a module is needed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Usage {
    pub compile: bool,
    pub runtime: bool,
}

impl Usage {
    pub const NONE: Usage = Usage {
        compile: false,
        runtime: false,
    };
    pub const COMPILE: Usage = Usage {
        compile: true,
        runtime: false,
    };
    pub const RUNTIME: Usage = Usage {
        compile: false,
        runtime: true,
    };
    pub const BOTH: Usage = Usage {
        compile: true,
        runtime: true,
    };

    /// Usage of a directly declared library.
    pub fn of_scope(scope: Scope) -> Self {
        Usage {
            compile: scope.on_compile_classpath(),
            runtime: scope.on_runtime_classpath(),
        }
    }

    /// Usage a transitive dependency inherits through a POM edge of `pom_scope`.
    ///
    /// `compile` edges pass usage through, `runtime` edges keep only the
    /// runtime half, everything else (test, provided, system) contributes nothing.
    pub fn through(self, pom_scope: &str) -> Self {
        match pom_scope {
            "compile" => self,
            "runtime" => Usage {
                compile: false,
                runtime: self.runtime,
            },
            _ => Usage::NONE,
        }
    }

    pub fn union(self, other: Usage) -> Self {
        Usage {
            compile: self.compile || other.compile,
            runtime: self.runtime || other.runtime,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.compile && !self.runtime
    }
}

/// A node in the resolved dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub coordinate: Coordinate,
    pub version: String,
    /// Platforms carry constraints only and never land on a classpath.
    pub platform: bool,
    /// Binary artifact location, when the index provides one.
    pub path: Option<PathBuf>,
    /// Name of the platform declaration whose constraint fixed the version.
    pub pinned_by: Option<String>,
    /// Usage per declaration index reaching this node.
    pub origins: BTreeMap<usize, Usage>,
}

impl ResolvedNode {
    pub fn new(coordinate: Coordinate, version: &str) -> Self {
        Self {
            coordinate,
            version: version.to_string(),
            platform: false,
            path: None,
            pinned_by: None,
            origins: BTreeMap::new(),
        }
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        self.coordinate.key()
    }

    /// Combined usage over every declaration reaching this node.
    pub fn usage(&self) -> Usage {
        self.origins
            .values()
            .fold(Usage::NONE, |acc, usage| acc.union(*usage))
    }

    pub fn record_origin(&mut self, origin: usize, usage: Usage) {
        let entry = self.origins.entry(origin).or_default();
        *entry = entry.union(usage);
    }
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)
    }
}

/// Edge label in the dependency graph.
#[derive(Debug, Clone, Default)]
pub struct DepEdge {
    /// Manifest section for edges leaving the root, POM scope otherwise.
    pub scope: String,
    /// Declarations whose subtrees contain this edge.
    pub origins: BTreeSet<usize>,
}

/// A resolved dependency graph backed by petgraph.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<ResolvedNode, DepEdge>,
    /// Lookup from `group:artifact` to node index.
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl DependencyGraph {
    /// Create a graph whose root is the module being resolved.
    pub fn new(root: Coordinate, version: &str) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(ResolvedNode::new(root, version));
        Self {
            graph,
            index: HashMap::new(),
            root,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Add or retrieve the node for `coordinate`. An existing node keeps its version.
    pub fn add_node(&mut self, coordinate: Coordinate, version: &str) -> NodeIndex {
        let key = coordinate.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(ResolvedNode::new(coordinate, version));
        self.index.insert(key, idx);
        idx
    }

    /// Add a dependency edge from `from` to `to` on behalf of declaration `origin`.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, scope: &str, origin: usize) {
        if let Some(edge) = self.graph.find_edge(from, to) {
            self.graph[edge].origins.insert(origin);
            return;
        }
        self.graph.add_edge(
            from,
            to,
            DepEdge {
                scope: scope.to_string(),
                origins: BTreeSet::from([origin]),
            },
        );
    }

    /// Look up a node by `group:artifact`.
    pub fn find(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &ResolvedNode {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut ResolvedNode {
        &mut self.graph[idx]
    }

    /// All resolved nodes (excluding root) in first-visit order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResolvedNode> {
        self.graph
            .node_indices()
            .filter(move |&idx| idx != self.root)
            .map(move |idx| &self.graph[idx])
    }

    /// Direct dependencies of a node, in insertion order.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &DepEdge)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target(), e.weight()))
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges.into_iter().map(|(_, n, e)| (n, e)).collect()
    }

    /// Reverse dependencies (who depends on this node), in insertion order.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &DepEdge)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.id(), e.source(), e.weight()))
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges.into_iter().map(|(_, n, e)| (n, e)).collect()
    }

    /// Print the dependency tree to a string, grouped by manifest section.
    ///
    /// Each declaration's subtree is shown as that declaration sees it, so
    /// modules it excludes do not appear beneath it.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[self.root]);

        let direct = self.dependencies_of(self.root);
        let sections: Vec<(&str, Vec<(NodeIndex, &DepEdge)>)> = Scope::ALL
            .iter()
            .map(|scope| {
                let members: Vec<_> = direct
                    .iter()
                    .filter(|(_, edge)| edge.scope == scope.section())
                    .map(|(idx, edge)| (*idx, *edge))
                    .collect();
                (scope.section(), members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect();

        let mut visited = HashSet::from([self.root]);
        let section_count = sections.len();
        for (i, (section, members)) in sections.iter().enumerate() {
            output.push_str(&format!("[{section}]\n"));
            let last_section = i + 1 == section_count;
            let count = members.len();
            for (j, (idx, edge)) in members.iter().enumerate() {
                let is_last = last_section && j + 1 == count;
                self.print_subtree(
                    &mut output,
                    *idx,
                    "",
                    is_last,
                    1,
                    max_depth,
                    &edge.origins,
                    &mut visited,
                );
            }
        }

        output
    }

    /// Print the subtree contributed by a single declaration.
    pub fn print_declaration_tree(&self, origin: usize, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let filter = BTreeSet::from([origin]);
        let mut visited = HashSet::from([self.root]);
        for (idx, edge) in self.dependencies_of(self.root) {
            if !edge.origins.contains(&origin) {
                continue;
            }
            output.push_str(&format!("{}\n", self.describe(idx)));
            if max_depth.is_some_and(|max| max <= 1) {
                continue;
            }
            visited.insert(idx);
            let children = self.children_within(idx, &filter);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate() {
                self.print_subtree(
                    &mut output,
                    child,
                    "",
                    i + 1 == count,
                    2,
                    max_depth,
                    &filter,
                    &mut visited,
                );
            }
            visited.remove(&idx);
        }
        output
    }

    fn children_within(&self, idx: NodeIndex, filter: &BTreeSet<usize>) -> Vec<NodeIndex> {
        self.dependencies_of(idx)
            .into_iter()
            .filter(|(_, edge)| !edge.origins.is_disjoint(filter))
            .map(|(child, _)| child)
            .collect()
    }

    fn describe(&self, idx: NodeIndex) -> String {
        let node = &self.graph[idx];
        if node.platform {
            format!("{node} (platform)")
        } else {
            node.to_string()
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        filter: &BTreeSet<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.describe(idx)));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.children_within(idx, filter);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i + 1 == count,
                depth + 1,
                max_depth,
                filter,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Find the shortest path from root to a specific dependency.
    ///
    /// Accepts either `group:artifact` or just `artifact` (partial match).
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&ResolvedNode>> {
        let target = self.resolve_key(target_key)?;
        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([self.root]);
        let mut seen = HashSet::from([self.root]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                let mut path = vec![current];
                let mut step = current;
                while let Some(&prev) = came_from.get(&step) {
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return Some(path.into_iter().map(|idx| &self.graph[idx]).collect());
            }
            for (child, _) in self.dependencies_of(current) {
                if seen.insert(child) {
                    came_from.insert(child, current);
                    queue.push_back(child);
                }
            }
        }
        None
    }

    /// Resolve a user-provided key to a node index.
    ///
    /// Tries exact `group:artifact` first, then the first node (in visit
    /// order) whose artifact name matches.
    pub fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }
        self.graph
            .node_indices()
            .filter(|&idx| idx != self.root)
            .find(|&idx| self.graph[idx].coordinate.artifact == key)
    }

    /// Build an inverted dependency tree (reverse edges) for a single artifact.
    ///
    /// Accepts either `group:artifact` or just `artifact` (partial match).
    pub fn print_inverted_tree(&self, target_key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(target_key) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.describe(idx)));

        let mut visited = HashSet::from([idx]);
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, (dep_idx, _)) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(&mut output, dep_idx, "", i + 1 == count, &mut visited);
        }
        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.describe(idx)));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, (dep_idx, _)) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(output, dep_idx, &child_prefix, i + 1 == count, visited);
        }

        visited.remove(&idx);
    }

    /// Number of nodes (excluding root).
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
