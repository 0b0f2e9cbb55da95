//! Operation: display the dependency tree.

use std::fmt::Write as _;
use std::path::Path;

use manifold_resolver::resolver::Resolution;
use manifold_resolver::version::same_version;
use manifold_util::errors::ManifoldError;

use crate::Project;

/// Options for `manifold tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show only the subtree of one declaration.
    pub declaration: Option<String>,
    /// Show the shortest path from the root to a module.
    pub why: Option<String>,
    /// Show the modules that depend on a module.
    pub inverted: Option<String>,
    /// Show modules requested at more than one version.
    pub duplicates: bool,
    /// Show version conflicts.
    pub conflicts: bool,
    /// Show platform version pins.
    pub constraints: bool,
}

/// Display the dependency tree for the project.
pub fn tree(manifest_path: &Path, opts: &TreeOptions) -> miette::Result<()> {
    let project = Project::load(manifest_path)?;
    let resolution = project.resolve()?;
    print!("{}", render(&resolution, opts)?);
    Ok(())
}

/// Render the view selected by `opts`; the full tree when none is.
pub fn render(resolution: &Resolution, opts: &TreeOptions) -> miette::Result<String> {
    let graph = &resolution.graph;
    let mut out = String::new();

    if let Some(ref target) = opts.why {
        match graph.find_path(target) {
            Some(path) => {
                let _ = writeln!(out, "Path to {target}:");
                for (i, node) in path.iter().enumerate() {
                    let _ = writeln!(out, "{}{node}", "  ".repeat(i));
                }
            }
            None => {
                let _ = writeln!(out, "Dependency '{target}' not found in the graph.");
            }
        }
        return Ok(out);
    }

    if let Some(ref target) = opts.inverted {
        let inverted = graph.print_inverted_tree(target);
        if inverted.is_empty() {
            let _ = writeln!(out, "Dependency '{target}' not found in the graph.");
        } else {
            out.push_str(&inverted);
        }
        return Ok(out);
    }

    if opts.conflicts {
        let _ = writeln!(out, "{}", resolution.conflicts.to_string().trim_end());
        return Ok(out);
    }

    if opts.constraints {
        if resolution.constraints.is_empty() {
            let _ = writeln!(out, "No platform constraints.");
        }
        for (coordinate, pin) in resolution.constraints.iter() {
            let _ = writeln!(
                out,
                "{coordinate}:{} (platform {}, {})",
                pin.version, pin.platform, pin.scope
            );
        }
        return Ok(out);
    }

    if opts.duplicates {
        let mut found = false;
        for (key, versions) in &resolution.version_requests {
            let mut distinct: Vec<&String> = Vec::new();
            for v in versions {
                if !distinct.iter().any(|d| same_version(d, v)) {
                    distinct.push(v);
                }
            }
            if distinct.len() < 2 {
                continue;
            }
            found = true;
            let resolved = resolution
                .module(key)
                .map(|n| n.version.as_str())
                .unwrap_or("?");
            let requested: Vec<&str> = distinct.iter().map(|v| v.as_str()).collect();
            let _ = writeln!(
                out,
                "{key}: {} (resolved {resolved})",
                requested.join(", ")
            );
        }
        if !found {
            let _ = writeln!(out, "No duplicate dependencies.");
        }
        return Ok(out);
    }

    if let Some(ref name) = opts.declaration {
        return resolution
            .print_declaration_tree(name, opts.depth)
            .ok_or_else(|| {
                ManifoldError::Generic {
                    message: format!("no declaration named '{name}' in the manifest"),
                }
                .into()
            });
    }

    Ok(graph.print_tree(opts.depth))
}
