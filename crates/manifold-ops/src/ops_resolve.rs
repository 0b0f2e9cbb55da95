//! Operation: resolve the manifest and summarize the outcome.

use std::fmt::Write as _;
use std::path::Path;

use manifold_core::manifest::ConflictStrategy;
use manifold_resolver::classpath::artifact_paths;
use manifold_resolver::resolver::Resolution;
use manifold_util::status::{status, status_info, status_warn};

use crate::Project;

/// Counts shown after a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveSummary {
    pub declarations: usize,
    pub platforms: usize,
    pub pins: usize,
    pub modules: usize,
    pub compile: usize,
    pub runtime: usize,
    pub conflicts: usize,
}

impl ResolveSummary {
    pub fn of(resolution: &Resolution) -> Self {
        Self {
            declarations: resolution.declarations.len(),
            platforms: resolution
                .declarations
                .iter()
                .filter(|d| d.is_platform())
                .count(),
            pins: resolution.constraints.len(),
            modules: resolution.graph.nodes().filter(|n| !n.platform).count(),
            compile: resolution.compile_classpath().len(),
            runtime: resolution.runtime_classpath().len(),
            conflicts: resolution.conflicts.len(),
        }
    }
}

/// Resolve the project at `manifest_path`, print one line per declaration
/// to stdout and a summary to stderr.
pub fn resolve(manifest_path: &Path) -> miette::Result<()> {
    let project = Project::load(manifest_path)?;
    status("Resolving", &project.display_name());
    let resolution = project.resolve()?;

    print!("{}", render_declarations(&resolution));

    let summary = ResolveSummary::of(&resolution);
    if summary.platforms > 0 {
        status_info(
            "Pinned",
            &format!(
                "{} versions from {} platform(s)",
                summary.pins, summary.platforms
            ),
        );
    }
    for conflict in &resolution.conflicts.conflicts {
        status_warn("Conflict", &conflict.to_string());
    }
    let compile = resolution.compile_classpath();
    let (_, missing) = artifact_paths(&compile);
    for artifact in missing {
        status_warn("Missing", &format!("no artifact file for {artifact}"));
    }
    status(
        "Resolved",
        &format!(
            "{} modules ({} compile, {} runtime) using the {} strategy",
            summary.modules,
            summary.compile,
            summary.runtime,
            strategy_name(resolution.strategy)
        ),
    );
    Ok(())
}

fn strategy_name(strategy: ConflictStrategy) -> &'static str {
    match strategy {
        ConflictStrategy::Fail => "fail",
        ConflictStrategy::Nearest => "nearest",
        ConflictStrategy::Highest => "highest",
    }
}

/// One line per declaration: scope, name and the version it resolved to.
pub fn render_declarations(resolution: &Resolution) -> String {
    let mut out = String::new();
    for decl in &resolution.declarations {
        let scope = decl.scope.to_string();
        let resolved = match resolution.module(&decl.coordinate.key()) {
            Some(node) if node.platform => format!("{node} (platform)"),
            Some(node) => match &node.pinned_by {
                Some(platform) => format!("{node} (pinned by {platform})"),
                None => node.to_string(),
            },
            None => decl.to_string(),
        };
        let _ = writeln!(out, "{scope:<16} {:<34} {resolved}", decl.name);
    }
    out
}
