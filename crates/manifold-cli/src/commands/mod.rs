//! Command dispatch and handler modules.

mod classpath;
mod resolve;
mod tree;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!("{:?}", cli.command);
    match cli.command {
        Command::Resolve { manifest } => resolve::exec(manifest.manifest_path.as_deref()),
        Command::Classpath {
            manifest,
            runtime,
            exported,
            json,
        } => classpath::exec(manifest.manifest_path.as_deref(), runtime, exported, json),
        Command::Tree {
            manifest,
            depth,
            declaration,
            why,
            inverted,
            duplicates,
            conflicts,
            constraints,
        } => tree::exec(
            manifest.manifest_path.as_deref(),
            depth,
            declaration,
            why,
            inverted,
            duplicates,
            conflicts,
            constraints,
        ),
    }
}
