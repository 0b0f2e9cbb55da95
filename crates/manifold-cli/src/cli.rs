//! CLI argument definitions for Manifold.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "manifold",
    version,
    about = "Resolve a JVM dependency manifest into classpaths",
    long_about = "Manifold reads a Manifold.toml, applies platform (BOM) version pins and \
                  per-declaration exclusions, and prints the compile, runtime or exported \
                  classpath for an external compiler or packager."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to Manifold.toml (or its directory); defaults to the nearest one
    #[arg(long, value_name = "PATH", env = "MANIFOLD_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve dependencies and print a summary
    Resolve {
        #[command(flatten)]
        manifest: ManifestArgs,
    },

    /// Print a classpath
    Classpath {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Print the runtime classpath instead of the compile classpath
        #[arg(long, conflicts_with = "exported")]
        runtime: bool,
        /// Print what consumers of this module compile against
        #[arg(long)]
        exported: bool,
        /// Print coordinates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the dependency tree
    Tree {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Show only the subtree of one declaration
        #[arg(long, value_name = "NAME")]
        declaration: Option<String>,
        /// Explain why a dependency is included
        #[arg(long, value_name = "COORD")]
        why: Option<String>,
        /// Show inverted tree (dependents) of a dependency
        #[arg(long, value_name = "COORD")]
        inverted: Option<String>,
        /// Show dependencies requested at more than one version
        #[arg(long)]
        duplicates: bool,
        /// Show version conflicts
        #[arg(long)]
        conflicts: bool,
        /// Show platform version pins
        #[arg(long)]
        constraints: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
