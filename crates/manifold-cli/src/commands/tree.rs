//! Handler for `manifold tree`.

use std::path::Path;

use miette::Result;

use manifold_ops::ops_tree::{self, TreeOptions};

#[allow(clippy::too_many_arguments)]
pub fn exec(
    manifest_path: Option<&Path>,
    depth: Option<u32>,
    declaration: Option<String>,
    why: Option<String>,
    inverted: Option<String>,
    duplicates: bool,
    conflicts: bool,
    constraints: bool,
) -> Result<()> {
    let manifest_path = manifold_ops::locate_manifest(manifest_path)?;

    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        declaration,
        why,
        inverted,
        duplicates,
        conflicts,
        constraints,
    };

    ops_tree::tree(&manifest_path, &opts)
}
