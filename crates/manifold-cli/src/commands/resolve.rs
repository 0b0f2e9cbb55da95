//! Handler for `manifold resolve`.

use std::path::Path;

use miette::Result;

use manifold_ops::ops_resolve;

pub fn exec(manifest_path: Option<&Path>) -> Result<()> {
    let manifest_path = manifold_ops::locate_manifest(manifest_path)?;
    ops_resolve::resolve(&manifest_path)
}
