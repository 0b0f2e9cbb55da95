//! Handler for `manifold classpath`.

use std::path::Path;

use miette::Result;

use manifold_ops::ops_classpath::{self, ClasspathKind, ClasspathOptions};

pub fn exec(manifest_path: Option<&Path>, runtime: bool, exported: bool, json: bool) -> Result<()> {
    let manifest_path = manifold_ops::locate_manifest(manifest_path)?;
    let kind = if exported {
        ClasspathKind::Exported
    } else if runtime {
        ClasspathKind::Runtime
    } else {
        ClasspathKind::Compile
    };
    ops_classpath::classpath(&manifest_path, &ClasspathOptions { kind, json })
}
