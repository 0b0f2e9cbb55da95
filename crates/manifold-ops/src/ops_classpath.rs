//! Operation: print a classpath for an external compiler or packager.

use std::path::Path;

use manifold_resolver::classpath::{artifact_paths, to_classpath_string};
use manifold_resolver::resolver::Resolution;
use manifold_util::errors::ManifoldError;
use manifold_util::status::status_warn;

use crate::Project;

/// Which view of the resolution to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClasspathKind {
    /// What this module compiles against.
    #[default]
    Compile,
    /// What this module runs with.
    Runtime,
    /// What consumers of this module compile against.
    Exported,
}

/// Options for `manifold classpath`.
#[derive(Debug, Default)]
pub struct ClasspathOptions {
    pub kind: ClasspathKind,
    /// Print coordinates as JSON instead of a joined path string.
    pub json: bool,
}

pub fn classpath(manifest_path: &Path, opts: &ClasspathOptions) -> miette::Result<()> {
    let project = Project::load(manifest_path)?;
    let resolution = project.resolve()?;
    println!("{}", render(&resolution, opts)?);
    Ok(())
}

/// Render the requested classpath.
///
/// The path string lists artifact files only; modules whose file is missing
/// from every index are reported on stderr and left out. The JSON form lists
/// every module, and for `Exported` also the platform constraints consumers
/// inherit.
pub fn render(resolution: &Resolution, opts: &ClasspathOptions) -> miette::Result<String> {
    let artifacts = match opts.kind {
        ClasspathKind::Compile => resolution.compile_classpath(),
        ClasspathKind::Runtime => resolution.runtime_classpath(),
        ClasspathKind::Exported => {
            let exported = resolution.exported();
            if opts.json {
                return to_json(&exported);
            }
            exported.api
        }
    };

    if opts.json {
        return to_json(&artifacts);
    }

    let (paths, missing) = artifact_paths(&artifacts);
    for artifact in missing {
        status_warn("Missing", &format!("no artifact file for {artifact}"));
    }
    Ok(to_classpath_string(&paths))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> miette::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ManifoldError::Generic {
            message: format!("Failed to serialize classpath: {e}"),
        }
        .into()
    })
}
