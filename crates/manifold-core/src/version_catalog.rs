use std::collections::BTreeMap;

use manifold_util::errors::ManifoldError;

use crate::dependency::Coordinate;
use crate::manifest::{CatalogConfig, CatalogLibrary};

/// Resolved version catalog entry with the actual version string, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCatalogEntry {
    pub coordinate: Coordinate,
    pub version: Option<String>,
}

/// Resolve all catalog library entries by substituting version refs.
///
/// A `version.ref` naming a missing `[catalog.versions]` key is an error; a
/// library with neither `version` nor `version.ref` resolves without a
/// version and must be managed by a platform.
pub fn resolve_catalog(
    catalog: &CatalogConfig,
) -> miette::Result<BTreeMap<String, ResolvedCatalogEntry>> {
    let mut entries = BTreeMap::new();
    for (alias, lib) in &catalog.libraries {
        let coordinate = library_coordinate(alias, lib)?;
        let version = match &lib.version_ref {
            Some(vref) => Some(catalog.versions.get(vref).cloned().ok_or_else(|| {
                ManifoldError::Manifest {
                    message: format!(
                        "catalog library '{alias}' references unknown version '{vref}'"
                    ),
                }
            })?),
            None => lib.version.clone(),
        };
        entries.insert(
            alias.clone(),
            ResolvedCatalogEntry {
                coordinate,
                version,
            },
        );
    }
    Ok(entries)
}

fn library_coordinate(alias: &str, lib: &CatalogLibrary) -> miette::Result<Coordinate> {
    if let Some(module) = &lib.module {
        return match Coordinate::parse(module) {
            Some((coordinate, None)) => Ok(coordinate),
            _ => Err(ManifoldError::Manifest {
                message: format!(
                    "catalog library '{alias}': module must be \"group:artifact\", got \"{module}\""
                ),
            }
            .into()),
        };
    }
    match (&lib.group, &lib.artifact) {
        (Some(group), Some(artifact)) => Ok(Coordinate::new(group.clone(), artifact.clone())),
        _ => Err(ManifoldError::Manifest {
            message: format!("catalog library '{alias}' needs either `module` or `group` and `artifact`"),
        }
        .into()),
    }
}
