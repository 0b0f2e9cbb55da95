use manifold_core::dependency::Coordinate;
use manifold_core::manifest::{CatalogConfig, CatalogLibrary};
use manifold_core::version_catalog::resolve_catalog;
use std::collections::BTreeMap;

fn catalog_with(alias: &str, lib: CatalogLibrary, versions: &[(&str, &str)]) -> CatalogConfig {
    let mut libraries = BTreeMap::new();
    libraries.insert(alias.to_string(), lib);
    CatalogConfig {
        versions: versions
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        libraries,
        bundles: BTreeMap::new(),
    }
}

#[test]
fn resolve_catalog_with_version_ref() {
    let catalog = catalog_with(
        "adventureBom",
        CatalogLibrary {
            module: Some("net.kyori:adventure-bom".to_string()),
            version_ref: Some("adventure".to_string()),
            ..Default::default()
        },
        &[("adventure", "4.17.0")],
    );

    let entries = resolve_catalog(&catalog).unwrap();
    let entry = &entries["adventureBom"];
    assert_eq!(entry.coordinate, Coordinate::new("net.kyori", "adventure-bom"));
    assert_eq!(entry.version.as_deref(), Some("4.17.0"));
}

#[test]
fn resolve_catalog_with_direct_version_and_split_identity() {
    let catalog = catalog_with(
        "checkerQual",
        CatalogLibrary {
            group: Some("org.checkerframework".to_string()),
            artifact: Some("checker-qual".to_string()),
            version: Some("3.42.0".to_string()),
            ..Default::default()
        },
        &[],
    );

    let entries = resolve_catalog(&catalog).unwrap();
    assert_eq!(entries["checkerQual"].version.as_deref(), Some("3.42.0"));
}

#[test]
fn resolve_catalog_without_version_is_platform_managed() {
    let catalog = catalog_with(
        "adventureApi",
        CatalogLibrary {
            module: Some("net.kyori:adventure-api".to_string()),
            ..Default::default()
        },
        &[],
    );
    let entries = resolve_catalog(&catalog).unwrap();
    assert!(entries["adventureApi"].version.is_none());
}

#[test]
fn resolve_catalog_missing_version_ref_is_an_error() {
    let catalog = catalog_with(
        "lib",
        CatalogLibrary {
            module: Some("com.example:lib".to_string()),
            version_ref: Some("nonexistent".to_string()),
            ..Default::default()
        },
        &[],
    );
    let err = resolve_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("nonexistent"), "got: {err}");
}

#[test]
fn resolve_catalog_requires_identity() {
    let catalog = catalog_with(
        "lib",
        CatalogLibrary {
            group: Some("com.example".to_string()),
            ..Default::default()
        },
        &[],
    );
    assert!(resolve_catalog(&catalog).is_err());
}

#[test]
fn resolve_catalog_empty_returns_empty_map() {
    let entries = resolve_catalog(&CatalogConfig::default()).unwrap();
    assert!(entries.is_empty());
}
