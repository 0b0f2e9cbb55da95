//! Platform (BOM) constraints: version pins collected from declared platforms.

use std::collections::BTreeMap;

use manifold_core::dependency::{Coordinate, DependencyDeclaration, Scope};
use manifold_core::manifest::ConflictStrategy;
use manifold_util::errors::ManifoldError;

use crate::cache::ModuleCache;
use crate::conflict::{ConflictReason, ConflictReport, VersionConflict};
use crate::version::MavenVersion;

/// A version fixed by a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub version: String,
    /// Name of the platform declaration that contributed the pin.
    pub platform: String,
    /// Scope of that platform declaration.
    pub scope: Scope,
}

type PinTable = BTreeMap<String, (Coordinate, Pin)>;

/// The merged pin table of every declared platform, keyed by `group:artifact`.
///
/// Pins from exporting platforms are also merged into a table of their own,
/// so a non-exported platform never hides them from consumers.
#[derive(Debug, Clone, Default)]
pub struct PlatformConstraints {
    pins: PinTable,
    exported: PinTable,
}

impl PlatformConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pinned(&self, coordinate: &Coordinate) -> Option<&Pin> {
        self.pins.get(&coordinate.key()).map(|(_, pin)| pin)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Pin)> {
        self.pins.values().map(|(coordinate, pin)| (coordinate, pin))
    }

    /// Pins contributed by platforms that consumers of this module also see.
    pub fn exported(&self) -> impl Iterator<Item = (&Coordinate, &Pin)> {
        self.exported.values().map(|(coordinate, pin)| (coordinate, pin))
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

/// Collect the version pins of every platform declaration.
///
/// Each platform's effective BOM (parent applied, imports folded in)
/// contributes one pin per managed module. When two platforms pin the same
/// module to different versions, `strategy` decides: `Fail` reports a
/// [`ManifoldError::VersionConflict`], `Nearest` keeps the platform declared
/// first and `Highest` keeps the higher version. Overridden pins are recorded
/// in `report`.
pub fn collect_constraints(
    declarations: &[DependencyDeclaration],
    cache: &mut ModuleCache<'_>,
    strategy: ConflictStrategy,
    report: &mut ConflictReport,
) -> miette::Result<PlatformConstraints> {
    let mut constraints = PlatformConstraints::new();

    for decl in declarations.iter().filter(|d| d.is_platform()) {
        let version = decl
            .version
            .as_deref()
            .ok_or_else(|| ManifoldError::UnresolvedCoordinate {
                coordinate: decl.coordinate.to_string(),
                reason: format!("platform '{}' declares no version", decl.name),
            })?;
        let bom = cache
            .effective_pom(&decl.coordinate.group, &decl.coordinate.artifact, version)?
            .ok_or_else(|| ManifoldError::UnresolvedCoordinate {
                coordinate: format!("{}:{version}", decl.coordinate),
                reason: cache.not_found_reason(),
            })?;

        let mut count = 0usize;
        for managed in bom.managed_versions() {
            let Some(managed_version) = managed.version.clone() else {
                continue;
            };
            let coordinate = Coordinate::new(managed.group_id.clone(), managed.artifact_id.clone());
            let pin = Pin {
                version: managed_version,
                platform: decl.name.clone(),
                scope: decl.scope,
            };
            count += 1;
            let exports = pin.scope.exports_compile() || pin.scope.exports_runtime();
            if exports {
                merge_pin(&mut constraints.exported, coordinate.clone(), pin.clone(), strategy)?;
            }
            if let Some(conflict) = merge_pin(&mut constraints.pins, coordinate, pin, strategy)? {
                report.add(conflict);
            }
        }
        tracing::debug!("Platform {} ({decl}) pins {count} modules", decl.name);
    }

    Ok(constraints)
}

/// Merge `pin` into `table`, returning the override when two platforms disagree.
fn merge_pin(
    table: &mut PinTable,
    coordinate: Coordinate,
    pin: Pin,
    strategy: ConflictStrategy,
) -> miette::Result<Option<VersionConflict>> {
    let key = coordinate.key();
    let Some((_, existing)) = table.get(&key).cloned() else {
        table.insert(key, (coordinate, pin));
        return Ok(None);
    };
    if existing.platform == pin.platform {
        return Ok(None);
    }
    let existing_version = MavenVersion::parse(&existing.version);
    let new_version = MavenVersion::parse(&pin.version);
    if existing_version == new_version {
        return Ok(None);
    }

    let (kept, dropped) = match strategy {
        ConflictStrategy::Fail => {
            return Err(ManifoldError::VersionConflict {
                coordinate: coordinate.to_string(),
                versions: vec![existing.version, pin.version],
            }
            .into())
        }
        ConflictStrategy::Nearest => (existing, pin),
        ConflictStrategy::Highest if new_version > existing_version => (pin, existing),
        ConflictStrategy::Highest => (existing, pin),
    };
    let conflict = VersionConflict {
        coordinate: coordinate.clone(),
        requested: dropped.version,
        resolved: kept.version.clone(),
        reason: ConflictReason::PlatformsDisagree {
            kept: kept.platform.clone(),
            dropped: dropped.platform,
        },
    };
    table.insert(key, (coordinate, kept));
    Ok(Some(conflict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifold_maven::index::MemoryIndex;
    use manifold_maven::pom::{Pom, PomDependency};

    fn bom(artifact: &str, version: &str, managed: &[(&str, &str, &str)]) -> Pom {
        managed.iter().fold(
            Pom::new("org.example", artifact, version).with_packaging("pom"),
            |pom, (g, a, v)| pom.with_managed(PomDependency::new(g, a, Some(*v))),
        )
    }

    fn platform(name: &str, artifact: &str, version: &str, scope: Scope) -> DependencyDeclaration {
        DependencyDeclaration::platform(name, Coordinate::new("org.example", artifact), version, scope)
    }

    fn index() -> MemoryIndex {
        MemoryIndex::new()
            .with(bom("first-bom", "1.0", &[("org.lib", "a", "1.0"), ("org.lib", "b", "1.0")]))
            .with(bom("second-bom", "2.0", &[("org.lib", "b", "2.0"), ("org.lib", "c", "2.0")]))
            .with(bom("same-bom", "1.0", &[("org.lib", "a", "1.0.0")]))
    }

    #[test]
    fn collects_pins_with_their_platform() {
        let index = index();
        let mut cache = ModuleCache::new(&index);
        let mut report = ConflictReport::new();
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::Api),
            DependencyDeclaration::library("lib", Coordinate::new("org.lib", "a"), None, Scope::Api),
        ];
        let constraints =
            collect_constraints(&decls, &mut cache, ConflictStrategy::Fail, &mut report).unwrap();
        assert_eq!(constraints.len(), 2);
        let pin = constraints.pinned(&Coordinate::new("org.lib", "a")).unwrap();
        assert_eq!(pin.version, "1.0");
        assert_eq!(pin.platform, "first");
        assert!(report.is_empty());
    }

    #[test]
    fn disagreeing_platforms_fail_by_default() {
        let index = index();
        let mut cache = ModuleCache::new(&index);
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::Api),
            platform("second", "second-bom", "2.0", Scope::Api),
        ];
        let err = collect_constraints(
            &decls,
            &mut cache,
            ConflictStrategy::Fail,
            &mut ConflictReport::new(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("org.lib:b"), "got: {msg}");
        assert!(msg.contains("1.0") && msg.contains("2.0"));
    }

    #[test]
    fn equal_versions_do_not_conflict() {
        let index = index();
        let mut cache = ModuleCache::new(&index);
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::Api),
            platform("same", "same-bom", "1.0", Scope::Api),
        ];
        let mut report = ConflictReport::new();
        collect_constraints(&decls, &mut cache, ConflictStrategy::Fail, &mut report).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn nearest_keeps_first_platform_and_highest_keeps_higher() {
        let index = index();
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::Api),
            platform("second", "second-bom", "2.0", Scope::Api),
        ];
        let b = Coordinate::new("org.lib", "b");

        let mut cache = ModuleCache::new(&index);
        let mut report = ConflictReport::new();
        let nearest =
            collect_constraints(&decls, &mut cache, ConflictStrategy::Nearest, &mut report).unwrap();
        assert_eq!(nearest.pinned(&b).unwrap().version, "1.0");
        assert_eq!(report.len(), 1);

        let mut report = ConflictReport::new();
        let highest =
            collect_constraints(&decls, &mut cache, ConflictStrategy::Highest, &mut report).unwrap();
        assert_eq!(highest.pinned(&b).unwrap().version, "2.0");
        assert_eq!(highest.pinned(&b).unwrap().platform, "second");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn missing_platform_is_unresolved() {
        let index = MemoryIndex::new();
        let mut cache = ModuleCache::new(&index);
        let decls = vec![platform("ghost", "ghost-bom", "9.9", Scope::Api)];
        let err = collect_constraints(
            &decls,
            &mut cache,
            ConflictStrategy::Fail,
            &mut ConflictReport::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("org.example:ghost-bom:9.9"));
    }

    #[test]
    fn exported_pins_skip_compile_only_platforms() {
        let index = index();
        let mut cache = ModuleCache::new(&index);
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::CompileOnly),
            platform("second", "second-bom", "2.0", Scope::CompileOnlyApi),
        ];
        let constraints = collect_constraints(
            &decls,
            &mut cache,
            ConflictStrategy::Nearest,
            &mut ConflictReport::new(),
        )
        .unwrap();
        let exported: Vec<String> = constraints.exported().map(|(c, _)| c.key()).collect();
        assert_eq!(exported, ["org.lib:b", "org.lib:c"]);
        assert_eq!(constraints.pinned(&Coordinate::new("org.lib", "b")).unwrap().version, "1.0");
        let b = constraints.exported().find(|(c, _)| c.artifact == "b").unwrap().1;
        assert_eq!(b.version, "2.0");
        assert_eq!(b.platform, "second");
    }

    #[test]
    fn higher_compile_only_pin_keeps_the_exported_one() {
        let index = index();
        let mut cache = ModuleCache::new(&index);
        let decls = vec![
            platform("first", "first-bom", "1.0", Scope::Api),
            platform("second", "second-bom", "2.0", Scope::CompileOnly),
        ];
        let mut report = ConflictReport::new();
        let constraints =
            collect_constraints(&decls, &mut cache, ConflictStrategy::Highest, &mut report).unwrap();

        let b = Coordinate::new("org.lib", "b");
        assert_eq!(constraints.pinned(&b).unwrap().version, "2.0");
        let exported: Vec<(String, String)> = constraints
            .exported()
            .map(|(c, pin)| (c.key(), pin.version.clone()))
            .collect();
        assert_eq!(
            exported,
            [
                ("org.lib:a".to_string(), "1.0".to_string()),
                ("org.lib:b".to_string(), "1.0".to_string()),
            ]
        );
        assert_eq!(report.len(), 1);
    }
}
