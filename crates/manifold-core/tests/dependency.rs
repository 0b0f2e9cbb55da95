use manifold_core::dependency::{Coordinate, DependencyDeclaration, Exclusion, Scope};

#[test]
fn coordinate_parse_with_version() {
    let (coord, version) = Coordinate::parse("net.kyori:adventure-api:4.17.0").unwrap();
    assert_eq!(coord.group, "net.kyori");
    assert_eq!(coord.artifact, "adventure-api");
    assert_eq!(version.as_deref(), Some("4.17.0"));
}

#[test]
fn coordinate_parse_without_version() {
    let (coord, version) = Coordinate::parse("net.kyori:adventure-api").unwrap();
    assert_eq!(coord.key(), "net.kyori:adventure-api");
    assert!(version.is_none());
}

#[test]
fn coordinate_parse_rejects_malformed() {
    assert!(Coordinate::parse("").is_none());
    assert!(Coordinate::parse("just-a-name").is_none());
    assert!(Coordinate::parse("group::1.0").is_none());
    assert!(Coordinate::parse("group:artifact:version:extra").is_none());
}

#[test]
fn exclusion_by_group_matches_every_artifact() {
    let excl = Exclusion {
        group: "com.google.code.gson".to_string(),
        artifact: None,
    };
    assert!(excl.matches("com.google.code.gson", "gson"));
    assert!(excl.matches("com.google.code.gson", "gson-extras"));
    assert!(!excl.matches("com.google.guava", "guava"));
    assert_eq!(excl.to_string(), "com.google.code.gson");
}

#[test]
fn exclusion_wildcards_match_anything() {
    let every_artifact = Exclusion {
        group: "org.x".to_string(),
        artifact: Some("*".to_string()),
    };
    assert!(every_artifact.matches("org.x", "c"));
    assert!(every_artifact.matches("org.x", "d"));
    assert!(!every_artifact.matches("org.y", "c"));

    let everything = Exclusion {
        group: "*".to_string(),
        artifact: Some("*".to_string()),
    };
    assert!(everything.matches("com.google.code.gson", "gson"));
}

#[test]
fn exclusion_by_artifact_is_narrow() {
    let excl = Exclusion {
        group: "org.example".to_string(),
        artifact: Some("a".to_string()),
    };
    assert!(excl.matches("org.example", "a"));
    assert!(!excl.matches("org.example", "b"));
}

#[test]
fn scope_matrix() {
    assert!(Scope::Api.on_compile_classpath());
    assert!(Scope::Api.on_runtime_classpath());
    assert!(Scope::Api.exports_compile());

    assert!(Scope::CompileOnlyApi.on_compile_classpath());
    assert!(!Scope::CompileOnlyApi.on_runtime_classpath());
    assert!(Scope::CompileOnlyApi.exports_compile());
    assert!(!Scope::CompileOnlyApi.exports_runtime());

    assert!(!Scope::Implementation.exports_compile());
    assert!(Scope::Implementation.exports_runtime());

    assert!(!Scope::CompileOnly.exports_compile());
    assert!(!Scope::CompileOnly.on_runtime_classpath());

    assert!(!Scope::RuntimeOnly.on_compile_classpath());
    assert!(Scope::RuntimeOnly.on_runtime_classpath());
}

#[test]
fn scope_sections_follow_manifest_names() {
    let names: Vec<&str> = Scope::ALL.iter().map(|s| s.section()).collect();
    assert_eq!(
        names,
        vec!["api", "implementation", "compile-only-api", "compile-only", "runtime-only"]
    );
}

#[test]
fn declaration_excludes_and_display() {
    let decl = DependencyDeclaration::library(
        "gson-serializer",
        Coordinate::new("net.kyori", "adventure-text-serializer-gson"),
        Some("4.17.0"),
        Scope::CompileOnlyApi,
    )
    .with_exclusion(Exclusion {
        group: "com.google.code.gson".to_string(),
        artifact: None,
    });
    assert!(decl.excludes("com.google.code.gson", "gson"));
    assert!(!decl.excludes("net.kyori", "adventure-api"));
    assert!(!decl.is_platform());
    assert_eq!(decl.to_string(), "net.kyori:adventure-text-serializer-gson:4.17.0");
}

#[test]
fn platform_declaration_kind() {
    let decl = DependencyDeclaration::platform(
        "adventure-bom",
        Coordinate::new("net.kyori", "adventure-bom"),
        "4.17.0",
        Scope::Api,
    );
    assert!(decl.is_platform());
    assert_eq!(decl.version.as_deref(), Some("4.17.0"));
}
