use manifold_util::errors::ManifoldError;
use miette::Diagnostic;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = ManifoldError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_manifest_error_display() {
    let err = ManifoldError::Manifest {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Manifest error: bad syntax");
}

#[test]
fn test_unresolved_coordinate_display() {
    let err = ManifoldError::UnresolvedCoordinate {
        coordinate: "net.kyori:adventure-api:4.17.0".to_string(),
        reason: "not found in any repository".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Unresolved coordinate net.kyori:adventure-api:4.17.0: not found in any repository"
    );
}

#[test]
fn test_version_conflict_display_lists_versions() {
    let err = ManifoldError::VersionConflict {
        coordinate: "com.google.code.gson:gson".to_string(),
        versions: vec!["2.10.1".to_string(), "2.8.9".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "Version conflict for com.google.code.gson:gson: requested 2.10.1, 2.8.9"
    );
}

#[test]
fn test_resolution_errors_carry_diagnostic_codes() {
    let unresolved = ManifoldError::UnresolvedCoordinate {
        coordinate: "a:b".to_string(),
        reason: "missing".to_string(),
    };
    let conflict = ManifoldError::VersionConflict {
        coordinate: "a:b".to_string(),
        versions: vec![],
    };
    assert_eq!(
        unresolved.code().map(|c| c.to_string()).as_deref(),
        Some("manifold::unresolved_coordinate")
    );
    assert_eq!(
        conflict.code().map(|c| c.to_string()).as_deref(),
        Some("manifold::version_conflict")
    );
}

#[test]
fn test_generic_error_display() {
    let err = ManifoldError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ManifoldError = io_err.into();
    assert!(matches!(err, ManifoldError::Io(_)));
}
