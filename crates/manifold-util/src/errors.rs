use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Manifold operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifoldError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (e.g. Manifold.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(
        code(manifold::manifest),
        help("Check your Manifold.toml for syntax errors")
    )]
    Manifest { message: String },

    /// No package index could locate the module, or no version was available for it.
    #[error("Unresolved coordinate {coordinate}: {reason}")]
    #[diagnostic(
        code(manifold::unresolved_coordinate),
        help("Check the coordinate spelling and that one of the configured repositories contains it")
    )]
    UnresolvedCoordinate { coordinate: String, reason: String },

    /// Two constraints disagree on a version and no platform pins it.
    #[error("Version conflict for {coordinate}: requested {}", versions.join(", "))]
    #[diagnostic(
        code(manifold::version_conflict),
        help("Declare a platform (BOM) that manages {coordinate}, or set `[resolution] conflict` to `highest` or `nearest`")
    )]
    VersionConflict {
        coordinate: String,
        versions: Vec<String>,
    },

    /// A package index returned something it could not interpret (e.g. malformed POM).
    #[error("Package index error: {message}")]
    Index { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type ManifoldResult<T> = miette::Result<T>;
