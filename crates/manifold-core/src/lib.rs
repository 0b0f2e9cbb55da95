//! Core data types for Manifold.
//!
//! This crate defines how a module's dependency manifest is represented:
//! `Manifold.toml` parsing, dependency declarations and their scopes,
//! platform (BOM) references, exclusions, version catalogs, global
//! configuration and `${env:VAR}` interpolation.
//!
//! This crate is intentionally free of package-index access; see
//! `manifold-maven` and `manifold-resolver` for that.

pub mod config;
pub mod dependency;
pub mod manifest;
pub mod properties;
pub mod version_catalog;
