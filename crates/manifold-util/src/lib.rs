//! Shared utilities for Manifold.
//!
//! This crate provides cross-cutting concerns used by the other Manifold
//! crates: the unified error type, manifest discovery on disk, and
//! Cargo-style status output.

pub mod errors;
pub mod fs;
pub mod status;
