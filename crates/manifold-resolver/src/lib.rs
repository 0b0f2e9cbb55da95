//! Dependency resolution engine: platform (BOM) constraints, breadth-first
//! traversal with per-declaration exclusions, scope propagation and
//! classpath views.

pub mod cache;
pub mod classpath;
pub mod conflict;
pub mod graph;
pub mod platform;
pub mod resolver;
pub mod version;
