//! Package-index collaborators: POM parsing, the [`index::PackageIndex`]
//! seam used by the resolver, Maven-layout local repositories and an
//! in-memory index.

pub mod index;
pub mod pom;
pub mod repository;
