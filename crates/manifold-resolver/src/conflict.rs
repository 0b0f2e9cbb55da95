//! Version conflict reporting.

use std::fmt;

use manifold_core::dependency::Coordinate;

/// A report of every version request that did not win.
#[derive(Debug, Default, Clone)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single artifact requested at a version other than the one resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub coordinate: Coordinate,
    pub requested: String,
    pub resolved: String,
    pub reason: ConflictReason,
}

/// Why the resolved version won over the requested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// A platform constraint fixed the version.
    PinnedByPlatform(String),
    /// Two platforms pinned different versions; the kept one won.
    PlatformsDisagree { kept: String, dropped: String },
    /// The request closest to the root won.
    Nearest,
    /// The highest requested version won.
    Highest,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conflict; an identical entry is only kept once.
    pub fn add(&mut self, conflict: VersionConflict) {
        if !self.conflicts.contains(&conflict) {
            self.conflicts.push(conflict);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Conflicts recorded for one `group:artifact`.
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a VersionConflict> {
        self.conflicts.iter().filter(move |c| c.coordinate.key() == key)
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::PinnedByPlatform(platform) => write!(f, "pinned by platform {platform}"),
            ConflictReason::PlatformsDisagree { kept, dropped } => {
                write!(f, "platform {kept} overrides platform {dropped}")
            }
            ConflictReason::Nearest => write!(f, "nearest wins"),
            ConflictReason::Highest => write!(f, "highest wins"),
        }
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {} requested {} but resolved {} ({})",
                c.coordinate, c.requested, c.resolved, c.reason
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.coordinate, self.requested, self.resolved, self.reason
        )
    }
}
