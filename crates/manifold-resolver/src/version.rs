//! Maven version parsing and ordering.
//!
//! Versions are split into items on `.`, `-` and digit/letter transitions.
//! Numbers compare numerically and rank above any qualifier. Well-known
//! qualifiers order as
//! `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`;
//! unknown qualifiers (e.g. `jre`) rank after `snapshot` but before the
//! plain release. Missing trailing items behave as `0` / release, so
//! `1.0` == `1.0.0`.

use std::cmp::Ordering;
use std::fmt;

/// A parsed Maven version with comparable items.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(u64),
    Stage(Stage),
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            items: tokenize(version).into_iter().map(classify).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_snapshot(&self) -> bool {
        self.original.ends_with("-SNAPSHOT")
    }
}

/// Whether two version strings denote the same Maven version.
pub fn same_version(a: &str, b: &str) -> bool {
    MavenVersion::parse(a) == MavenVersion::parse(b)
}

fn tokenize(version: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_digit: Option<bool> = None;
    for ch in version.trim().chars() {
        if ch == '.' || ch == '-' || ch == '_' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_digit = None;
            continue;
        }
        let is_digit = ch.is_ascii_digit();
        if prev_digit.is_some_and(|p| p != is_digit) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_digit = Some(is_digit);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn classify(token: String) -> Item {
    if let Ok(n) = token.parse::<u64>() {
        return Item::Number(n);
    }
    let stage = match token.to_ascii_lowercase().as_str() {
        "alpha" | "a" => Stage::Alpha,
        "beta" | "b" => Stage::Beta,
        "milestone" | "m" => Stage::Milestone,
        "rc" | "cr" => Stage::Rc,
        "snapshot" => Stage::Snapshot,
        "ga" | "final" | "release" => Stage::Release,
        "sp" => Stage::Sp,
        _ => return Item::Word(token.to_ascii_lowercase()),
    };
    Item::Stage(stage)
}

impl Item {
    /// How this item compares against an absent item on the other side.
    fn against_padding(&self) -> Ordering {
        match self {
            Item::Number(n) => n.cmp(&0),
            Item::Stage(stage) => stage.cmp(&Stage::Release),
            Item::Word(_) => Ordering::Less,
        }
    }

    fn against(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Number(a), Item::Number(b)) => a.cmp(b),
            (Item::Number(_), _) => Ordering::Greater,
            (_, Item::Number(_)) => Ordering::Less,
            (Item::Stage(a), Item::Stage(b)) => a.cmp(b),
            (Item::Word(a), Item::Word(b)) => a.cmp(b),
            (Item::Word(_), Item::Stage(stage)) => {
                if *stage > Stage::Snapshot {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Item::Stage(_), Item::Word(_)) => other.against(self).reverse(),
        }
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        (0..len)
            .map(|i| match (self.items.get(i), other.items.get(i)) {
                (Some(a), Some(b)) => a.against(b),
                (Some(a), None) => a.against_padding(),
                (None, Some(b)) => b.against_padding().reverse(),
                (None, None) => Ordering::Equal,
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MavenVersion {
        MavenVersion::parse(s)
    }

    #[test]
    fn numeric_ordering() {
        assert!(v("1.0") < v("2.0"));
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.1") < v("1.1.0"));
        assert!(v("2.8.0") < v("2.10.1"));
    }

    #[test]
    fn qualifier_ordering() {
        assert!(v("1.0-alpha") < v("1.0-beta"));
        assert!(v("1.0-beta") < v("1.0-M1"));
        assert!(v("1.0-M1") < v("1.0-rc"));
        assert!(v("1.0-rc") < v("1.0-SNAPSHOT"));
        assert!(v("1.0-SNAPSHOT") < v("1.0"));
        assert!(v("1.0") < v("1.0-sp"));
    }

    #[test]
    fn trailing_zeros_and_release_aliases_are_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1.0-final"), v("1.0"));
        assert!(same_version("4.17", "4.17.0"));
        assert!(!same_version("2.8.0", "2.10.1"));
    }

    #[test]
    fn unknown_qualifiers_sort_before_release() {
        assert!(v("1.0.0-jre") < v("1.0.0"));
        assert!(v("31.0-jre") < v("32.0-jre"));
        assert!(v("1.0-rc1") < v("1.0-jre"));
    }

    #[test]
    fn digit_letter_transitions_split() {
        assert_eq!(v("1.0alpha1"), v("1.0-alpha-1"));
        assert!(v("1.0-rc1") < v("1.0-rc2"));
    }

    #[test]
    fn snapshot_detection_and_display() {
        assert!(v("3.0.0-SNAPSHOT").is_snapshot());
        assert!(!v("3.0.0").is_snapshot());
        assert_eq!(v("2.22.1").to_string(), "2.22.1");
        assert_eq!(v("2.22.1").as_str(), "2.22.1");
    }
}
