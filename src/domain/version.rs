//! Node.js version types
//!
//! Provides the normalized version string used throughout the tool and the
//! ordered, de-duplicated set built from nvm's listing.

use std::cmp::Ordering;
use std::fmt;

/// A Node.js version, normalized without a leading `v`
///
/// Equality is exact string match after normalization, so `v18.2.0` and
/// `18.2.0` are the same version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeVersion(String);

impl NodeVersion {
    /// Creates a version from raw input, trimming whitespace and one leading `v`/`V`
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let normalized = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        Self(normalized.to_string())
    }

    /// Returns the normalized version string (no prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `v`-prefixed form used by nvm and its directory layout
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }

    /// Returns true if the normalized string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.0).ok()
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Ord for NodeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.semver(), other.semver()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for NodeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ascending, de-duplicated set of installed versions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<NodeVersion>,
}

impl VersionSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the version is in the set
    pub fn contains(&self, version: &NodeVersion) -> bool {
        self.versions.binary_search(version).is_ok()
    }

    /// Removes a version, returning whether it was present
    pub fn remove(&mut self, version: &NodeVersion) -> bool {
        match self.versions.binary_search(version) {
            Ok(index) => {
                self.versions.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Iterates versions in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, NodeVersion> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<NodeVersion> for VersionSet {
    fn from_iter<I: IntoIterator<Item = NodeVersion>>(iter: I) -> Self {
        let mut versions: Vec<NodeVersion> = iter.into_iter().filter(|v| !v.is_empty()).collect();
        versions.sort();
        versions.dedup();
        Self { versions }
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a NodeVersion;
    type IntoIter = std::slice::Iter<'a, NodeVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

/// Versions explicitly protected from removal by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepList {
    versions: Vec<NodeVersion>,
}

impl KeepList {
    pub fn new(versions: impl IntoIterator<Item = NodeVersion>) -> Self {
        let mut keep = Self::default();
        for version in versions {
            if !keep.versions.contains(&version) {
                keep.versions.push(version);
            }
        }
        keep
    }

    pub fn contains(&self, version: &NodeVersion) -> bool {
        self.versions.contains(version)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeVersion> {
        self.versions.iter()
    }
}
