//! Candidate selection
//!
//! A version is protected when it is the active version or on the keep-list.
//! Everything else installed is a removal candidate.

use crate::domain::{KeepList, NodeVersion, VersionSet};

/// Returns true if the version must not be removed
pub fn is_protected(version: &NodeVersion, current: Option<&NodeVersion>, keep: &KeepList) -> bool {
    current.is_some_and(|c| c == version) || keep.contains(version)
}

/// Installed versions minus the current version and the keep-list, in installed order
pub fn select_candidates(
    installed: &VersionSet,
    current: Option<&NodeVersion>,
    keep: &KeepList,
) -> Vec<NodeVersion> {
    installed
        .iter()
        .filter(|v| !is_protected(v, current, keep))
        .cloned()
        .collect()
}
