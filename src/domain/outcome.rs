//! Outcome types for the uninstall and review workflows

use super::{NodeVersion, VersionSet};

/// An uninstall attempt that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUninstall {
    pub version: NodeVersion,
    pub message: String,
}

/// Result of running the uninstall workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallOutcome {
    /// Installed versions minus the ones successfully uninstalled
    pub remaining: VersionSet,
    /// Versions that were uninstalled
    pub uninstalled: Vec<NodeVersion>,
    /// Versions the operator declined to uninstall
    pub skipped: Vec<NodeVersion>,
    /// Versions listed by nvm but absent on disk
    pub missing: Vec<NodeVersion>,
    /// Uninstalls that nvm reported as failed
    pub failed: Vec<FailedUninstall>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UninstallOutcome {
    /// Creates an outcome where nothing was touched
    pub fn untouched(installed: &VersionSet, dry_run: bool) -> Self {
        Self {
            remaining: installed.clone(),
            dry_run,
            ..Self::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Per-version result of the global package review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReview {
    pub version: NodeVersion,
    /// Packages offered for removal, in listing order
    pub packages: Vec<String>,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    /// Packages whose removal failed
    pub failed: Vec<String>,
    /// Set when the version could not be activated or listed
    pub error: Option<String>,
}

impl VersionReview {
    pub fn new(version: NodeVersion) -> Self {
        Self {
            version,
            packages: Vec::new(),
            removed: Vec::new(),
            kept: Vec::new(),
            failed: Vec::new(),
            error: None,
        }
    }
}

/// Result of reviewing global packages across versions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub versions: Vec<VersionReview>,
}

impl ReviewOutcome {
    pub fn removed_count(&self) -> usize {
        self.versions.iter().map(|v| v.removed.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.versions.iter().map(|v| v.failed.len()).sum()
    }
}
