//! Uninstall workflow
//!
//! Walks the removal candidates in order, skipping versions missing on disk
//! and versions the operator declines. A failed `nvm uninstall` is recorded
//! and the loop moves on; the version stays in the remaining set.

use super::select_candidates;
use crate::domain::{FailedUninstall, KeepList, NodeVersion, UninstallOutcome, VersionSet};
use crate::output::Reporter;
use crate::prompt::Confirm;
use crate::version_manager::VersionManager;
use std::io;

/// Switches controlling the uninstall workflow
#[derive(Debug, Clone, Copy, Default)]
pub struct UninstallOptions {
    /// Report the plan without uninstalling anything
    pub dry_run: bool,
    /// Uninstall without asking for each version
    pub assume_yes: bool,
}

/// Uninstalls candidate versions through a version manager
pub struct UninstallWorkflow<'a, V: VersionManager, C: Confirm> {
    manager: &'a V,
    confirmer: &'a mut C,
    options: UninstallOptions,
}

impl<'a, V: VersionManager, C: Confirm> UninstallWorkflow<'a, V, C> {
    pub fn new(manager: &'a V, confirmer: &'a mut C, options: UninstallOptions) -> Self {
        Self {
            manager,
            confirmer,
            options,
        }
    }

    /// Run the workflow; the returned outcome's `remaining` feeds the globals review
    pub fn run(
        &mut self,
        installed: &VersionSet,
        current: Option<&NodeVersion>,
        keep: &KeepList,
        reporter: &mut Reporter,
    ) -> io::Result<UninstallOutcome> {
        let candidates = select_candidates(installed, current, keep);

        reporter.versions("Installed", installed)?;
        match current {
            Some(version) => reporter.info(&format!("Current: {}", version.tag()))?,
            None => reporter.info("Current: (unknown)")?,
        }
        if !keep.is_empty() {
            reporter.versions("Keep", keep.iter())?;
        }
        reporter.versions("Candidates", &candidates)?;

        if candidates.is_empty() {
            reporter.info("Nothing to uninstall.")?;
            return Ok(UninstallOutcome::untouched(installed, self.options.dry_run));
        }

        if self.options.dry_run {
            reporter.heading("Dry run: no versions will be uninstalled")?;
            for version in &candidates {
                reporter.info(&format!("  would uninstall {}", version.tag()))?;
            }
            return Ok(UninstallOutcome::untouched(installed, true));
        }

        let mut outcome = UninstallOutcome::untouched(installed, false);

        for version in candidates {
            let tag = version.tag();

            if !self.manager.install_dir(&version).is_dir() {
                reporter.skip(&format!("{} not present on disk, skipping", tag))?;
                outcome.missing.push(version);
                continue;
            }

            if !self.options.assume_yes
                && !self
                    .confirmer
                    .confirm(&format!("Uninstall Node {}?", tag))
            {
                reporter.skip(&format!("Skipping {}", tag))?;
                outcome.skipped.push(version);
                continue;
            }

            reporter.info(&format!("Uninstalling {}...", tag))?;
            match self.manager.uninstall(&version) {
                Ok(()) => {
                    reporter.success(&format!("Uninstalled {}", tag))?;
                    outcome.remaining.remove(&version);
                    outcome.uninstalled.push(version);
                }
                Err(e) => {
                    tracing::warn!(version = %version, error = %e, "uninstall failed");
                    reporter.failure(&format!("Failed to uninstall {}: {}", tag, e))?;
                    outcome.failed.push(FailedUninstall {
                        version,
                        message: e.to_string(),
                    });
                }
            }
        }

        reporter.uninstall_summary(&outcome)?;
        Ok(outcome)
    }
}
