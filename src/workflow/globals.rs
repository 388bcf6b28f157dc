//! Global package review
//!
//! For every remaining version, lists its global npm packages and offers each
//! one for removal. Failures are contained to the version or package they
//! occur in.

use crate::domain::{ReviewOutcome, VersionReview, VersionSet};
use crate::output::Reporter;
use crate::package_manager::{reviewable, GlobalPackageManager};
use crate::prompt::Confirm;
use crate::version_manager::VersionManager;
use std::io;

/// Reviews global packages of each remaining version
pub struct GlobalsReviewWorkflow<'a, V: VersionManager, P: GlobalPackageManager, C: Confirm> {
    manager: &'a V,
    packages: &'a P,
    confirmer: &'a mut C,
    /// List packages without prompting or removing
    dry_run: bool,
}

impl<'a, V: VersionManager, P: GlobalPackageManager, C: Confirm> GlobalsReviewWorkflow<'a, V, P, C> {
    pub fn new(manager: &'a V, packages: &'a P, confirmer: &'a mut C) -> Self {
        Self {
            manager,
            packages,
            confirmer,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&mut self, remaining: &VersionSet, reporter: &mut Reporter) -> io::Result<ReviewOutcome> {
        let mut outcome = ReviewOutcome::default();

        for version in remaining {
            let tag = version.tag();
            let mut review = VersionReview::new(version.clone());
            reporter.heading(&format!("Global packages for {}", tag))?;

            let runtime = match self.manager.activate(version) {
                Ok(runtime) => runtime,
                Err(e) => {
                    reporter.failure(&format!("Cannot switch to {}: {}", tag, e))?;
                    review.error = Some(e.to_string());
                    outcome.versions.push(review);
                    continue;
                }
            };

            let names = match self.packages.list_globals(&runtime) {
                Ok(names) => reviewable(names),
                Err(e) => {
                    tracing::warn!(version = %version, error = %e, "listing globals failed");
                    reporter.failure(&format!("Cannot list global packages for {}: {}", tag, e))?;
                    review.error = Some(e.to_string());
                    outcome.versions.push(review);
                    continue;
                }
            };

            if names.is_empty() {
                reporter.skip(&format!("No global packages for {}", tag))?;
                outcome.versions.push(review);
                continue;
            }

            reporter.list("Packages", &names)?;
            review.packages = names.clone();

            if self.dry_run {
                reporter.skip("Dry run: leaving packages in place")?;
                outcome.versions.push(review);
                continue;
            }

            for name in names {
                if !self
                    .confirmer
                    .confirm(&format!("Remove {} from {}?", name, tag))
                {
                    reporter.skip(&format!("Keeping {}", name))?;
                    review.kept.push(name);
                    continue;
                }

                match self.packages.remove_global(&runtime, &name) {
                    Ok(()) => {
                        reporter.success(&format!("Removed {}", name))?;
                        review.removed.push(name);
                    }
                    Err(e) => {
                        tracing::warn!(version = %version, package = %name, error = %e, "removal failed");
                        reporter.failure(&format!("Failed to remove {}: {}", name, e))?;
                        review.failed.push(name);
                    }
                }
            }

            outcome.versions.push(review);
        }

        reporter.review_summary(&outcome)?;
        Ok(outcome)
    }
}
