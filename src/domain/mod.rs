//! Core domain models for nvm-prune
//!
//! This module contains the fundamental types used throughout the application:
//! - Normalized Node.js versions and the installed version set
//! - The operator's keep-list
//! - Workflow outcomes

mod outcome;
mod version;

pub use outcome::{FailedUninstall, ReviewOutcome, UninstallOutcome, VersionReview};
pub use version::{KeepList, NodeVersion, VersionSet};
