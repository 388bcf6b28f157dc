//! Pruning workflows
//!
//! This module provides:
//! - Candidate selection from the installed versions
//! - The confirmation-driven uninstall loop
//! - The per-version global package review

mod globals;
mod selector;
mod uninstall;

#[cfg(test)]
pub(crate) mod mock;

pub use globals::GlobalsReviewWorkflow;
pub use selector::{is_protected, select_candidates};
pub use uninstall::{UninstallOptions, UninstallWorkflow};
