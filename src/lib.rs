//! nvm-prune - Node.js version pruning library
//!
//! This library provides the pieces behind the `nvm-prune` binary:
//! - Candidate selection and the uninstall workflow over nvm
//! - Review of global npm packages per remaining version
//! - Self-update from the release download URL

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod prompt;
pub mod self_update;
pub mod version_manager;
pub mod workflow;
