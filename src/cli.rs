//! CLI argument parsing module for nvm-prune

use crate::domain::{KeepList, NodeVersion};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a `--keep` value, stripping a leading `v`
fn parse_keep(s: &str) -> Result<NodeVersion, String> {
    let version = NodeVersion::new(s);
    if version.is_empty() {
        return Err(format!("invalid version: '{}'", s));
    }
    Ok(version)
}

/// Prune installed Node.js versions managed by nvm
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nvm-prune",
    version,
    about = "Prune installed Node.js versions managed by nvm",
    after_help = "Do not run two instances against the same nvm installation at once."
)]
pub struct CliArgs {
    /// Show what would be uninstalled without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Uninstall candidates without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Protect a version from removal (can be specified multiple times)
    #[arg(long, value_name = "VERSION", action = ArgAction::Append, value_parser = parse_keep)]
    pub keep: Vec<NodeVersion>,

    /// Review global npm packages of the remaining versions afterwards
    #[arg(long)]
    pub review_globals: bool,

    /// Replace this binary with the latest release and exit
    #[arg(long)]
    pub update_self: bool,

    /// nvm installation directory (default: ~/.nvm)
    #[arg(long, env = "NVM_DIR", value_name = "DIR")]
    pub nvm_dir: Option<PathBuf>,

    /// Log external commands to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Builds the keep-list from the repeated --keep values
    pub fn keep_list(&self) -> KeepList {
        KeepList::new(self.keep.iter().cloned())
    }
}
