//! Operator-facing status output
//!
//! This module provides:
//! - `Reporter`, a colored line writer used by both workflows
//! - Summary lines for uninstall and review outcomes

use crate::domain::{NodeVersion, ReviewOutcome, UninstallOutcome};
use colored::Colorize;
use std::io::{self, Write};

/// Writes status lines to an output stream
pub struct Reporter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> Reporter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// Plain informational line
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// Section heading
    pub fn heading(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message.bold())
    }

    /// Completed action
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "✓".green(), message)
    }

    /// Something was skipped or left alone
    pub fn skip(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "-".dimmed(), message)
    }

    /// Recovered failure
    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "✗".red(), message)
    }

    /// `label: a, b, c`, or `label: (none)` when empty
    pub fn list<T: AsRef<str>>(&mut self, label: &str, items: &[T]) -> io::Result<()> {
        if items.is_empty() {
            return writeln!(self.out, "{}: {}", label, "(none)".dimmed());
        }
        let joined = items
            .iter()
            .map(|item| item.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "{}: {}", label, joined)
    }

    /// Version list rendered with nvm's `v` prefix
    pub fn versions<'v, I>(&mut self, label: &str, versions: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'v NodeVersion>,
    {
        let tags: Vec<String> = versions.into_iter().map(|v| v.tag()).collect();
        self.list(label, &tags)
    }

    /// One-line totals for the uninstall workflow
    pub fn uninstall_summary(&mut self, outcome: &UninstallOutcome) -> io::Result<()> {
        let line = format!(
            "Summary: {} uninstalled, {} skipped, {} not present, {} failed",
            outcome.uninstalled.len(),
            outcome.skipped.len(),
            outcome.missing.len(),
            outcome.failed.len()
        );
        if outcome.has_failures() {
            writeln!(self.out, "{}", line.yellow())
        } else {
            writeln!(self.out, "{}", line)
        }
    }

    /// One-line totals for the global package review
    pub fn review_summary(&mut self, outcome: &ReviewOutcome) -> io::Result<()> {
        writeln!(
            self.out,
            "Reviewed {} version(s): {} package(s) removed, {} removal(s) failed",
            outcome.versions.len(),
            outcome.removed_count(),
            outcome.failed_count()
        )
    }
}
