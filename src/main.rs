//! nvm-prune - Prune installed Node.js versions managed by nvm
//!
//! Uninstalls every installed version except the active one and those passed
//! with `--keep`, asking before each removal unless `--yes` is given, and can
//! afterwards walk the global npm packages of the versions that remain.

use clap::Parser;
use nvm_prune::cli::CliArgs;
use nvm_prune::logging::init_logging;
use nvm_prune::output::Reporter;
use nvm_prune::package_manager::Npm;
use nvm_prune::progress::Progress;
use nvm_prune::prompt::Confirmer;
use nvm_prune::self_update;
use nvm_prune::version_manager::{resolve_nvm_dir, NvmShell, VersionManager};
use nvm_prune::workflow::{GlobalsReviewWorkflow, UninstallOptions, UninstallWorkflow};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Argument errors exit with code 2 and usage on stderr
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if args.update_self {
        run_self_update().await;
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Replace the running binary; the outcome never changes the exit code
async fn run_self_update() {
    let url = self_update::release_url();
    match self_update::update_running_binary(&url).await {
        Ok(report) => println!(
            "Updated {} ({} bytes from {})",
            report.path.display(),
            report.bytes,
            report.url
        ),
        Err(e) => eprintln!("Self-update failed: {}", e),
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let nvm_dir = resolve_nvm_dir(args.nvm_dir.clone(), dirs::home_dir())?;
    let nvm = NvmShell::locate(nvm_dir)?;
    tracing::debug!(nvm_dir = %nvm.nvm_dir().display(), "located nvm");

    let mut progress = Progress::new(io::stderr().is_terminal());
    progress.spinner("Querying nvm...");
    let installed = nvm.list_installed()?;
    let current = match nvm.current() {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(error = %e, "could not determine the current version");
            None
        }
    };
    progress.finish_and_clear();

    let mut stdout = io::stdout();
    let mut reporter = Reporter::new(&mut stdout);
    let mut confirmer = Confirmer::stdio();

    let options = UninstallOptions {
        dry_run: args.dry_run,
        assume_yes: args.yes,
    };
    let outcome = UninstallWorkflow::new(&nvm, &mut confirmer, options).run(
        &installed,
        current.as_ref(),
        &args.keep_list(),
        &mut reporter,
    )?;

    if args.review_globals {
        reporter.info("")?;
        let npm = Npm::new();
        GlobalsReviewWorkflow::new(&nvm, &npm, &mut confirmer)
            .with_dry_run(args.dry_run)
            .run(&outcome.remaining, &mut reporter)?;
    }

    stdout.flush()?;

    if outcome.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
