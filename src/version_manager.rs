//! nvm integration
//!
//! This module provides:
//! - Location of the nvm installation (`NVM_DIR`)
//! - The `VersionManager` trait the workflows depend on
//! - `NvmShell`, which runs nvm commands in a bash subprocess

use crate::domain::{NodeVersion, VersionSet};
use crate::error::{EnvironmentError, VersionManagerError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;

/// Directory name under the home directory used when NVM_DIR is unset
const DEFAULT_NVM_DIR: &str = ".nvm";

/// Script that defines the `nvm` shell function
const NVM_SCRIPT: &str = "nvm.sh";

/// Shell that sources nvm.sh
const SHELL: &str = "bash";

/// Exit status of `nvm ls` when nothing matches
const LS_NOTHING_FOUND: i32 = 3;

/// Matches installed versions in `nvm ls` output; `iojs-v*` entries are not Node
static LS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)v(\d+\.\d+\.\d+)\b").expect("valid regex"));

/// A Node.js version made addressable for running its tools
///
/// Returned by [`VersionManager::activate`]; package manager calls take this
/// instead of relying on a process-wide "current" version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRuntime {
    pub version: NodeVersion,
    /// Directory containing `node` and `npm`
    pub bin_dir: PathBuf,
}

/// Operations the workflows need from a Node version manager
pub trait VersionManager {
    /// List installed versions, ascending
    fn list_installed(&self) -> Result<VersionSet, VersionManagerError>;

    /// The active version, or None when nvm reports `none` or `system`
    fn current(&self) -> Result<Option<NodeVersion>, VersionManagerError>;

    /// On-disk installation directory for a version
    fn install_dir(&self, version: &NodeVersion) -> PathBuf;

    /// Uninstall a version
    fn uninstall(&self, version: &NodeVersion) -> Result<(), VersionManagerError>;

    /// Make a version addressable for package manager calls
    fn activate(&self, version: &NodeVersion) -> Result<NodeRuntime, VersionManagerError>;
}

/// Resolve the nvm directory from an explicit value or the home directory
pub fn resolve_nvm_dir(
    explicit: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, EnvironmentError> {
    match explicit {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
        _ => home
            .map(|h| h.join(DEFAULT_NVM_DIR))
            .ok_or(EnvironmentError::HomeNotFound),
    }
}

/// nvm driven through `bash`, sourcing `nvm.sh` for every call
#[derive(Debug, Clone)]
pub struct NvmShell {
    nvm_dir: PathBuf,
}

impl NvmShell {
    /// Locate nvm, failing when the directory or `nvm.sh` is missing
    pub fn locate(nvm_dir: impl Into<PathBuf>) -> Result<Self, EnvironmentError> {
        let nvm_dir = nvm_dir.into();
        if !nvm_dir.is_dir() {
            return Err(EnvironmentError::directory_not_found(nvm_dir));
        }
        if !nvm_dir.join(NVM_SCRIPT).is_file() {
            return Err(EnvironmentError::script_not_found(nvm_dir));
        }
        Ok(Self { nvm_dir })
    }

    pub fn nvm_dir(&self) -> &Path {
        &self.nvm_dir
    }

    /// Run `nvm <args>` and return its output whatever the exit status
    fn spawn_nvm(&self, args: &[&str]) -> Result<Output, VersionManagerError> {
        let command_line = format!("nvm {}", args.join(" "));
        tracing::debug!(command = %command_line, nvm_dir = %self.nvm_dir.display(), "running nvm");

        // Arguments are passed positionally so they never go through shell parsing
        let output = Command::new(SHELL)
            .arg("-c")
            .arg(r#". "$NVM_DIR/nvm.sh" --no-use >/dev/null 2>&1; nvm "$@""#)
            .arg("nvm-prune")
            .args(args)
            .env("NVM_DIR", &self.nvm_dir)
            .output()
            .map_err(|e| VersionManagerError::spawn(&command_line, e))?;

        tracing::debug!(command = %command_line, status = %output.status, "nvm finished");
        Ok(output)
    }

    /// Run `nvm <args>` and return its output, failing on non-zero exit
    fn run_nvm(&self, args: &[&str]) -> Result<Output, VersionManagerError> {
        let output = self.spawn_nvm(args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(command_failed(args, &output))
        }
    }
}

fn command_failed(args: &[&str], output: &Output) -> VersionManagerError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let message = if stderr.is_empty() { stdout } else { stderr };
    VersionManagerError::command_failed(format!("nvm {}", args.join(" ")), message)
}

impl VersionManager for NvmShell {
    fn list_installed(&self) -> Result<VersionSet, VersionManagerError> {
        let args = ["ls", "--no-colors", "--no-alias"];
        let output = self.spawn_nvm(&args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // With no versions and no system node, nvm prints N/A and exits 3
        let nothing_installed =
            output.status.code() == Some(LS_NOTHING_FOUND) && stdout.contains("N/A");
        if output.status.success() || nothing_installed {
            Ok(parse_ls_output(&stdout))
        } else {
            Err(command_failed(&args, &output))
        }
    }

    fn current(&self) -> Result<Option<NodeVersion>, VersionManagerError> {
        let output = self.run_nvm(&["current"])?;
        Ok(parse_current_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn install_dir(&self, version: &NodeVersion) -> PathBuf {
        self.nvm_dir
            .join("versions")
            .join("node")
            .join(version.tag())
    }

    fn uninstall(&self, version: &NodeVersion) -> Result<(), VersionManagerError> {
        let tag = version.tag();
        self.run_nvm(&["uninstall", tag.as_str()]).map(|_| ())
    }

    fn activate(&self, version: &NodeVersion) -> Result<NodeRuntime, VersionManagerError> {
        let bin_dir = self.install_dir(version).join("bin");
        if !bin_dir.is_dir() {
            return Err(VersionManagerError::RuntimeMissing {
                version: version.to_string(),
                path: bin_dir,
            });
        }
        Ok(NodeRuntime {
            version: version.clone(),
            bin_dir,
        })
    }
}

/// Extract installed versions from `nvm ls` output
///
/// Lines marked `N/A` refer to aliases of versions that are not installed.
pub fn parse_ls_output(output: &str) -> VersionSet {
    output
        .lines()
        .filter(|line| !line.contains("N/A"))
        .flat_map(|line| {
            LS_VERSION
                .captures_iter(line)
                .map(|caps| NodeVersion::new(&caps[1]))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Parse `nvm current`; `none`, `system` and blank output mean no version
pub fn parse_current_output(output: &str) -> Option<NodeVersion> {
    let trimmed = output.trim();
    let rest = trimmed.strip_prefix('v')?;
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        Some(NodeVersion::new(trimmed))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_ls_output() {
        let output = "\
->     v18.2.0 *
       v14.2.1 *
       v16.3.0
         system
";
        let versions = parse_ls_output(output);
        let listed: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(listed, vec!["14.2.1", "16.3.0", "18.2.0"]);
    }

    #[test]
    fn test_parse_ls_output_ignores_missing_aliases() {
        let output = "\
       v16.3.0
default -> 16 (-> v16.3.0)
lts/hydrogen -> v18.20.4 (-> N/A)
";
        let versions = parse_ls_output(output);
        assert_eq!(versions.len(), 1);
        assert!(versions.contains(&NodeVersion::new("16.3.0")));
    }

    #[test]
    fn test_parse_ls_output_skips_iojs() {
        let output = "\
       iojs-v3.3.1
       v16.3.0
";
        let versions = parse_ls_output(output);
        let listed: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(listed, vec!["16.3.0"]);
    }

    #[test]
    fn test_parse_ls_output_empty() {
        assert!(parse_ls_output("").is_empty());
        assert!(parse_ls_output("N/A\n").is_empty());
    }

    #[test]
    fn test_parse_current_output() {
        assert_eq!(
            parse_current_output("v18.2.0\n"),
            Some(NodeVersion::new("18.2.0"))
        );
        assert_eq!(parse_current_output("none\n"), None);
        assert_eq!(parse_current_output("system"), None);
        assert_eq!(parse_current_output(""), None);
    }

    #[test]
    fn test_resolve_nvm_dir_explicit() {
        let dir = resolve_nvm_dir(Some(PathBuf::from("/opt/nvm")), None).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/nvm"));
    }

    #[test]
    fn test_resolve_nvm_dir_default() {
        let dir = resolve_nvm_dir(None, Some(PathBuf::from("/home/dev"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/dev/.nvm"));

        let dir = resolve_nvm_dir(Some(PathBuf::new()), Some(PathBuf::from("/home/dev"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/dev/.nvm"));
    }

    #[test]
    fn test_resolve_nvm_dir_no_home() {
        let err = resolve_nvm_dir(None, None).unwrap_err();
        assert!(matches!(err, EnvironmentError::HomeNotFound));
    }

    #[test]
    fn test_locate_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = NvmShell::locate(temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, EnvironmentError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_locate_missing_script() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = NvmShell::locate(temp_dir.path()).unwrap_err();
        assert!(matches!(err, EnvironmentError::ScriptNotFound { .. }));
    }

    #[test]
    fn test_install_dir_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("nvm.sh"), "").unwrap();

        let nvm = NvmShell::locate(temp_dir.path()).unwrap();
        assert_eq!(
            nvm.install_dir(&NodeVersion::new("16.3.0")),
            temp_dir.path().join("versions/node/v16.3.0")
        );
    }

    #[test]
    fn test_activate_requires_bin_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("nvm.sh"), "").unwrap();
        let nvm = NvmShell::locate(temp_dir.path()).unwrap();
        let version = NodeVersion::new("18.2.0");

        let err = nvm.activate(&version).unwrap_err();
        assert!(matches!(err, VersionManagerError::RuntimeMissing { .. }));

        fs::create_dir_all(temp_dir.path().join("versions/node/v18.2.0/bin")).unwrap();
        let runtime = nvm.activate(&version).unwrap();
        assert_eq!(runtime.version, version);
        assert!(runtime.bin_dir.ends_with("v18.2.0/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nvm_shell_runs_sourced_function() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = r#"
nvm() {
  case "$1" in
    ls) printf '       v14.2.1\n->     v18.2.0\n' ;;
    current) echo v18.2.0 ;;
    uninstall) echo "cannot uninstall $2" >&2; return 3 ;;
  esac
}
"#;
        fs::write(temp_dir.path().join("nvm.sh"), script).unwrap();
        let nvm = NvmShell::locate(temp_dir.path()).unwrap();

        let installed = nvm.list_installed().unwrap();
        assert_eq!(installed.len(), 2);
        assert_eq!(nvm.current().unwrap(), Some(NodeVersion::new("18.2.0")));

        let err = nvm.uninstall(&NodeVersion::new("14.2.1")).unwrap_err();
        assert!(err.to_string().contains("cannot uninstall v14.2.1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_installed_accepts_empty_listing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = r#"
nvm() {
  case "$1" in
    ls) echo "            N/A"; return 3 ;;
  esac
}
"#;
        fs::write(temp_dir.path().join("nvm.sh"), script).unwrap();
        let nvm = NvmShell::locate(temp_dir.path()).unwrap();

        assert!(nvm.list_installed().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_list_installed_other_failures_are_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = r#"
nvm() {
  echo "nvm is broken" >&2
  return 3
}
"#;
        fs::write(temp_dir.path().join("nvm.sh"), script).unwrap();
        let nvm = NvmShell::locate(temp_dir.path()).unwrap();

        let err = nvm.list_installed().unwrap_err();
        assert!(err.to_string().contains("nvm is broken"));
    }
}
