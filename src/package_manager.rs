//! Global package management through npm
//!
//! This module provides:
//! - The `GlobalPackageManager` trait the review workflow depends on
//! - `Npm`, which runs the npm binary belonging to a specific Node runtime

use crate::error::PackageManagerError;
use crate::version_manager::NodeRuntime;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::process::{Command, Output};

/// npm ships inside every Node install and is never offered for removal
pub const BOOTSTRAP_PACKAGE: &str = "npm";

/// Operations on a runtime's globally installed packages
pub trait GlobalPackageManager {
    /// List global packages of the runtime, in listing order
    fn list_globals(&self, runtime: &NodeRuntime) -> Result<Vec<String>, PackageManagerError>;

    /// Remove a global package from the runtime
    fn remove_global(&self, runtime: &NodeRuntime, name: &str) -> Result<(), PackageManagerError>;
}

/// Shape of `npm ls -g --depth=0 --json`
#[derive(Debug, Default, Deserialize)]
struct NpmLsOutput {
    #[serde(default)]
    dependencies: PackageNames,
}

/// Keys of the `dependencies` object, in the order npm printed them
#[derive(Debug, Default)]
struct PackageNames(Vec<String>);

impl<'de> Deserialize<'de> for PackageNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamesVisitor;

        impl<'de> Visitor<'de> for NamesVisitor {
            type Value = PackageNames;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of package names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut names = Vec::new();
                while let Some((name, _)) = map.next_entry::<String, IgnoredAny>()? {
                    names.push(name);
                }
                Ok(PackageNames(names))
            }
        }

        deserializer.deserialize_map(NamesVisitor)
    }
}

/// Runs the npm binary found in the runtime's bin directory
#[derive(Debug, Default)]
pub struct Npm;

impl Npm {
    /// Create a new npm runner
    pub fn new() -> Self {
        Self
    }

    /// Build an npm command whose PATH resolves `node` to the same runtime
    fn command(&self, runtime: &NodeRuntime, args: &[&str]) -> Command {
        let mut path = OsString::from(runtime.bin_dir.as_os_str());
        if let Some(existing) = std::env::var_os("PATH") {
            path.push(":");
            path.push(existing);
        }

        let mut command = Command::new(runtime.bin_dir.join("npm"));
        command.args(args).env("PATH", path);
        command
    }

    /// Run a command and capture output
    fn run_command(
        &self,
        runtime: &NodeRuntime,
        args: &[&str],
    ) -> Result<(String, Output), PackageManagerError> {
        let command_line = format!("npm {}", args.join(" "));
        tracing::debug!(command = %command_line, version = %runtime.version, "running npm");

        let output = self
            .command(runtime, args)
            .output()
            .map_err(|e| PackageManagerError::spawn(&command_line, e))?;

        tracing::debug!(command = %command_line, status = %output.status, "npm finished");
        Ok((command_line, output))
    }
}

impl GlobalPackageManager for Npm {
    fn list_globals(&self, runtime: &NodeRuntime) -> Result<Vec<String>, PackageManagerError> {
        let (command_line, output) = self.run_command(runtime, &["ls", "-g", "--depth=0", "--json"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // npm ls exits non-zero on tree problems but still prints the listing
        if stdout.trim().is_empty() {
            if output.status.success() {
                return Ok(Vec::new());
            }
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PackageManagerError::command_failed(command_line, stderr));
        }

        parse_global_listing(&stdout)
            .map_err(|e| PackageManagerError::invalid_output(command_line, e.to_string()))
    }

    fn remove_global(&self, runtime: &NodeRuntime, name: &str) -> Result<(), PackageManagerError> {
        let (command_line, output) = self.run_command(runtime, &["uninstall", "-g", name])?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(PackageManagerError::command_failed(command_line, stderr))
        }
    }
}

/// Parse npm's JSON global listing into package names
pub fn parse_global_listing(json: &str) -> Result<Vec<String>, serde_json::Error> {
    let listing: NpmLsOutput = serde_json::from_str(json)?;
    Ok(listing.dependencies.0)
}

/// Packages the operator may remove; the bootstrap package is never offered
pub fn reviewable(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| name != BOOTSTRAP_PACKAGE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeVersion;
    use std::path::Path;

    #[test]
    fn test_parse_global_listing() {
        let json = r#"{
  "name": "lib",
  "dependencies": {
    "typescript": { "version": "5.4.5" },
    "npm": { "version": "10.5.0" }
  }
}"#;
        let names = parse_global_listing(json).unwrap();
        assert_eq!(names, vec!["typescript", "npm"]);
    }

    #[test]
    fn test_reviewable_excludes_npm() {
        let names = vec!["npm".to_string(), "typescript".to_string()];
        assert_eq!(reviewable(names), vec!["typescript"]);
    }

    #[test]
    fn test_parse_global_listing_keeps_npm_order() {
        let json = r#"{"dependencies": {"yarn": {}, "eslint": {"version": "9.0.0"}, "corepack": {}}}"#;
        let names = parse_global_listing(json).unwrap();
        assert_eq!(names, vec!["yarn", "eslint", "corepack"]);
    }

    #[test]
    fn test_parse_global_listing_no_dependencies() {
        assert!(parse_global_listing("{}").unwrap().is_empty());
        assert!(parse_global_listing(r#"{"dependencies": {}}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_global_listing_invalid() {
        assert!(parse_global_listing("npm ERR! something").is_err());
    }

    #[test]
    fn test_command_prepends_bin_dir_to_path() {
        let runtime = NodeRuntime {
            version: NodeVersion::new("18.2.0"),
            bin_dir: Path::new("/nvm/versions/node/v18.2.0/bin").to_path_buf(),
        };
        let command = Npm::new().command(&runtime, &["ls"]);

        assert_eq!(
            command.get_program(),
            Path::new("/nvm/versions/node/v18.2.0/bin/npm").as_os_str()
        );
        let path = command
            .get_envs()
            .find(|(key, _)| *key == "PATH")
            .and_then(|(_, value)| value)
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(path.starts_with("/nvm/versions/node/v18.2.0/bin"));
    }

    #[test]
    fn test_list_globals_missing_npm() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runtime = NodeRuntime {
            version: NodeVersion::new("18.2.0"),
            bin_dir: temp_dir.path().to_path_buf(),
        };
        let err = Npm::new().list_globals(&runtime).unwrap_err();
        assert!(matches!(err, PackageManagerError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_and_remove_with_script() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let npm = temp_dir.path().join("npm");
        std::fs::write(
            &npm,
            r#"#!/bin/sh
if [ "$1" = "ls" ]; then
  echo '{"dependencies":{"npm":{},"typescript":{}}}'
  exit 1
fi
if [ "$3" = "typescript" ]; then exit 0; fi
echo "npm ERR! 404 $3" >&2
exit 1
"#,
        )
        .unwrap();
        std::fs::set_permissions(&npm, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runtime = NodeRuntime {
            version: NodeVersion::new("18.2.0"),
            bin_dir: temp_dir.path().to_path_buf(),
        };
        let pm = Npm::new();
        assert_eq!(pm.list_globals(&runtime).unwrap(), vec!["npm", "typescript"]);
        assert!(pm.remove_global(&runtime, "typescript").is_ok());

        let err = pm.remove_global(&runtime, "left-pad").unwrap_err();
        assert!(err.to_string().contains("404 left-pad"));
    }
}
