//! Application error types using thiserror
//!
//! Each adapter has its own error enum; `main` reports them through anyhow.
//! - EnvironmentError: nvm installation cannot be located
//! - VersionManagerError: nvm commands failed
//! - PackageManagerError: npm commands failed or returned unreadable output
//! - SelfUpdateError: fetching or installing a new binary failed

use std::path::PathBuf;
use thiserror::Error;

/// Errors locating the nvm installation
#[derive(Error, Debug)]
pub enum EnvironmentError {
    /// Neither NVM_DIR nor --nvm-dir was given and the home directory is unknown
    #[error("cannot determine the home directory; set NVM_DIR")]
    HomeNotFound,

    /// The nvm directory does not exist
    #[error("nvm directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The directory exists but has no nvm.sh
    #[error("nvm.sh not found in {path}; is nvm installed?")]
    ScriptNotFound { path: PathBuf },
}

/// Errors from the version manager
#[derive(Error, Debug)]
pub enum VersionManagerError {
    /// The shell could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// nvm exited with a non-zero status
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The version has no bin directory to run tools from
    #[error("Node v{version} has no runtime at {path}")]
    RuntimeMissing { version: String, path: PathBuf },
}

/// Errors from the package manager
#[derive(Error, Debug)]
pub enum PackageManagerError {
    /// npm could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// npm exited with a non-zero status
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// npm printed something other than the expected JSON
    #[error("failed to parse output of `{command}`: {message}")]
    InvalidOutput { command: String, message: String },
}

/// Errors during self-update
#[derive(Error, Debug)]
pub enum SelfUpdateError {
    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },

    /// The download failed
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// The download timed out
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// The server answered with an empty body
    #[error("empty response from {url}")]
    EmptyPayload { url: String },

    /// The running executable could not be located
    #[error("cannot locate the running executable: {source}")]
    CurrentExe {
        #[source]
        source: std::io::Error,
    },

    /// Writing or replacing the executable failed
    #[error("failed to replace {path}: {source}")]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvironmentError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        EnvironmentError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new ScriptNotFound error
    pub fn script_not_found(path: impl Into<PathBuf>) -> Self {
        EnvironmentError::ScriptNotFound { path: path.into() }
    }
}

impl VersionManagerError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        VersionManagerError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        VersionManagerError::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}

impl PackageManagerError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        PackageManagerError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        PackageManagerError::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Creates a new InvalidOutput error
    pub fn invalid_output(command: impl Into<String>, message: impl Into<String>) -> Self {
        PackageManagerError::InvalidOutput {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl SelfUpdateError {
    /// Creates a new Network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        SelfUpdateError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Install error
    pub fn install(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SelfUpdateError::Install {
            path: path.into(),
            source,
        }
    }
}
