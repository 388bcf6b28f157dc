//! Self-update
//!
//! Downloads the latest release binary and swaps it in place of the running
//! executable. Shares nothing with the pruning workflows.

mod client;

pub use client::HttpClient;

use crate::error::SelfUpdateError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where release binaries are published
pub const RELEASE_BASE_URL: &str = "https://github.com/nvm-prune/nvm-prune/releases/latest/download";

/// Release asset URL for the platform this binary was built for
pub fn release_url() -> String {
    format!(
        "{}/nvm-prune-{}-{}",
        RELEASE_BASE_URL,
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// A completed self-update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Fetch `url` and install it at `target`
pub async fn update_self(
    client: &HttpClient,
    url: &str,
    target: &Path,
) -> Result<UpdateReport, SelfUpdateError> {
    tracing::debug!(url, target = %target.display(), "downloading release");
    let payload = client.get_bytes(url).await?;
    if payload.is_empty() {
        return Err(SelfUpdateError::EmptyPayload {
            url: url.to_string(),
        });
    }

    install_binary(&payload, target)?;
    Ok(UpdateReport {
        url: url.to_string(),
        path: target.to_path_buf(),
        bytes: payload.len(),
    })
}

/// Fetch `url` and install it over the running executable
pub async fn update_running_binary(url: &str) -> Result<UpdateReport, SelfUpdateError> {
    let target = current_exe()?;
    let client = HttpClient::new()?;
    update_self(&client, url, &target).await
}

/// The running executable, with symlinks resolved
pub fn current_exe() -> Result<PathBuf, SelfUpdateError> {
    std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .map_err(|source| SelfUpdateError::CurrentExe { source })
}

/// Write `payload` next to `target`, mark it executable, and rename it over `target`
pub fn install_binary(payload: &[u8], target: &Path) -> Result<(), SelfUpdateError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut staged =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| SelfUpdateError::install(target, e))?;

    staged
        .write_all(payload)
        .and_then(|_| staged.flush())
        .map_err(|e| SelfUpdateError::install(target, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
            .map_err(|e| SelfUpdateError::install(target, e))?;
    }

    staged
        .persist(target)
        .map_err(|e| SelfUpdateError::install(target, e.error))?;
    Ok(())
}
