//! In-memory collaborators for workflow tests

use crate::domain::{NodeVersion, VersionSet};
use crate::error::{PackageManagerError, VersionManagerError};
use crate::package_manager::GlobalPackageManager;
use crate::prompt::Confirm;
use crate::version_manager::{NodeRuntime, VersionManager};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

/// Version manager backed by a temp directory holding one folder per version
pub struct MockVersionManager {
    root: tempfile::TempDir,
    installed: VersionSet,
    failing: HashSet<NodeVersion>,
    uninstalls: RefCell<Vec<NodeVersion>>,
    activations: RefCell<Vec<NodeVersion>>,
}

impl MockVersionManager {
    pub fn new(versions: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let installed: VersionSet = versions.iter().map(|v| NodeVersion::new(v)).collect();
        for version in &installed {
            std::fs::create_dir_all(root.path().join(version.tag()).join("bin")).unwrap();
        }
        Self {
            root,
            installed,
            failing: HashSet::new(),
            uninstalls: RefCell::new(Vec::new()),
            activations: RefCell::new(Vec::new()),
        }
    }

    /// Remove the on-disk directory while keeping the version listed
    pub fn without_dir(self, version: &str) -> Self {
        let dir = self.root.path().join(NodeVersion::new(version).tag());
        std::fs::remove_dir_all(dir).unwrap();
        self
    }

    /// Make uninstalling this version fail
    pub fn failing(mut self, version: &str) -> Self {
        self.failing.insert(NodeVersion::new(version));
        self
    }

    pub fn installed(&self) -> VersionSet {
        self.installed.clone()
    }

    pub fn uninstall_calls(&self) -> Vec<NodeVersion> {
        self.uninstalls.borrow().clone()
    }

    pub fn activations(&self) -> Vec<NodeVersion> {
        self.activations.borrow().clone()
    }
}

impl VersionManager for MockVersionManager {
    fn list_installed(&self) -> Result<VersionSet, VersionManagerError> {
        Ok(self.installed.clone())
    }

    fn current(&self) -> Result<Option<NodeVersion>, VersionManagerError> {
        Ok(None)
    }

    fn install_dir(&self, version: &NodeVersion) -> PathBuf {
        self.root.path().join(version.tag())
    }

    fn uninstall(&self, version: &NodeVersion) -> Result<(), VersionManagerError> {
        self.uninstalls.borrow_mut().push(version.clone());
        if self.failing.contains(version) {
            return Err(VersionManagerError::command_failed(
                format!("nvm uninstall {}", version.tag()),
                "mock failure",
            ));
        }
        Ok(())
    }

    fn activate(&self, version: &NodeVersion) -> Result<NodeRuntime, VersionManagerError> {
        let bin_dir = self.install_dir(version).join("bin");
        if !bin_dir.is_dir() {
            return Err(VersionManagerError::RuntimeMissing {
                version: version.to_string(),
                path: bin_dir,
            });
        }
        self.activations.borrow_mut().push(version.clone());
        Ok(NodeRuntime {
            version: version.clone(),
            bin_dir,
        })
    }
}

/// Package manager with canned listings per version
#[derive(Default)]
pub struct MockPackageManager {
    listings: HashMap<NodeVersion, Vec<String>>,
    failing_listings: HashSet<NodeVersion>,
    failing_removals: HashSet<String>,
    removals: RefCell<Vec<(NodeVersion, String)>>,
}

impl MockPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, version: &str, names: &[&str]) -> Self {
        self.listings.insert(
            NodeVersion::new(version),
            names.iter().map(|n| n.to_string()).collect(),
        );
        self
    }

    pub fn failing_listing(mut self, version: &str) -> Self {
        self.failing_listings.insert(NodeVersion::new(version));
        self
    }

    pub fn failing_removal(mut self, name: &str) -> Self {
        self.failing_removals.insert(name.to_string());
        self
    }

    pub fn removals(&self) -> Vec<(NodeVersion, String)> {
        self.removals.borrow().clone()
    }
}

impl GlobalPackageManager for MockPackageManager {
    fn list_globals(&self, runtime: &NodeRuntime) -> Result<Vec<String>, PackageManagerError> {
        if self.failing_listings.contains(&runtime.version) {
            return Err(PackageManagerError::invalid_output(
                "npm ls -g --depth=0 --json",
                "mock failure",
            ));
        }
        Ok(self
            .listings
            .get(&runtime.version)
            .cloned()
            .unwrap_or_default())
    }

    fn remove_global(&self, runtime: &NodeRuntime, name: &str) -> Result<(), PackageManagerError> {
        if self.failing_removals.contains(name) {
            return Err(PackageManagerError::command_failed(
                format!("npm uninstall -g {}", name),
                "mock failure",
            ));
        }
        self.removals
            .borrow_mut()
            .push((runtime.version.clone(), name.to_string()));
        Ok(())
    }
}

/// Confirmer answering from a fixed script, recording every prompt
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
    pub prompts: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            prompts: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}
