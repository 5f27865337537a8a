//! Installed state: which package versions are currently on the host.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DargoError;
use crate::name::PackageName;
use crate::version::Version;

/// The currently installed version of every package on the host.
///
/// Read-only input to the resolver; the success result carries a filtered
/// copy restricted to the packages the install plan touches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstalledState {
    versions: BTreeMap<PackageName, Version>,
}

impl InstalledState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<PackageName>, version: Version) {
        self.versions.insert(name.into(), version);
    }

    pub fn get(&self, name: &str) -> Option<&Version> {
        self.versions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &Version)> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// A copy keeping only the packages `keep` accepts.
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&PackageName) -> bool,
    {
        let mut versions = BTreeMap::new();
        for (name, version) in &self.versions {
            if keep(name) {
                versions.insert(name.clone(), version.clone());
            }
        }
        Self { versions }
    }

    /// Load an installed-state snapshot from a JSON file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DargoError::Snapshot {
            message: format!("Failed to read installed-state snapshot: {e}"),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DargoError::Snapshot {
                message: format!("Failed to parse installed-state snapshot: {e}"),
            }
            .into()
        })
    }
}
