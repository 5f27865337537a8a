//! Repository snapshots: what the registry knows about available packages.
//!
//! A snapshot is built by the external fetch stage and is read-only to the
//! resolution engine. Dependency ranges are kept as raw strings and parsed
//! at verification time; an unparseable range is treated as never satisfied.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DargoError;
use crate::name::PackageName;
use crate::version::Version;

/// Everything the registry knows about one published version of a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Content-address locator of the package artifact.
    pub locator: String,
    /// Declared dependencies: package name to semver range string.
    #[serde(default)]
    pub dependencies: BTreeMap<PackageName, String>,
}

impl PackageDescriptor {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn with_dependency(mut self, name: impl Into<PackageName>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }
}

/// A read-only snapshot of available package versions and their declared
/// dependencies, keyed by package name, then version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository {
    packages: BTreeMap<PackageName, BTreeMap<Version, PackageDescriptor>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published version of a package (snapshot construction).
    pub fn insert(
        &mut self,
        name: impl Into<PackageName>,
        version: Version,
        descriptor: PackageDescriptor,
    ) {
        self.packages
            .entry(name.into())
            .or_default()
            .insert(version, descriptor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// All known versions of a package, in version order.
    pub fn versions(&self, name: &str) -> Vec<&Version> {
        self.packages
            .get(name)
            .map(|versions| versions.keys().collect())
            .unwrap_or_default()
    }

    pub fn descriptor(&self, name: &str, version: &Version) -> Option<&PackageDescriptor> {
        self.packages.get(name)?.get(version)
    }

    /// Iterate all packages with their version descriptors, in name order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&PackageName, &BTreeMap<Version, PackageDescriptor>)> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Load a repository snapshot from a JSON file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DargoError::Snapshot {
            message: format!("Failed to read repository snapshot: {e}"),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DargoError::Snapshot {
                message: format!("Failed to parse repository snapshot: {e}"),
            }
            .into()
        })
    }
}
