//! Version set resolution: translating one package's version request into
//! the concrete set of candidate versions and their artifact locators.
//!
//! This runs at the fetch boundary, upstream of the search; a request that
//! matches none of the recognized forms aborts resolution before any search
//! begins.

use std::collections::BTreeMap;

use dargo_core::errors::DargoError;
use dargo_core::repository::Repository;
use dargo_core::request::VersionRequest;
use dargo_core::version::Version;

/// A source of published versions and artifact locators, as seen by the
/// fetch stage. A trait seam keeps the engine free of transport concerns;
/// a [`Repository`] snapshot is itself a source.
pub trait VersionSource {
    /// All published versions of a package, in version order.
    fn published_versions(&self, name: &str) -> Vec<Version>;

    /// Locator for one published version, if known.
    fn locator(&self, name: &str, version: &Version) -> Option<String>;
}

impl VersionSource for Repository {
    fn published_versions(&self, name: &str) -> Vec<Version> {
        self.versions(name).into_iter().cloned().collect()
    }

    fn locator(&self, name: &str, version: &Version) -> Option<String> {
        self.descriptor(name, version)
            .map(|descriptor| descriptor.locator.clone())
    }
}

/// Resolve a raw version request into a version → locator map.
///
/// Policy, first match wins: an exact version maps alone; a range maps
/// every published version satisfying it; a content-address literal maps to
/// itself with no lookup; `latest` maps the single highest published
/// version.
pub fn resolve_version_set<S: VersionSource>(
    source: &S,
    name: &str,
    raw_request: &str,
) -> Result<BTreeMap<Version, String>, DargoError> {
    let Some(request) = VersionRequest::parse(raw_request) else {
        return Err(DargoError::UnknownVersionRequest {
            name: name.to_string(),
            request: raw_request.to_string(),
        });
    };

    let mut set = BTreeMap::new();
    match request {
        VersionRequest::Exact(exact) => {
            let version = Version::Semver(exact);
            let locator =
                source
                    .locator(name, &version)
                    .ok_or_else(|| DargoError::UnknownVersion {
                        name: name.to_string(),
                        version: version.to_string(),
                    })?;
            set.insert(version, locator);
        }
        VersionRequest::Range(req) => {
            for version in source.published_versions(name) {
                let Some(semver) = version.as_semver() else {
                    continue;
                };
                if !req.matches(semver) {
                    continue;
                }
                if let Some(locator) = source.locator(name, &version) {
                    set.insert(version, locator);
                }
            }
        }
        VersionRequest::ContentAddress(addr) => {
            // The literal is simultaneously the version key and the locator.
            set.insert(Version::ContentAddress(addr.clone()), addr);
        }
        VersionRequest::Latest => {
            let latest = source
                .published_versions(name)
                .into_iter()
                .filter(|v| v.as_semver().is_some())
                .max()
                .ok_or_else(|| DargoError::NoPublishedVersions {
                    name: name.to_string(),
                })?;
            let locator =
                source
                    .locator(name, &latest)
                    .ok_or_else(|| DargoError::UnknownVersion {
                        name: name.to_string(),
                        version: latest.to_string(),
                    })?;
            set.insert(latest, locator);
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dargo_core::repository::PackageDescriptor;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn sample_repo() -> Repository {
        let mut repo = Repository::new();
        repo.insert("core", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm100"));
        repo.insert("core", v("1.1.0"), PackageDescriptor::new("/ipfs/Qm110"));
        repo.insert("core", v("2.0.0"), PackageDescriptor::new("/ipfs/Qm200"));
        repo
    }

    #[test]
    fn exact_request_returns_single_entry() {
        let repo = sample_repo();
        let set = resolve_version_set(&repo, "core", "1.1.0").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&v("1.1.0")).map(String::as_str), Some("/ipfs/Qm110"));
    }

    #[test]
    fn exact_request_for_unpublished_version_fails() {
        let repo = sample_repo();
        let err = resolve_version_set(&repo, "core", "9.9.9").unwrap_err();
        assert!(matches!(err, DargoError::UnknownVersion { .. }));
    }

    #[test]
    fn range_request_is_sound_and_complete() {
        let repo = sample_repo();
        let set = resolve_version_set(&repo, "core", "^1.0.0").unwrap();
        let versions: Vec<String> = set.keys().map(Version::to_string).collect();
        assert_eq!(versions, ["1.0.0", "1.1.0"]);
    }

    #[test]
    fn content_address_request_maps_to_itself() {
        let repo = sample_repo();
        let set = resolve_version_set(&repo, "core", "/ipfs/QmPinned").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(&v("/ipfs/QmPinned")).map(String::as_str),
            Some("/ipfs/QmPinned")
        );
    }

    #[test]
    fn latest_request_picks_highest_version() {
        let repo = sample_repo();
        let set = resolve_version_set(&repo, "core", "latest").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&v("2.0.0")).map(String::as_str), Some("/ipfs/Qm200"));
    }

    #[test]
    fn latest_request_without_published_versions_fails() {
        let repo = Repository::new();
        let err = resolve_version_set(&repo, "ghost", "latest").unwrap_err();
        assert!(matches!(err, DargoError::NoPublishedVersions { .. }));
    }

    #[test]
    fn unknown_request_form_fails() {
        let repo = sample_repo();
        let err = resolve_version_set(&repo, "core", "newest").unwrap_err();
        assert!(matches!(err, DargoError::UnknownVersionRequest { .. }));
    }
}
