//! Candidate aggregation: which packages may need a version change, and
//! which versions each of them could take.
//!
//! The closure walks dependency names over the union of dependency sets
//! across *all* candidate versions of each visited package, not just one.
//! Installed packages join the set through reverse reachability: anything
//! on the host whose dependency chain leads into the candidate set may need
//! its version shifted to stay compatible.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use dargo_core::name::PackageName;
use dargo_core::repository::Repository;
use dargo_core::request::VersionRequest;
use dargo_core::state::InstalledState;
use dargo_core::version::Version;

/// One selectable option for a package during search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Install (or keep) this concrete version.
    Pin(Version),
    /// Leave the package uninstalled.
    Skip,
}

impl Candidate {
    pub fn as_version(&self) -> Option<&Version> {
        match self {
            Self::Pin(version) => Some(version),
            Self::Skip => None,
        }
    }
}

/// Per-package ordered candidate lists; list order encodes preference,
/// most-preferred first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    packages: BTreeMap<PackageName, Vec<Candidate>>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<PackageName>, candidates: Vec<Candidate>) {
        self.packages.insert(name.into(), candidates);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[Candidate]> {
        self.packages.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &Vec<Candidate>)> {
        self.packages.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PackageName, &mut Vec<Candidate>)> {
        self.packages.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &PackageName> {
        self.packages.keys()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages whose candidate list ended up empty. A non-empty result is
    /// a resolution failure the orchestrator surfaces before searching.
    pub fn empty_packages(&self) -> Vec<PackageName> {
        self.packages
            .iter()
            .filter(|(_, candidates)| candidates.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Compute the closure of packages that might need installation for a root
/// request, each mapped to its candidate versions.
pub fn collect_candidates(
    name: &PackageName,
    request: &VersionRequest,
    repo: &Repository,
) -> CandidateSet {
    let mut set = CandidateSet::new();
    set.insert(name.clone(), root_candidates(name, request, repo));

    let mut queue: VecDeque<PackageName> = VecDeque::new();
    queue.push_back(name.clone());

    while let Some(pkg) = queue.pop_front() {
        let versions: Vec<Version> = set
            .get(pkg.as_str())
            .into_iter()
            .flatten()
            .filter_map(|candidate| candidate.as_version().cloned())
            .collect();

        for version in &versions {
            let Some(descriptor) = repo.descriptor(pkg.as_str(), version) else {
                continue;
            };
            for dep in descriptor.dependencies.keys() {
                if set.contains(dep.as_str()) {
                    continue;
                }
                // Unknown packages stay outside the closure; their
                // constraints belong to the environment.
                if !repo.contains(dep.as_str()) {
                    continue;
                }
                let candidates = repo
                    .versions(dep.as_str())
                    .into_iter()
                    .map(|v| Candidate::Pin(v.clone()))
                    .collect();
                set.insert(dep.clone(), candidates);
                queue.push_back(dep.clone());
            }
        }
    }

    set
}

/// The root package's candidates: every known version matching the request.
/// `latest` pins the single highest published semver version.
fn root_candidates(name: &PackageName, request: &VersionRequest, repo: &Repository) -> Vec<Candidate> {
    match request {
        VersionRequest::Latest => repo
            .versions(name.as_str())
            .into_iter()
            .filter(|v| v.as_semver().is_some())
            .max()
            .map(|v| vec![Candidate::Pin(v.clone())])
            .unwrap_or_default(),
        _ => repo
            .versions(name.as_str())
            .into_iter()
            .filter(|v| request.matches(v))
            .map(|v| Candidate::Pin(v.clone()))
            .collect(),
    }
}

/// Installed packages implicated by the candidate set: any state package
/// whose dependency chain (through the repository, at any version) reaches
/// a package already in `candidates` is added with its installed version
/// plus every version the repository knows.
pub fn collect_state_candidates(
    candidates: &CandidateSet,
    state: &InstalledState,
    repo: &Repository,
) -> CandidateSet {
    // Reverse adjacency over every version's declared dependencies.
    let mut dependents: BTreeMap<&PackageName, BTreeSet<&PackageName>> = BTreeMap::new();
    for (pkg, versions) in repo.iter() {
        for descriptor in versions.values() {
            for dep in descriptor.dependencies.keys() {
                dependents.entry(dep).or_default().insert(pkg);
            }
        }
    }

    // Walk reverse edges outward from the current candidate set.
    let mut reached: BTreeSet<&PackageName> = candidates.names().collect();
    let mut queue: VecDeque<&PackageName> = reached.iter().copied().collect();
    while let Some(pkg) = queue.pop_front() {
        let Some(parents) = dependents.get(pkg) else {
            continue;
        };
        for &parent in parents {
            if reached.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    let mut set = CandidateSet::new();
    for (name, installed) in state.iter() {
        if candidates.contains(name.as_str()) || !reached.contains(name) {
            continue;
        }
        let mut list = vec![Candidate::Pin(installed.clone())];
        for version in repo.versions(name.as_str()) {
            if version != installed {
                list.push(Candidate::Pin(version.clone()));
            }
        }
        set.insert(name.clone(), list);
    }
    set
}

/// Deduplicated per-package union: `a`'s entries keep their positions, `b`
/// contributes new packages and new trailing candidates.
pub fn merge(a: CandidateSet, b: CandidateSet) -> CandidateSet {
    let mut merged = a;
    for (name, candidates) in b.packages {
        let list = merged.packages.entry(name).or_default();
        for candidate in candidates {
            if !list.contains(&candidate) {
                list.push(candidate);
            }
        }
    }
    merged
}

/// Prepend the "leave uninstalled" sentinel to packages that are neither
/// the requested root nor currently installed. Such packages were pulled in
/// transitively and may turn out not to be required at all under some
/// requester versions; not installing them is the preferred choice, so the
/// sentinel goes first. Verification forces a concrete version whenever a
/// chosen requester actually needs one.
pub fn prepend_skip_sentinels(
    candidates: &mut CandidateSet,
    root: &PackageName,
    state: &InstalledState,
) {
    for (name, list) in candidates.iter_mut() {
        if name == root || state.contains(name.as_str()) || list.is_empty() {
            continue;
        }
        if !list.contains(&Candidate::Skip) {
            list.insert(0, Candidate::Skip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dargo_core::repository::PackageDescriptor;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn pin(s: &str) -> Candidate {
        Candidate::Pin(v(s))
    }

    /// core has two versions with different dependency sets; the closure
    /// must take the union of both.
    #[test]
    fn closure_unions_dependencies_across_versions() {
        let mut repo = Repository::new();
        repo.insert(
            "core",
            v("1.0.0"),
            PackageDescriptor::new("/ipfs/Qm1").with_dependency("vpn", "^1.0.0"),
        );
        repo.insert(
            "core",
            v("2.0.0"),
            PackageDescriptor::new("/ipfs/Qm2").with_dependency("ethchain", "^1.0.0"),
        );
        repo.insert("vpn", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm3"));
        repo.insert("ethchain", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm4"));

        let request = VersionRequest::parse("*").unwrap();
        let set = collect_candidates(&PackageName::from("core"), &request, &repo);

        assert!(set.contains("core"));
        assert!(set.contains("vpn"));
        assert!(set.contains("ethchain"));
        assert_eq!(set.get("core").unwrap().len(), 2);
    }

    #[test]
    fn root_candidates_filtered_by_request() {
        let mut repo = Repository::new();
        repo.insert("core", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm1"));
        repo.insert("core", v("1.5.0"), PackageDescriptor::new("/ipfs/Qm2"));
        repo.insert("core", v("2.0.0"), PackageDescriptor::new("/ipfs/Qm3"));

        let request = VersionRequest::parse("^1.0.0").unwrap();
        let set = collect_candidates(&PackageName::from("core"), &request, &repo);
        assert_eq!(
            set.get("core").unwrap(),
            &[pin("1.0.0"), pin("1.5.0")][..]
        );
    }

    #[test]
    fn latest_root_pins_highest_version() {
        let mut repo = Repository::new();
        repo.insert("core", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm1"));
        repo.insert("core", v("2.0.0"), PackageDescriptor::new("/ipfs/Qm2"));
        repo.insert(
            "core",
            v("/ipfs/QmPinned"),
            PackageDescriptor::new("/ipfs/QmPinned"),
        );

        let set = collect_candidates(&PackageName::from("core"), &VersionRequest::Latest, &repo);
        assert_eq!(set.get("core").unwrap(), &[pin("2.0.0")][..]);
    }

    #[test]
    fn unknown_dependency_stays_outside_closure() {
        let mut repo = Repository::new();
        repo.insert(
            "core",
            v("1.0.0"),
            PackageDescriptor::new("/ipfs/Qm1").with_dependency("external", "^1.0.0"),
        );

        let request = VersionRequest::parse("1.0.0").unwrap();
        let set = collect_candidates(&PackageName::from("core"), &request, &repo);
        assert!(set.contains("core"));
        assert!(!set.contains("external"));
    }

    #[test]
    fn state_packages_join_through_reverse_reachability() {
        // monitor (installed) -> dashboard -> vpn (candidate)
        let mut repo = Repository::new();
        repo.insert("vpn", v("2.0.0"), PackageDescriptor::new("/ipfs/Qm1"));
        repo.insert(
            "dashboard",
            v("1.0.0"),
            PackageDescriptor::new("/ipfs/Qm2").with_dependency("vpn", "^2.0.0"),
        );
        repo.insert(
            "monitor",
            v("1.0.0"),
            PackageDescriptor::new("/ipfs/Qm3").with_dependency("dashboard", "^1.0.0"),
        );
        repo.insert("monitor", v("1.1.0"), PackageDescriptor::new("/ipfs/Qm4"));
        repo.insert("unrelated", v("1.0.0"), PackageDescriptor::new("/ipfs/Qm5"));

        let mut candidates = CandidateSet::new();
        candidates.insert("vpn", vec![pin("2.0.0")]);

        let mut state = InstalledState::new();
        state.insert("monitor", v("1.0.0"));
        state.insert("unrelated", v("1.0.0"));

        let extra = collect_state_candidates(&candidates, &state, &repo);
        assert!(extra.contains("monitor"));
        assert!(!extra.contains("unrelated"));
        // Installed version first, then the other known versions.
        assert_eq!(
            extra.get("monitor").unwrap(),
            &[pin("1.0.0"), pin("1.1.0")][..]
        );
    }

    #[test]
    fn state_package_already_in_candidates_is_not_duplicated() {
        let mut repo = Repository::new();
        repo.insert("vpn", v("2.0.0"), PackageDescriptor::new("/ipfs/Qm1"));

        let mut candidates = CandidateSet::new();
        candidates.insert("vpn", vec![pin("2.0.0")]);

        let mut state = InstalledState::new();
        state.insert("vpn", v("1.0.0"));

        let extra = collect_state_candidates(&candidates, &state, &repo);
        assert!(extra.is_empty());
    }

    #[test]
    fn merge_unions_and_preserves_order() {
        let mut a = CandidateSet::new();
        a.insert("core", vec![pin("2.0.0"), pin("1.0.0")]);
        let mut b = CandidateSet::new();
        b.insert("core", vec![pin("1.0.0"), pin("3.0.0")]);
        b.insert("vpn", vec![pin("1.0.0")]);

        let merged = merge(a, b);
        assert_eq!(
            merged.get("core").unwrap(),
            &[pin("2.0.0"), pin("1.0.0"), pin("3.0.0")][..]
        );
        assert!(merged.contains("vpn"));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut a = CandidateSet::new();
        a.insert("core", vec![pin("2.0.0"), pin("1.0.0")]);
        let merged = merge(a.clone(), a.clone());
        assert_eq!(merged, a);
    }

    #[test]
    fn merge_key_sets_commute() {
        let mut a = CandidateSet::new();
        a.insert("core", vec![pin("1.0.0")]);
        let mut b = CandidateSet::new();
        b.insert("vpn", vec![pin("2.0.0")]);

        let ab = merge(a.clone(), b.clone());
        let ba = merge(b, a);
        let ab_keys: Vec<_> = ab.names().collect();
        let ba_keys: Vec<_> = ba.names().collect();
        assert_eq!(ab_keys, ba_keys);
    }

    #[test]
    fn sentinels_only_for_new_packages() {
        let mut candidates = CandidateSet::new();
        candidates.insert("core", vec![pin("1.0.0")]);
        candidates.insert("vpn", vec![pin("2.0.0")]);
        candidates.insert("monitor", vec![pin("1.0.0")]);
        candidates.insert("ghost", vec![]);

        let mut state = InstalledState::new();
        state.insert("monitor", v("1.0.0"));

        let root = PackageName::from("core");
        prepend_skip_sentinels(&mut candidates, &root, &state);

        assert_eq!(candidates.get("core").unwrap(), &[pin("1.0.0")][..]);
        assert_eq!(
            candidates.get("vpn").unwrap(),
            &[Candidate::Skip, pin("2.0.0")][..]
        );
        assert_eq!(candidates.get("monitor").unwrap(), &[pin("1.0.0")][..]);
        // An empty list must stay empty so the failure is surfaced.
        assert!(candidates.get("ghost").unwrap().is_empty());
    }
}
