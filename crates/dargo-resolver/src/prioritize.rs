//! Candidate ordering policy.
//!
//! The permutation search tries case index 0 first, so whatever sorts to
//! the front of each candidate list is what resolution prefers: the newest
//! version for the requested package, the closest version to the installed
//! one for packages already on the host, and the newest version for
//! everything else. Content addresses have no total order; they stay after
//! all semver candidates in their original insertion order. The `Skip`
//! sentinel sorts first: leaving an optional package uninstalled beats
//! dragging it in, and verification forces a concrete version where one is
//! actually required.

use std::cmp::Ordering;

use dargo_core::name::PackageName;
use dargo_core::state::InstalledState;
use dargo_core::version::Version;

use crate::aggregate::{Candidate, CandidateSet};

/// Reorder every candidate list so the most-preferred entry comes first.
pub fn prioritize(candidates: &mut CandidateSet, root: &PackageName, state: &InstalledState) {
    for (name, list) in candidates.iter_mut() {
        if name != root {
            if let Some(installed) = state.get(name.as_str()) {
                if installed.as_semver().is_some() {
                    sort_by_distance(list, installed);
                    continue;
                }
            }
        }
        sort_descending(list);
    }
}

/// Newest first. Stable, so content addresses keep insertion order.
fn sort_descending(list: &mut [Candidate]) {
    list.sort_by(compare_descending);
}

fn compare_descending(a: &Candidate, b: &Candidate) -> Ordering {
    match (a, b) {
        (Candidate::Pin(x), Candidate::Pin(y)) => match (x.as_semver(), y.as_semver()) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        (Candidate::Skip, Candidate::Skip) => Ordering::Equal,
        (Candidate::Skip, _) => Ordering::Less,
        (_, Candidate::Skip) => Ordering::Greater,
    }
}

/// Closest to the installed version first, minimizing churn. Ties prefer
/// the higher version.
fn sort_by_distance(list: &mut [Candidate], installed: &Version) {
    list.sort_by(|a, b| match (a, b) {
        (Candidate::Pin(x), Candidate::Pin(y)) => {
            match (x.distance(installed), y.distance(installed)) {
                (Some(dx), Some(dy)) => dx.cmp(&dy).then_with(|| compare_descending(a, b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        (Candidate::Skip, Candidate::Skip) => Ordering::Equal,
        (Candidate::Skip, _) => Ordering::Less,
        (_, Candidate::Skip) => Ordering::Greater,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn pin(s: &str) -> Candidate {
        Candidate::Pin(v(s))
    }

    fn set_of(name: &str, candidates: Vec<Candidate>) -> CandidateSet {
        let mut set = CandidateSet::new();
        set.insert(name, candidates);
        set
    }

    #[test]
    fn root_sorts_newest_first() {
        let mut set = set_of("core", vec![pin("1.0.0"), pin("2.0.0"), pin("1.5.0")]);
        prioritize(&mut set, &PackageName::from("core"), &InstalledState::new());
        assert_eq!(
            set.get("core").unwrap(),
            &[pin("2.0.0"), pin("1.5.0"), pin("1.0.0")][..]
        );
    }

    #[test]
    fn installed_package_sorts_by_distance() {
        let mut set = set_of(
            "vpn",
            vec![pin("1.0.0"), pin("2.0.0"), pin("1.1.0"), pin("1.2.0")],
        );
        let mut state = InstalledState::new();
        state.insert("vpn", v("1.1.0"));

        prioritize(&mut set, &PackageName::from("core"), &state);
        // 1.1.0 is the installed version; 1.2.0 and 1.0.0 tie on distance
        // and the higher one wins; 2.0.0 is a major step away.
        assert_eq!(
            set.get("vpn").unwrap(),
            &[pin("1.1.0"), pin("1.2.0"), pin("1.0.0"), pin("2.0.0")][..]
        );
    }

    #[test]
    fn root_ignores_installed_distance() {
        let mut set = set_of("core", vec![pin("1.0.0"), pin("2.0.0")]);
        let mut state = InstalledState::new();
        state.insert("core", v("1.0.0"));

        prioritize(&mut set, &PackageName::from("core"), &state);
        assert_eq!(set.get("core").unwrap(), &[pin("2.0.0"), pin("1.0.0")][..]);
    }

    #[test]
    fn content_addresses_sort_after_semver_in_insertion_order() {
        let mut set = set_of(
            "core",
            vec![
                pin("/ipfs/QmB"),
                pin("1.0.0"),
                pin("/ipfs/QmA"),
                pin("2.0.0"),
            ],
        );
        prioritize(&mut set, &PackageName::from("core"), &InstalledState::new());
        assert_eq!(
            set.get("core").unwrap(),
            &[pin("2.0.0"), pin("1.0.0"), pin("/ipfs/QmB"), pin("/ipfs/QmA")][..]
        );
    }

    #[test]
    fn content_address_installed_version_falls_back_to_descending() {
        let mut set = set_of("vpn", vec![pin("1.0.0"), pin("2.0.0")]);
        let mut state = InstalledState::new();
        state.insert("vpn", v("/ipfs/QmPinned"));

        prioritize(&mut set, &PackageName::from("core"), &state);
        assert_eq!(set.get("vpn").unwrap(), &[pin("2.0.0"), pin("1.0.0")][..]);
    }

    #[test]
    fn skip_sentinel_stays_first() {
        let mut set = set_of("vpn", vec![pin("1.0.0"), Candidate::Skip, pin("2.0.0")]);
        prioritize(&mut set, &PackageName::from("core"), &InstalledState::new());
        assert_eq!(
            set.get("vpn").unwrap(),
            &[Candidate::Skip, pin("2.0.0"), pin("1.0.0")][..]
        );

        let mut set = set_of("vpn", vec![pin("1.2.0"), pin("1.1.0"), Candidate::Skip]);
        let mut state = InstalledState::new();
        state.insert("vpn", v("1.1.0"));
        prioritize(&mut set, &PackageName::from("core"), &state);
        assert_eq!(
            set.get("vpn").unwrap(),
            &[Candidate::Skip, pin("1.1.0"), pin("1.2.0")][..]
        );
    }
}
