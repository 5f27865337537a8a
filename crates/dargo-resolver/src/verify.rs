//! Assignment verification: does every package's declared dependency range
//! accept the version chosen for that dependency?

use std::fmt;

use dargo_core::name::PackageName;
use dargo_core::repository::Repository;
use dargo_core::version::Version;

use crate::aggregate::Candidate;
use crate::permutations::Assignment;

/// A single constraint violation: `requester`'s declared dependency on
/// `dependency` with `range` is not satisfied by the assignment under test.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConflictReason {
    pub requester: PackageName,
    pub dependency: PackageName,
    pub range: String,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requires {} {}",
            self.requester, self.dependency, self.range
        )
    }
}

/// Check one candidate assignment for internal consistency.
///
/// Iteration is name-ordered on packages and on their declared
/// dependencies, so the first violation reported for a given assignment is
/// deterministic. One reason per failed case keeps verification O(edges).
pub fn verify(assignment: &Assignment, repo: &Repository) -> Result<(), ConflictReason> {
    for (name, candidate) in assignment.iter() {
        let Candidate::Pin(version) = candidate else {
            continue;
        };
        // No descriptor means no declared dependencies; this is how a
        // "keep the installed version" choice verifies.
        let Some(descriptor) = repo.descriptor(name.as_str(), version) else {
            continue;
        };
        for (dep, range) in &descriptor.dependencies {
            // Dependencies outside the assignment are outside the closure;
            // the environment is responsible for them.
            let Some(choice) = assignment.get(dep.as_str()) else {
                continue;
            };
            if !satisfies(choice, range) {
                return Err(ConflictReason {
                    requester: name.clone(),
                    dependency: dep.clone(),
                    range: range.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Range semantics mirror request classification: a range string that
/// parses as an exact version requires equality, otherwise it is matched as
/// a semver range. An unparseable range never matches, and neither does a
/// `Skip` or content-address choice.
fn satisfies(choice: &Candidate, range: &str) -> bool {
    let Candidate::Pin(version) = choice else {
        return false;
    };
    let Version::Semver(version) = version else {
        return false;
    };
    if let Ok(exact) = semver::Version::parse(range) {
        return *version == exact;
    }
    match semver::VersionReq::parse(range) {
        Ok(req) => req.matches(version),
        Err(_) => false,
    }
}
