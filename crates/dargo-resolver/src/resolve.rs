//! Search orchestration: build the candidate space, then walk case indices
//! in priority order under a wall-clock budget.
//!
//! The engine is pure given its three inputs — request, repository snapshot,
//! installed state — and keeps no state across calls, so concurrent
//! resolutions need no synchronization. Cancellation is expressed only
//! through the budget; a failed case advances the search, it is never
//! retried.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use dargo_core::errors::DargoResult;
use dargo_core::name::PackageName;
use dargo_core::repository::Repository;
use dargo_core::request::InstallRequest;
use dargo_core::state::InstalledState;
use dargo_core::version::Version;

use crate::aggregate;
use crate::conflict::ErrorTally;
use crate::permutations::PermutationTable;
use crate::prioritize::prioritize;
use crate::verify;

/// Default wall-clock budget for one search.
pub const DEFAULT_SEARCH_BUDGET: Duration = Duration::from_secs(10);

/// Terminal outcome of one resolution call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// A consistent assignment was found.
    Resolved(InstallPlan),
    /// No assignment was found; the message explains the most likely cause.
    Unresolved(ResolutionFailure),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn plan(&self) -> Option<&InstallPlan> {
        match self {
            Self::Resolved(plan) => Some(plan),
            Self::Unresolved(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ResolutionFailure> {
        match self {
            Self::Resolved(_) => None,
            Self::Unresolved(failure) => Some(failure),
        }
    }
}

/// The successful outcome: what to install, and the slice of the installed
/// state it affects.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    /// Chosen version per affected package, sentinels removed.
    pub assignment: BTreeMap<PackageName, Version>,
    /// Installed state filtered to the packages the plan touches.
    pub state: InstalledState,
}

/// The failed outcome, with the original installed state untouched.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    /// Human-readable diagnostic: optional timeout notice, blame line, and
    /// the explored share of the space.
    pub message: String,
    pub cases_checked: u64,
    pub total_cases: u64,
    pub state: InstalledState,
}

/// Why the search ended without an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every case was checked and none satisfied all constraints.
    Exhausted,
    /// The budget elapsed before the space was exhausted.
    TimedOut,
    /// A package aggregated with zero candidate versions.
    NoCandidates,
}

/// Resolve an install request with the default search budget.
pub fn resolve_request(
    request: &InstallRequest,
    repo: &Repository,
    state: &InstalledState,
) -> Resolution {
    resolve_request_with_budget(request, repo, state, DEFAULT_SEARCH_BUDGET)
}

/// Parse and resolve a `name@request` token.
pub fn resolve_token(token: &str, repo: &Repository, state: &InstalledState) -> DargoResult<Resolution> {
    let request = InstallRequest::parse(token)?;
    Ok(resolve_request(&request, repo, state))
}

/// Resolve an install request under an explicit wall-clock budget.
pub fn resolve_request_with_budget(
    request: &InstallRequest,
    repo: &Repository,
    state: &InstalledState,
    budget: Duration,
) -> Resolution {
    let root = &request.name;

    let candidates = aggregate::collect_candidates(root, &request.request, repo);
    let state_candidates = aggregate::collect_state_candidates(&candidates, state, repo);
    let mut candidates = aggregate::merge(candidates, state_candidates);
    aggregate::prepend_skip_sentinels(&mut candidates, root, state);
    prioritize(&mut candidates, root, state);

    let empty = candidates.empty_packages();
    if !empty.is_empty() {
        let names: Vec<&str> = empty.iter().map(|name| name.as_str()).collect();
        let names = names.join(", ");
        tracing::debug!(packages = %names, "aggregation produced empty candidate lists");
        return Resolution::Unresolved(ResolutionFailure {
            kind: FailureKind::NoCandidates,
            message: format!("No candidate versions of {names} for request {request}"),
            cases_checked: 0,
            total_cases: 0,
            state: state.clone(),
        });
    }

    let table = PermutationTable::build(&candidates, root, state);
    let total_cases = table.total_cases();
    tracing::debug!(packages = table.len(), total_cases, "search space built");

    let started = Instant::now();
    let mut tally = ErrorTally::new();
    let mut timed_out = false;
    let mut case_id: u64 = 0;
    while case_id < total_cases {
        if started.elapsed() > budget {
            timed_out = true;
            break;
        }
        let assignment = table.decode(case_id);
        match verify::verify(&assignment, repo) {
            Ok(()) => {
                tracing::debug!(case_id, "consistent assignment found");
                let assignment = assignment.into_plan();
                let state = state.filtered(|name| assignment.contains_key(name.as_str()));
                return Resolution::Resolved(InstallPlan { assignment, state });
            }
            Err(reason) => tally.record(reason),
        }
        case_id += 1;
    }

    let kind = if timed_out {
        FailureKind::TimedOut
    } else {
        FailureKind::Exhausted
    };
    tracing::debug!(
        ?kind,
        cases_checked = case_id,
        total_cases,
        distinct_reasons = tally.len(),
        "search ended without an assignment"
    );

    let mut message = String::new();
    if timed_out {
        message.push_str(&format!(
            "Resolution timed out after {} ms.\n",
            budget.as_millis()
        ));
    }
    // Blame rendering is best-effort; with no tallies the case count alone
    // still tells the caller how much of the space was explored.
    if let Some(blame) = tally.blame() {
        message.push_str(&blame.to_string());
        message.push('\n');
    }
    message.push_str(&format!("Checked {case_id}/{total_cases} cases"));

    Resolution::Unresolved(ResolutionFailure {
        kind,
        message,
        cases_checked: case_id,
        total_cases,
        state: state.clone(),
    })
}
