//! Mixed-radix enumeration of the candidate assignment space.
//!
//! The cartesian product of candidate lists is never materialized; a flat
//! case index decodes into one full assignment via positional arithmetic.
//! Entries are ordered by significance — root first, then installed
//! packages, then the rest — and the stride of an entry is the product of
//! the list lengths of everything after it. Incrementing the case index
//! therefore steps the least-significant (last) entry first, which combined
//! with the prioritizer's list ordering makes low indices keep high-priority
//! packages at their most-preferred candidate.

use std::collections::BTreeMap;

use dargo_core::name::PackageName;
use dargo_core::state::InstalledState;
use dargo_core::version::Version;

use crate::aggregate::{Candidate, CandidateSet};

/// One package's slot in the mixed-radix table.
#[derive(Debug, Clone)]
struct TableEntry {
    name: PackageName,
    candidates: Vec<Candidate>,
    /// Product of the candidate-list lengths of all entries after this one.
    stride: u64,
}

/// Index table over the cartesian product of candidate lists.
#[derive(Debug, Clone)]
pub struct PermutationTable {
    entries: Vec<TableEntry>,
    total_cases: u64,
}

impl PermutationTable {
    /// Build the table from prioritized candidates. The product saturates
    /// at `u64::MAX`; the search is wall-clock bounded long before that.
    pub fn build(candidates: &CandidateSet, root: &PackageName, state: &InstalledState) -> Self {
        let mut ordered: Vec<(&PackageName, &Vec<Candidate>)> = Vec::new();
        for (name, list) in candidates.iter() {
            if name == root {
                ordered.push((name, list));
            }
        }
        for (name, list) in candidates.iter() {
            if name != root && state.contains(name.as_str()) {
                ordered.push((name, list));
            }
        }
        for (name, list) in candidates.iter() {
            if name != root && !state.contains(name.as_str()) {
                ordered.push((name, list));
            }
        }

        let mut entries: Vec<TableEntry> = ordered
            .into_iter()
            .map(|(name, list)| TableEntry {
                name: name.clone(),
                candidates: list.clone(),
                stride: 1,
            })
            .collect();

        let mut stride: u64 = 1;
        for entry in entries.iter_mut().rev() {
            entry.stride = stride;
            stride = stride.saturating_mul(entry.candidates.len() as u64);
        }

        Self {
            entries,
            total_cases: stride,
        }
    }

    /// Number of distinct full assignments.
    pub fn total_cases(&self) -> u64 {
        self.total_cases
    }

    /// Number of packages in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a flat case index into a full package→candidate assignment.
    ///
    /// Pure function of `case_id`; no state is carried between calls, so a
    /// driver may skip, resume, or partition index ranges freely.
    pub fn decode(&self, case_id: u64) -> Assignment {
        let mut choices = BTreeMap::new();
        for entry in &self.entries {
            let len = entry.candidates.len() as u64;
            // A zero-length list zeroes every earlier stride; such spaces
            // are rejected before any search starts.
            if len == 0 || entry.stride == 0 {
                continue;
            }
            let index = ((case_id / entry.stride) % len) as usize;
            choices.insert(entry.name.clone(), entry.candidates[index].clone());
        }
        Assignment { choices }
    }
}

/// One full selection of a candidate per package.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    choices: BTreeMap<PackageName, Candidate>,
}

impl Assignment {
    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.choices.get(name)
    }

    /// Iterate choices in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &Candidate)> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Drop `Skip` entries, leaving the concrete install plan.
    pub fn into_plan(self) -> BTreeMap<PackageName, Version> {
        self.choices
            .into_iter()
            .filter_map(|(name, candidate)| match candidate {
                Candidate::Pin(version) => Some((name, version)),
                Candidate::Skip => None,
            })
            .collect()
    }
}
