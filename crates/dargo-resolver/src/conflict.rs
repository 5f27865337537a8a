//! Conflict tallying and blame attribution for failed searches.

use std::collections::BTreeMap;
use std::fmt;

use dargo_core::name::PackageName;

use crate::verify::ConflictReason;

/// Occurrence counts of every distinct conflict reason seen across the
/// failed cases of one search.
#[derive(Debug, Default)]
pub struct ErrorTally {
    counts: BTreeMap<ConflictReason, u64>,
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: ConflictReason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    /// Number of distinct reasons recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total failures recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The dependency package most often implicated, with the distinct
    /// requesters that conflicted on it. Counts aggregate over all ranges
    /// and requesters per dependency; ties keep the first dependency in
    /// name order. `None` when nothing was recorded.
    pub fn blame(&self) -> Option<Blame> {
        let mut per_dependency: BTreeMap<&PackageName, u64> = BTreeMap::new();
        for (reason, count) in &self.counts {
            *per_dependency.entry(&reason.dependency).or_insert(0) += count;
        }

        let mut best: Option<(&PackageName, u64)> = None;
        for (&dependency, &count) in &per_dependency {
            if best.map_or(true, |(_, current)| count > current) {
                best = Some((dependency, count));
            }
        }
        let (dependency, count) = best?;

        let mut requesters: Vec<PackageName> = Vec::new();
        for reason in self.counts.keys() {
            if &reason.dependency == dependency && !requesters.contains(&reason.requester) {
                requesters.push(reason.requester.clone());
            }
        }

        Some(Blame {
            dependency: dependency.clone(),
            requesters,
            count,
        })
    }
}

/// The outcome of blame aggregation over a failed search.
#[derive(Debug, Clone, PartialEq)]
pub struct Blame {
    /// The dependency package most frequently implicated.
    pub dependency: PackageName,
    /// Distinct packages whose declared ranges conflicted on it.
    pub requesters: Vec<PackageName>,
    /// Aggregated violation count.
    pub count: u64,
}

impl fmt::Display for Blame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requesters: Vec<&str> = self.requesters.iter().map(|r| r.as_str()).collect();
        write!(
            f,
            "Packages {} request incompatible versions of {}",
            requesters.join(", "),
            self.dependency
        )
    }
}
