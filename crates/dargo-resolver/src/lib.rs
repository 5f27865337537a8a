//! Dependency resolution engine for content-addressed packages: version set
//! resolution, candidate aggregation, version prioritization, lazy
//! permutation enumeration, assignment verification, and a timeout-bounded
//! search with conflict blame.

pub mod aggregate;
pub mod conflict;
pub mod permutations;
pub mod prioritize;
pub mod resolve;
pub mod verify;
pub mod versions;
