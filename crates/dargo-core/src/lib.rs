//! Core data types for the dargo package resolver.
//!
//! This crate defines the fundamental types the resolution engine operates
//! on: package names, concrete versions (semver or content-address), version
//! requests, repository snapshots, and installed state.
//!
//! This crate is intentionally free of async code and network I/O.

/// Prefix identifying a content-address locator (e.g. `/ipfs/QmZvasj…`).
pub const CONTENT_ADDRESS_PREFIX: &str = "/ipfs/";

pub mod errors;
pub mod name;
pub mod repository;
pub mod request;
pub mod state;
pub mod version;
