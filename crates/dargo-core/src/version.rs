//! Concrete package versions: semver or content-address.
//!
//! Most published versions are semantic versions, but a package can also be
//! identified directly by the content address of its artifact, in which case
//! the locator string doubles as the version key. Content addresses have no
//! meaningful total order; the `Ord` impl below exists so versions can serve
//! as deterministic map keys, and sorts them after all semver entries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DargoError;
use crate::CONTENT_ADDRESS_PREFIX;

/// A concrete package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// A semantic version, e.g. `1.0.3`.
    Semver(semver::Version),
    /// An opaque content-address locator used verbatim as the version key.
    ContentAddress(String),
}

impl Version {
    /// Parse a version string: a content address if it carries the store
    /// prefix, otherwise a semantic version.
    pub fn parse(s: &str) -> Result<Self, DargoError> {
        if s.starts_with(CONTENT_ADDRESS_PREFIX) {
            return Ok(Self::ContentAddress(s.to_string()));
        }
        semver::Version::parse(s)
            .map(Self::Semver)
            .map_err(|_| DargoError::InvalidVersion {
                version: s.to_string(),
            })
    }

    pub fn as_semver(&self) -> Option<&semver::Version> {
        match self {
            Self::Semver(v) => Some(v),
            Self::ContentAddress(_) => None,
        }
    }

    pub fn is_content_address(&self) -> bool {
        matches!(self, Self::ContentAddress(_))
    }

    /// Component-wise distance to another version, used to minimize churn
    /// for installed packages. `None` when either side is a content address.
    pub fn distance(&self, other: &Version) -> Option<(u64, u64, u64)> {
        let a = self.as_semver()?;
        let b = other.as_semver()?;
        Some((
            a.major.abs_diff(b.major),
            a.minor.abs_diff(b.minor),
            a.patch.abs_diff(b.patch),
        ))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semver(v) => write!(f, "{v}"),
            Self::ContentAddress(addr) => f.write_str(addr),
        }
    }
}

impl FromStr for Version {
    type Err = DargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Semver(a), Self::Semver(b)) => a.cmp(b),
            (Self::Semver(_), Self::ContentAddress(_)) => Ordering::Less,
            (Self::ContentAddress(_), Self::Semver(_)) => Ordering::Greater,
            (Self::ContentAddress(a), Self::ContentAddress(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VersionVisitor;

        impl Visitor<'_> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a semver version or content-address string")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Version, E> {
                Version::parse(s).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(VersionVisitor)
    }
}
