//! Version requests and install requests.
//!
//! A version request is classified into exactly one of four forms, in a
//! fixed order: exact version first (so `1.0.0` is an exact pin, not the
//! range it would also parse as), then semver range, then content address,
//! then the `latest` token. Anything else is rejected at the request
//! boundary, before any search begins.

use std::fmt;

use crate::errors::DargoError;
use crate::name::PackageName;
use crate::version::Version;
use crate::CONTENT_ADDRESS_PREFIX;

/// A user-supplied version request, classified into exactly one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// An exact semantic version.
    Exact(semver::Version),
    /// A semver range.
    Range(semver::VersionReq),
    /// A content-address literal; the artifact is pinned by hash.
    ContentAddress(String),
    /// The literal token `latest`: the highest published version.
    Latest,
}

impl VersionRequest {
    /// Classify a raw request string; first matching form wins.
    ///
    /// Returns `None` when the string matches none of the four forms.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(v) = semver::Version::parse(raw) {
            return Some(Self::Exact(v));
        }
        if let Ok(req) = semver::VersionReq::parse(raw) {
            return Some(Self::Range(req));
        }
        if raw.starts_with(CONTENT_ADDRESS_PREFIX) {
            return Some(Self::ContentAddress(raw.to_string()));
        }
        if raw == "latest" {
            return Some(Self::Latest);
        }
        None
    }

    /// Whether a concrete version is eligible under this request.
    ///
    /// `Latest` admits any version; picking the single highest one is the
    /// caller's job.
    pub fn matches(&self, version: &Version) -> bool {
        match (self, version) {
            (Self::Exact(exact), Version::Semver(v)) => exact == v,
            (Self::Range(req), Version::Semver(v)) => req.matches(v),
            (Self::ContentAddress(addr), Version::ContentAddress(v)) => addr == v,
            (Self::Latest, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Range(req) => write!(f, "{req}"),
            Self::ContentAddress(addr) => f.write_str(addr),
            Self::Latest => f.write_str("latest"),
        }
    }
}

/// A request to install or upgrade a single package.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub name: PackageName,
    pub request: VersionRequest,
}

impl InstallRequest {
    pub fn new(name: impl Into<PackageName>, request: VersionRequest) -> Self {
        Self {
            name: name.into(),
            request,
        }
    }

    /// Parse a `name@request` token, split on the first `@`.
    ///
    /// A bare `name` with no `@` requests the latest version.
    pub fn parse(token: &str) -> Result<Self, DargoError> {
        let token = token.trim();
        let (name, raw) = match token.split_once('@') {
            Some((name, raw)) => (name, Some(raw)),
            None => (token, None),
        };
        if name.is_empty() {
            return Err(DargoError::MalformedRequest {
                token: token.to_string(),
            });
        }
        let request = match raw {
            None => VersionRequest::Latest,
            Some(raw) => {
                VersionRequest::parse(raw).ok_or_else(|| DargoError::UnknownVersionRequest {
                    name: name.to_string(),
                    request: raw.to_string(),
                })?
            }
        };
        Ok(Self {
            name: PackageName::from(name),
            request,
        })
    }
}

impl fmt::Display for InstallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.request)
    }
}
