use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all dargo operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DargoError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A version string that is neither semver nor a content address.
    #[error("Invalid version: {version}")]
    InvalidVersion { version: String },

    /// A version request matching none of the recognized forms.
    #[error("Unknown version request for {name}: {request}")]
    #[diagnostic(help(
        "Use an exact version, a semver range, a /ipfs/ content address, or \"latest\""
    ))]
    UnknownVersionRequest { name: String, request: String },

    /// An exact-version request for a version the source does not publish.
    #[error("Unknown version {version} of package {name}")]
    UnknownVersion { name: String, version: String },

    /// A `latest` request against a package with no published versions.
    #[error("Package {name} has no published versions")]
    NoPublishedVersions { name: String },

    /// An install request token with no usable package name.
    #[error("Malformed install request: {token}")]
    #[diagnostic(help("Expected a package name, optionally followed by @<version-request>"))]
    MalformedRequest { token: String },

    /// Repository or installed-state snapshot could not be read or parsed.
    #[error("Snapshot error: {message}")]
    #[diagnostic(help("Check the JSON snapshot for syntax errors"))]
    Snapshot { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DargoResult<T> = miette::Result<T>;
