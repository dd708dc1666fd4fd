//! All error types for the buildstamp crate.
//!
//! These are returned from all fallible operations (manifest parsing,
//! templating, version rewriting).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl Error {
    /// Creates a new invalid-manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Error::InvalidManifest(message.into())
    }

    /// Creates a new invalid-version error
    pub fn invalid_version(message: impl Into<String>) -> Self {
        Error::InvalidVersion(message.into())
    }
}
