//! Target platform dispatch.
//!
//! The pipelines select their concrete manifest handling by matching on
//! [`Platform`]; adding a platform means adding a variant and extending the
//! matches.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::Error, manifest::ManifestKind};

/// The closed set of platforms the build pipelines know how to stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Ios,
    MacOs,
    Android,
}

impl Platform {
    /// Prefix tried for platform-scoped variable lookups, e.g. `iOS_AppName`
    /// satisfying the token `AppName` on an iOS build.
    pub fn variable_prefix(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS_",
            Platform::MacOs => "macOS_",
            Platform::Android => "Android_",
        }
    }

    /// The manifest document kind this platform's app manifest uses.
    pub fn manifest_kind(&self) -> ManifestKind {
        match self {
            Platform::Ios | Platform::MacOs => ManifestKind::PropertyList,
            Platform::Android => ManifestKind::AndroidManifest,
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "macos" => Ok(Platform::MacOs),
            "android" => Ok(Platform::Android),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Ios => "iOS",
            Platform::MacOs => "macOS",
            Platform::Android => "Android",
        };
        write!(f, "{}", name)
    }
}
