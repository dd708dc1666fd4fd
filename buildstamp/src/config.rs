//! Build-time configuration surface.
//!
//! Configuration is an immutable value passed by parameter into the
//! pipelines. The CLI deserializes it from `buildstamp.json` in the project
//! directory; every field has a default so a missing or partial file is
//! fine.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// File name the configuration is loaded from, relative to the project
/// directory.
pub const CONFIG_FILE: &str = "buildstamp.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub manifests: ManifestsConfig,
    pub automatic_versioning: VersioningConfig,

    /// Verbose manifest-content logging. Presentational only.
    pub debug: bool,
}

impl ProjectConfig {
    /// Loads the configuration from `buildstamp.json` under `project_dir`,
    /// falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(project_dir: P) -> Result<Self, Error> {
        let path = project_dir.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ProjectConfig::default());
        }
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}

/// Settings for the token templating pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestsConfig {
    /// Token delimiter. Escaped before pattern construction, so regex
    /// metacharacters are safe here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Extra variable prefix tried before the platform-derived prefixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_prefix: Option<String>,
}

impl ManifestsConfig {
    pub const DEFAULT_TOKEN: &'static str = "$";

    /// The effective delimiter: the configured one unless empty or absent.
    pub fn token(&self) -> &str {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(Self::DEFAULT_TOKEN)
    }
}

/// Settings for the automatic versioning pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersioningConfig {
    pub behavior: VersionBehavior,
    pub environment: VersionEnvironment,
    pub version_offset: i64,
}

/// How the build number is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionBehavior {
    /// Automatic versioning disabled; the pipeline no-ops.
    #[default]
    Off,
    /// Use the CI host's build counter when one is available, otherwise
    /// fall back to the timestamp scheme.
    PreferBuildNumber,
    /// Always derive the build number from the time since the fixed epoch.
    Timestamp,
}

impl FromStr for VersionBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "off" => Ok(VersionBehavior::Off),
            "preferbuildnumber" => Ok(VersionBehavior::PreferBuildNumber),
            "timestamp" => Ok(VersionBehavior::Timestamp),
            _ => Err(format!("Unknown version behavior: {}", s)),
        }
    }
}

/// Where automatic versioning is allowed to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionEnvironment {
    /// Version every build, local or hosted.
    #[default]
    All,
    /// Only version local builds; recognized CI hosts are skipped.
    Local,
}

impl FromStr for VersionEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(VersionEnvironment::All),
            "local" => Ok(VersionEnvironment::Local),
            _ => Err(format!("Unknown version environment: {}", s)),
        }
    }
}
