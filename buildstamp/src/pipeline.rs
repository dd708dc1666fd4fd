//! Per-platform dispatch and the warn-and-no-op ladder shared by both
//! pipelines.
//!
//! Skips are part of the contract, not failures: a disabled behavior, a
//! missing manifest, or a local-only configuration on a build host all log
//! and return [`Outcome::Skipped`], leaving the build untouched. Only the
//! unrecoverable short-version case and collaborator I/O failures surface
//! as errors.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::ci::CiEnvironment;
use crate::config::{ProjectConfig, VersionBehavior, VersionEnvironment};
use crate::error::Error;
use crate::manifest::{AndroidManifestDocument, PlistDocument};
use crate::platform::Platform;
use crate::template::render_manifest;
use crate::traits::ManifestDocument;
use crate::versioning::{self, derive_build_number};

/// What one pipeline invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Tokens substituted and the output written.
    Templated {
        unresolved: std::collections::BTreeSet<String>,
    },
    /// Version fields rewritten and the output written.
    Versioned { build_number: String },
    /// Nothing done, by design.
    Skipped(SkipReason),
}

/// Why a pipeline chose to no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BehaviorOff,
    MissingManifest,
    LocalOnlyOnBuildHost,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            SkipReason::BehaviorOff => "automatic versioning is disabled",
            SkipReason::MissingManifest => "the manifest could not be found",
            SkipReason::LocalOnlyOnBuildHost => {
                "versioning is configured for local builds only, and this is a recognized build host"
            }
        };
        write!(f, "{}", message)
    }
}

/// Runs the templating pipeline for one manifest.
pub fn run_template(
    manifest_path: &Path,
    output_path: &Path,
    platform: Platform,
    config: &ProjectConfig,
    variables: &BTreeMap<String, String>,
) -> Result<Outcome, Error> {
    if !manifest_path.exists() {
        warn!(path = %manifest_path.display(), "there is no template manifest at the path");
        return Ok(Outcome::Skipped(SkipReason::MissingManifest));
    }

    let resolution = render_manifest(
        manifest_path,
        output_path,
        platform,
        &config.manifests,
        variables,
    )?;

    if !resolution.fully_resolved() {
        warn!(
            count = resolution.unresolved.len(),
            "some tokens could not be resolved"
        );
    }

    Ok(Outcome::Templated {
        unresolved: resolution.unresolved,
    })
}

/// Runs the automatic versioning pipeline for one manifest.
pub fn run_versioning(
    manifest_path: &Path,
    output_path: &Path,
    platform: Platform,
    config: &ProjectConfig,
    ci: &CiEnvironment,
) -> Result<Outcome, Error> {
    let versioning = &config.automatic_versioning;

    if versioning.behavior == VersionBehavior::Off {
        info!("automatic versioning has been disabled");
        return Ok(Outcome::Skipped(SkipReason::BehaviorOff));
    }

    if ci.is_build_host && versioning.environment == VersionEnvironment::Local {
        info!(
            "versioning is configured to run on your local machine only, but this is a build host"
        );
        return Ok(Outcome::Skipped(SkipReason::LocalOnlyOnBuildHost));
    }

    if !manifest_path.exists() {
        warn!(path = %manifest_path.display(), "the manifest could not be found at the path");
        return Ok(Outcome::Skipped(SkipReason::MissingManifest));
    }

    let build_number = derive_build_number(versioning.behavior, ci, versioning.version_offset);
    info!(%build_number, "derived build number");

    if config.debug {
        log_manifest_contents(manifest_path);
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    match platform {
        Platform::Android => {
            let mut document = AndroidManifestDocument::read_from(manifest_path)?;
            versioning::android::rewrite(&mut document, &build_number)?;
            document.write_to(output_path)?;
        }
        Platform::Ios | Platform::MacOs => {
            let mut document = PlistDocument::read_from(manifest_path)?;
            versioning::ios::rewrite(&mut document, &build_number)?;
            document.write_to(output_path)?;
        }
    }
    info!(path = %output_path.display(), "wrote versioned manifest");

    if config.debug {
        log_manifest_contents(output_path);
    }

    Ok(Outcome::Versioned { build_number })
}

fn log_manifest_contents(path: &Path) {
    match fs::read_to_string(path) {
        Ok(contents) => debug!(path = %path.display(), %contents, "manifest contents"),
        Err(error) => debug!(path = %path.display(), %error, "could not read manifest for logging"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersioningConfig;

    #[test]
    fn test_behavior_off_skips_before_touching_paths() {
        let config = ProjectConfig::default();
        let outcome = run_versioning(
            Path::new("/definitely/missing/Info.plist"),
            Path::new("/definitely/missing/out/Info.plist"),
            Platform::Ios,
            &config,
            &CiEnvironment::local(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::BehaviorOff));
    }

    #[test]
    fn test_local_only_on_build_host_skips() {
        let config = ProjectConfig {
            automatic_versioning: VersioningConfig {
                behavior: VersionBehavior::Timestamp,
                environment: VersionEnvironment::Local,
                version_offset: 0,
            },
            ..Default::default()
        };
        let ci = CiEnvironment {
            is_build_host: true,
            build_counter: Some("12".to_string()),
        };
        let outcome = run_versioning(
            Path::new("/missing/Info.plist"),
            Path::new("/missing/out/Info.plist"),
            Platform::Ios,
            &config,
            &ci,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::LocalOnlyOnBuildHost));
    }

    #[test]
    fn test_missing_manifest_skips() {
        let config = ProjectConfig {
            automatic_versioning: VersioningConfig {
                behavior: VersionBehavior::Timestamp,
                ..Default::default()
            },
            ..Default::default()
        };
        let outcome = run_versioning(
            Path::new("/missing/Info.plist"),
            Path::new("/missing/out/Info.plist"),
            Platform::Ios,
            &config,
            &CiEnvironment::local(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingManifest));
    }

    #[test]
    fn test_missing_template_skips() {
        let outcome = run_template(
            Path::new("/missing/Info.plist"),
            Path::new("/missing/out/Info.plist"),
            Platform::Ios,
            &ProjectConfig::default(),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingManifest));
    }
}
