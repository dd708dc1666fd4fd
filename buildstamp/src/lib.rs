#![forbid(unsafe_code)]
//! Manifest templating and automatic build versioning for mobile build
//! pipelines.
//!
//! Two independent pipelines share a common platform dispatch: token
//! substitution over a manifest template, and build-number derivation with
//! platform-specific version-field rewriting.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use buildstamp::{CiEnvironment, Platform, ProjectConfig, run_versioning};
//! use std::path::Path;
//!
//! let config = ProjectConfig::load(".")?;
//! let outcome = run_versioning(
//!     Path::new("Info.plist"),
//!     Path::new("obj/Info.plist"),
//!     Platform::Ios,
//!     &config,
//!     &CiEnvironment::detect(),
//! )?;
//! println!("{:?}", outcome);
//! # Ok::<(), buildstamp::Error>(())
//! ```
//!
//! # Pipelines
//!
//! - **Templating**: `$Token$` placeholders in a manifest are replaced with
//!   values from a layered variable namespace (declared defaults, secrets,
//!   process environment), with platform-scoped prefix fallback. Unresolved
//!   tokens stay in place.
//! - **Versioning**: a build number is derived from a CI host counter or
//!   the time since a fixed epoch, then stamped into
//!   `android:versionCode`/`android:versionName` or
//!   `CFBundleVersion`/`CFBundleShortVersionString`.

pub mod ci;
pub mod config;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod resolver;
pub mod template;
pub mod traits;
pub mod versioning;

// Re-export most used types for easy consumption
pub use crate::{
    ci::CiEnvironment,
    config::{
        ManifestsConfig, ProjectConfig, VersionBehavior, VersionEnvironment, VersioningConfig,
    },
    environment::gather_variables,
    error::Error,
    manifest::{AndroidManifestDocument, ManifestKind, PlistDocument},
    pipeline::{Outcome, SkipReason, run_template, run_versioning},
    platform::Platform,
    traits::ManifestDocument,
};
