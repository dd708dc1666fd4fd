//! Build-number derivation and the platform version rewriters.
//!
//! The build number is either a CI host counter (optionally offset) or the
//! number of seconds since a fixed epoch, which grows monotonically across
//! calendar time and serves as a coarse build ordinal when no counter is
//! available.

pub mod android;
pub mod ios;

use chrono::Utc;

use crate::ci::CiEnvironment;
use crate::config::VersionBehavior;

/// Unix seconds for 2018-01-01T00:00:00Z, the origin of the
/// timestamp-derived scheme.
pub const BUILD_EPOCH_SECS: i64 = 1_514_764_800;

/// Computes the build number for this run.
///
/// With [`VersionBehavior::PreferBuildNumber`] on a recognized host, the
/// host counter wins: numeric counters get the offset added, non-numeric
/// counters pass through verbatim with no offset. Every other case falls
/// back to the timestamp scheme. `Off` short-circuits before the pipeline
/// ever gets here.
pub fn derive_build_number(behavior: VersionBehavior, ci: &CiEnvironment, offset: i64) -> String {
    derive_build_number_at(behavior, ci, offset, Utc::now().timestamp())
}

/// [`derive_build_number`] with the clock supplied by the caller.
pub fn derive_build_number_at(
    behavior: VersionBehavior,
    ci: &CiEnvironment,
    offset: i64,
    now_unix: i64,
) -> String {
    if behavior == VersionBehavior::PreferBuildNumber && ci.is_build_host {
        if let Some(counter) = &ci.build_counter {
            return match counter.parse::<i64>() {
                Ok(number) => (number + offset).to_string(),
                Err(_) => counter.clone(),
            };
        }
    }

    (offset + (now_unix - BUILD_EPOCH_SECS)).to_string()
}

/// Drops the final dot-separated segment when it is longer than 4
/// characters. Long trailing segments are almost always stray build
/// metadata rather than a version component; everything else passes
/// through unchanged. The threshold is a compatibility surface for
/// existing manifests.
pub fn sanitize_version(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    match parts.last() {
        Some(last) if last.len() > 4 => parts[..parts.len() - 1].join("."),
        _ => version.to_string(),
    }
}
