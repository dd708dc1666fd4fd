//! iOS and macOS version rewrite.
//!
//! The property list carries two fields: `CFBundleVersion`, a fine-grained
//! build identifier, and `CFBundleShortVersionString`, the user-facing
//! semantic version. Either may be absent, so the rewrite branches on the
//! four presence cases. Afterwards the bundle version always has exactly
//! three segments and the short version string carries the build number as
//! its final segment.

use tracing::warn;

use crate::error::Error;
use crate::manifest::plist::Document;

pub const BUNDLE_VERSION_KEY: &str = "CFBundleVersion";
pub const SHORT_VERSION_KEY: &str = "CFBundleShortVersionString";

/// Rewrites both version fields of the property list.
///
/// An existing short version string whose segment count cannot be
/// normalized is unrecoverable and fails the rewrite with
/// [`Error::InvalidVersion`].
pub fn rewrite(document: &mut Document, build_number: &str) -> Result<(), Error> {
    let bundle_version = document.get(BUNDLE_VERSION_KEY).filter(|v| !v.is_empty());
    let short_version = document.get(SHORT_VERSION_KEY).filter(|v| !v.is_empty());

    let (bundle, short) = match (bundle_version, short_version) {
        (Some(bundle), Some(short)) => (
            rebuild(&bundle, build_number),
            rebuild_short(&short, build_number)?,
        ),
        (None, Some(short)) => {
            let semantic = if short.split('.').count() > 1 {
                short.as_str()
            } else {
                "1.0"
            };
            (
                rebuild(&short, build_number),
                rebuild_short(semantic, build_number)?,
            )
        }
        (Some(bundle), None) => {
            let bundle = rebuild(&bundle, build_number);
            let short = rebuild_short(&bundle, build_number)?;
            (bundle, short)
        }
        (None, None) => (
            rebuild("1", build_number),
            rebuild_short("1.0.0", build_number)?,
        ),
    };

    document.set(BUNDLE_VERSION_KEY, &bundle)?;
    document.set(SHORT_VERSION_KEY, &short)?;
    Ok(())
}

/// `major.minor.build` when the first two segments parse as integers;
/// degrades to the build number alone otherwise.
fn rebuild(version: &str, build_number: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() > 1 {
        match (parts[0].parse::<i64>(), parts[1].parse::<i64>()) {
            (Ok(major), Ok(minor)) => return format!("{major}.{minor}.{build_number}"),
            _ => warn!(
                version,
                "unable to parse the first two segments of the bundle version"
            ),
        }
    }
    build_number.to_string()
}

/// Normalizes to exactly two semantic segments, then appends the build
/// number. One segment pads with `.0`; two or three collapse to the first
/// two; anything else is an invalid state the rewrite cannot recover from.
fn rebuild_short(version: &str, build_number: &str) -> Result<String, Error> {
    let parts: Vec<&str> = version.split('.').collect();
    let semantic = match parts.len() {
        1 => format!("{}.0", parts[0]),
        2 | 3 => format!("{}.{}", parts[0], parts[1]),
        _ => {
            return Err(Error::invalid_version(format!(
                "unable to validate the existing short version string `{version}`"
            )));
        }
    };
    Ok(format!("{semantic}.{build_number}"))
}
