//! Android version rewrite.
//!
//! The version code is an opaque counter and takes the build number
//! wholesale; the version name keeps its sanitized prefix with the build
//! number appended as a new final segment.

use tracing::warn;

use crate::error::Error;
use crate::manifest::android::{Document, VERSION_CODE_ATTR, VERSION_NAME_ATTR};

use super::sanitize_version;

/// Version name assumed when the manifest does not declare one.
pub const DEFAULT_VERSION_NAME: &str = "1.0";

/// Rewrites the version pair on the root manifest element.
pub fn rewrite(document: &mut Document, build_number: &str) -> Result<(), Error> {
    document.set(VERSION_CODE_ATTR, build_number)?;

    let current = match document.get(VERSION_NAME_ATTR) {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!(
                "no {} on the manifest, assuming {}",
                VERSION_NAME_ATTR, DEFAULT_VERSION_NAME
            );
            DEFAULT_VERSION_NAME.to_string()
        }
    };

    let version_name = format!("{}.{}", sanitize_version(&current), build_number);
    document.set(VERSION_NAME_ATTR, &version_name)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::{formatdoc, indoc};

    fn manifest_with(version_code: &str, version_name: &str) -> Document {
        let text = formatdoc! {r#"
            <manifest xmlns:android="http://schemas.android.com/apk/res/android"
                package="com.example.demo"
                android:versionCode="{version_code}"
                android:versionName="{version_name}">
                <application />
            </manifest>
        "#};
        Document::parse(&text).unwrap()
    }

    #[test]
    fn test_version_code_is_overwritten_wholesale() {
        let mut document = manifest_with("3", "1.2");
        rewrite(&mut document, "100").unwrap();
        assert_eq!(document.get(VERSION_CODE_ATTR).as_deref(), Some("100"));
    }

    #[test]
    fn test_version_name_appends_build_number() {
        let mut document = manifest_with("3", "1.2");
        rewrite(&mut document, "100").unwrap();
        assert_eq!(document.get(VERSION_NAME_ATTR).as_deref(), Some("1.2.100"));
    }

    #[test]
    fn test_short_final_segment_survives_sanitize() {
        let mut document = manifest_with("1", "1.2.3.4.5");
        rewrite(&mut document, "100").unwrap();
        assert_eq!(
            document.get(VERSION_NAME_ATTR).as_deref(),
            Some("1.2.3.4.5.100")
        );
    }

    #[test]
    fn test_long_final_segment_is_dropped() {
        let mut document = manifest_with("1", "1.2.deadbeef");
        rewrite(&mut document, "100").unwrap();
        assert_eq!(document.get(VERSION_NAME_ATTR).as_deref(), Some("1.2.100"));
    }

    #[test]
    fn test_missing_version_name_defaults() {
        let manifest = indoc! {r#"
            <manifest xmlns:android="http://schemas.android.com/apk/res/android"
                package="com.example.demo">
            </manifest>
        "#};
        let mut document = Document::parse(manifest).unwrap();
        rewrite(&mut document, "7").unwrap();
        assert_eq!(document.get(VERSION_CODE_ATTR).as_deref(), Some("7"));
        assert_eq!(document.get(VERSION_NAME_ATTR).as_deref(), Some("1.0.7"));
    }
}
