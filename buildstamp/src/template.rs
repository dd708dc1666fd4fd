//! Manifest templating.
//!
//! The engine treats the manifest as text: it reads the source, substitutes
//! tokens, checks that the result still parses as the platform's document
//! kind, and writes it to the output path. Document structure is never
//! interpreted beyond that final validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::ManifestsConfig;
use crate::error::Error;
use crate::platform::Platform;
use crate::resolver::{Resolution, manifest_prefixes, resolve_template};

/// Runs one templating pass over the manifest at `source`, writing the
/// substituted text to `output`.
pub fn render_manifest(
    source: &Path,
    output: &Path,
    platform: Platform,
    config: &ManifestsConfig,
    variables: &BTreeMap<String, String>,
) -> Result<Resolution, Error> {
    let template = fs::read_to_string(source)?;
    debug!(path = %source.display(), "read template manifest");

    let prefixes = manifest_prefixes(platform, config.variable_prefix.as_deref());
    let resolution = resolve_template(&template, config.token(), variables, &prefixes)?;

    // Substitution must not have broken the document.
    platform.manifest_kind().validate(&resolution.output)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, resolution.output.as_bytes())?;
    info!(path = %output.display(), "wrote processed manifest");

    Ok(resolution)
}
