//! Token discovery and substitution against the layered variable namespace.
//!
//! A token is the shortest span between two delimiter occurrences, so
//! `$A$$B$` parses as the two tokens `A` and `B`. Tokens whose names cannot
//! be resolved stay in the output byte-for-byte untouched.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::{debug, warn};

use crate::{error::Error, platform::Platform};

/// Result of one substitution pass over a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The template with every resolvable token substituted.
    pub output: String,
    /// Names of tokens that had no matching variable.
    pub unresolved: BTreeSet<String>,
}

impl Resolution {
    pub fn fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitutes every resolvable token in `template`.
///
/// All occurrences of a resolved name are replaced identically in one pass;
/// unresolved names are reported and their occurrences left alone. A
/// template with no tokens comes back unchanged.
pub fn resolve_template(
    template: &str,
    delimiter: &str,
    variables: &BTreeMap<String, String>,
    prefixes: &[String],
) -> Result<Resolution, Error> {
    let token = regex::escape(delimiter);
    let pattern = Regex::new(&format!("{token}(.*?){token}"))?;

    // Distinct names in first-seen order, one substitution per name.
    let mut names: Vec<String> = Vec::new();
    for captures in pattern.captures_iter(template) {
        let name = captures[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut output = template.to_string();
    let mut unresolved = BTreeSet::new();

    if names.is_empty() {
        debug!("did not find any tokens in the template");
        return Ok(Resolution { output, unresolved });
    }
    debug!(count = names.len(), "found tokens in the template");

    for name in names {
        match resolve_key(&name, variables, prefixes) {
            Some(key) => {
                debug!(token = %name, key = %key, "replacing token");
                let literal = format!("{delimiter}{name}{delimiter}");
                output = output.replace(&literal, &variables[key]);
            }
            None => {
                warn!(token = %name, "unable to locate a replacement value");
                unresolved.insert(name);
            }
        }
    }

    Ok(Resolution { output, unresolved })
}

/// Decides which variable, if any, satisfies a token name.
///
/// An exact match always wins; otherwise the prefixes are tried in order
/// and the first `prefix + name` present in the mapping is returned.
pub fn resolve_key<'a>(
    token_name: &str,
    variables: &'a BTreeMap<String, String>,
    prefixes: &[String],
) -> Option<&'a str> {
    if let Some((key, _)) = variables.get_key_value(token_name) {
        return Some(key.as_str());
    }

    for prefix in prefixes {
        let candidate = format!("{prefix}{token_name}");
        if let Some((key, _)) = variables.get_key_value(candidate.as_str()) {
            return Some(key.as_str());
        }
    }

    None
}

/// The ordered prefix set tried for unscoped token names: the configured
/// override first, then the platform scope, then the generic manifest
/// prefix.
pub fn manifest_prefixes(platform: Platform, configured: Option<&str>) -> Vec<String> {
    let mut prefixes = Vec::new();
    if let Some(prefix) = configured.filter(|p| !p.is_empty()) {
        prefixes.push(prefix.to_string());
    }
    prefixes.push(platform.variable_prefix().to_string());
    prefixes.push("Manifest_".to_string());
    prefixes
}
