//! Environment variable aggregation.
//!
//! The variable namespace is layered, later sources overriding earlier
//! ones: declared defaults from `manifest.json`, an optional `secrets.json`,
//! and finally the process environment. The engines never read the
//! environment themselves; they consume the mapping built here.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;

/// Declared variable defaults, committed alongside the project.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Local-only secret values, merged on top of the declared defaults.
pub const SECRETS_FILE: &str = "secrets.json";

/// Builds the variable mapping for a templating run.
pub fn gather_variables<P: AsRef<Path>>(
    project_dir: P,
    include_secrets: bool,
) -> Result<BTreeMap<String, String>, Error> {
    gather_variables_from(project_dir, include_secrets, std::env::vars())
}

/// Same as [`gather_variables`], with the process environment supplied by
/// the caller.
pub fn gather_variables_from<P, I>(
    project_dir: P,
    include_secrets: bool,
    process_env: I,
) -> Result<BTreeMap<String, String>, Error>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (String, String)>,
{
    let project_dir = project_dir.as_ref();
    let mut variables = BTreeMap::new();

    merge_json_file(&mut variables, &project_dir.join(MANIFEST_FILE))?;
    if include_secrets {
        merge_json_file(&mut variables, &project_dir.join(SECRETS_FILE))?;
    }
    for (key, value) in process_env {
        variables.insert(key, value);
    }

    Ok(variables)
}

/// Merges a flat JSON object of variables into the mapping. Missing files
/// are skipped; non-object documents are rejected.
fn merge_json_file(variables: &mut BTreeMap<String, String>, path: &Path) -> Result<(), Error> {
    if !path.exists() {
        return Ok(());
    }

    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let value: Value = serde_json::from_reader(reader)?;

    let Value::Object(map) = value else {
        return Err(Error::invalid_manifest(format!(
            "expected a JSON object of variables in {}",
            path.display()
        )));
    };

    for (key, value) in map {
        let rendered = match value {
            Value::String(s) => s,
            Value::Null => continue,
            other => other.to_string(),
        };
        variables.insert(key, rendered);
    }

    debug!(path = %path.display(), "merged declared variables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_yield_process_env_only() {
        let dir = TempDir::new().unwrap();
        let env = vec![("FROM_ENV".to_string(), "1".to_string())];
        let variables = gather_variables_from(dir.path(), true, env).unwrap();
        assert_eq!(variables.get("FROM_ENV").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_secrets_override_declared_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"ApiUrl": "https://dev.example.com", "AppName": "Demo"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(SECRETS_FILE),
            r#"{"ApiUrl": "https://prod.example.com"}"#,
        )
        .unwrap();

        let variables = gather_variables_from(dir.path(), true, Vec::new()).unwrap();
        assert_eq!(
            variables.get("ApiUrl").map(String::as_str),
            Some("https://prod.example.com")
        );
        assert_eq!(variables.get("AppName").map(String::as_str), Some("Demo"));
    }

    #[test]
    fn test_secrets_skipped_when_excluded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SECRETS_FILE), r#"{"Secret": "value"}"#).unwrap();

        let variables = gather_variables_from(dir.path(), false, Vec::new()).unwrap();
        assert!(!variables.contains_key("Secret"));
    }

    #[test]
    fn test_process_env_overrides_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"Stage": "dev"}"#).unwrap();

        let env = vec![("Stage".to_string(), "ci".to_string())];
        let variables = gather_variables_from(dir.path(), true, env).unwrap();
        assert_eq!(variables.get("Stage").map(String::as_str), Some("ci"));
    }

    #[test]
    fn test_scalar_values_are_rendered_as_strings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"Retries": 3, "Verbose": true, "Absent": null}"#,
        )
        .unwrap();

        let variables = gather_variables_from(dir.path(), true, Vec::new()).unwrap();
        assert_eq!(variables.get("Retries").map(String::as_str), Some("3"));
        assert_eq!(variables.get("Verbose").map(String::as_str), Some("true"));
        assert!(!variables.contains_key("Absent"));
    }

    #[test]
    fn test_non_object_manifest_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"["a", "b"]"#).unwrap();

        let result = gather_variables_from(dir.path(), true, Vec::new());
        assert!(matches!(result, Err(Error::InvalidManifest(_))));
    }
}
