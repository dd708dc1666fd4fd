use std::path::Path;

use buildstamp::{Error, Outcome, Platform, ProjectConfig, environment};
use tracing::warn;

pub fn run(
    manifest: &Path,
    output: &Path,
    platform: &str,
    project_dir: &Path,
    include_secrets: bool,
) -> Result<(), Error> {
    // An unrecognized platform is a warn-and-no-op, not a build failure.
    let platform: Platform = match platform.parse() {
        Ok(platform) => platform,
        Err(Error::UnsupportedPlatform(name)) => {
            warn!(platform = %name, "the platform is not supported for manifest templating");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let config = ProjectConfig::load(project_dir)?;
    let variables = environment::gather_variables(project_dir, include_secrets)?;

    match buildstamp::run_template(manifest, output, platform, &config, &variables)? {
        Outcome::Templated { unresolved } if unresolved.is_empty() => {
            println!("Processed manifest written to {}", output.display());
        }
        Outcome::Templated { unresolved } => {
            println!(
                "Processed manifest written to {} with {} unresolved token(s): {}",
                output.display(),
                unresolved.len(),
                unresolved.into_iter().collect::<Vec<_>>().join(", ")
            );
        }
        Outcome::Skipped(reason) => {
            println!("Skipped: {}", reason);
        }
        Outcome::Versioned { .. } => {}
    }

    Ok(())
}
