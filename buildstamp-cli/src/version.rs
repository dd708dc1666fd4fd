use std::path::Path;

use buildstamp::{CiEnvironment, Error, Outcome, Platform, ProjectConfig, VersionBehavior};
use tracing::warn;

pub fn run(
    manifest: &Path,
    output: &Path,
    platform: &str,
    project_dir: &Path,
    behavior: Option<VersionBehavior>,
    offset: Option<i64>,
) -> Result<(), Error> {
    // An unrecognized platform is a warn-and-no-op, not a build failure.
    let platform: Platform = match platform.parse() {
        Ok(platform) => platform,
        Err(Error::UnsupportedPlatform(name)) => {
            warn!(platform = %name, "the platform is not supported for automatic versioning");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut config = ProjectConfig::load(project_dir)?;
    if let Some(behavior) = behavior {
        config.automatic_versioning.behavior = behavior;
    }
    if let Some(offset) = offset {
        config.automatic_versioning.version_offset = offset;
    }

    let ci = CiEnvironment::detect();

    match buildstamp::run_versioning(manifest, output, platform, &config, &ci)? {
        Outcome::Versioned { build_number } => {
            println!(
                "Build number {} written to {}",
                build_number,
                output.display()
            );
        }
        Outcome::Skipped(reason) => {
            println!("Skipped: {}", reason);
        }
        Outcome::Templated { .. } => {}
    }

    Ok(())
}
