mod template;
mod version;

use std::path::PathBuf;

use buildstamp::VersionBehavior;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Substitute variable tokens in a manifest template.
    Template {
        /// The template manifest to process
        #[arg(short, long)]
        manifest: PathBuf,

        /// Where to write the processed manifest
        #[arg(short, long)]
        output: PathBuf,

        /// Target platform: ios, macos, or android
        #[arg(short, long)]
        platform: String,

        /// Project directory holding buildstamp.json and the variable manifests
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Do not merge secrets.json into the variable namespace
        #[arg(long)]
        no_secrets: bool,
    },

    /// Derive a build number and rewrite the manifest version fields.
    Version {
        /// The manifest whose version fields should be rewritten
        #[arg(short, long)]
        manifest: PathBuf,

        /// Where to write the versioned manifest
        #[arg(short, long)]
        output: PathBuf,

        /// Target platform: ios, macos, or android
        #[arg(short, long)]
        platform: String,

        /// Project directory holding buildstamp.json
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Override the configured behavior: off, prefer-build-number, or timestamp
        #[arg(long)]
        behavior: Option<VersionBehavior>,

        /// Override the configured version offset
        #[arg(long)]
        offset: Option<i64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.commands {
        Commands::Template {
            manifest,
            output,
            platform,
            project_dir,
            no_secrets,
        } => template::run(&manifest, &output, &platform, &project_dir, !no_secrets),
        Commands::Version {
            manifest,
            output,
            platform,
            project_dir,
            behavior,
            offset,
        } => version::run(&manifest, &output, &platform, &project_dir, behavior, offset),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
