// relink/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use relink_common::error::Result;
use relink_common::model::{DependencySpecifier, PassStatus};
use relink_common::{Config, Manifest};
use tracing::debug;

pub mod bootstrap;
pub mod check;
pub mod display;
pub mod fix;

use crate::cli::check::Check;
use crate::cli::fix::Fix;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "relink", bin_name = "relink")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory containing package.json (defaults to the current directory)
    #[arg(short = 'C', long = "project", value_name = "DIR", global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report locally linked dependencies that resolve to the wrong place
    Check(Check),
    /// Check, then relink mismatched dependencies through the global link registry
    Fix(Fix),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<PassStatus> {
        match self {
            Self::Check(command) => command.run(config).await,
            Self::Fix(command) => command.run(config).await,
        }
    }
}

/// Reads the manifest's dependencies. Any failure here aborts the run before
/// the filesystem is inspected.
pub(crate) fn load_specifiers(config: &Config) -> Result<Vec<DependencySpecifier>> {
    let manifest = Manifest::load(&config.manifest_path())?;
    let specifiers = manifest.dependencies()?;
    debug!(
        "Loaded {} dependencies from {}",
        specifiers.len(),
        manifest.path().display()
    );
    Ok(specifiers)
}
