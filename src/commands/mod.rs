use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use crate::{Platform, RequirementSet};

mod check;
mod compose;
mod init;
mod platforms;
mod scripts;

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => init::execute(force),

        Commands::Compose {
            platform,
            format,
            config,
        } => compose::execute(platform.as_deref(), &format, config.as_deref()),

        Commands::Check { config } => check::execute(config.as_deref()),

        Commands::Scripts { config } => scripts::execute(config.as_deref()),

        Commands::Platforms => platforms::execute(),
    }
}

/// Resolve the configuration path: an explicit argument (tilde-expanded),
/// or `devshell.toml` discovered from the working directory upward.
fn locate_config(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        return Ok(PathBuf::from(expanded));
    }

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    RequirementSet::find(&cwd).ok_or_else(|| {
        anyhow!(
            "No {} found in {} or any parent directory",
            crate::CONFIG_FILE,
            cwd.display()
        )
    })
}

/// Parse the requested platform tag, or detect the host platform.
fn target_platform(tag: Option<&str>) -> Result<Platform> {
    match tag {
        Some(tag) => Ok(Platform::parse(tag)?),
        None => Platform::current()
            .ok_or_else(|| anyhow!("Host platform is not supported; pass --platform explicitly")),
    }
}
