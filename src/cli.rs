use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Developer Shell - declarative dev shell composer
///
/// dsh resolves a declarative `devshell.toml` (toolchains, packages,
/// environment variables, hooks, and scripts) into a platform-specific
/// activation plan and renders the shell script that realizes it.
/// Package fetching and execution belong to the external runtime.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter devshell.toml in the current directory
    Init {
        /// Overwrite an existing devshell.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Resolve the configuration and print the activation script
    ///
    /// Emits the rendered script on stdout and diagnostics on stderr.
    Compose {
        /// Target platform tag (auto-detects the host if not specified)
        #[arg(short, long, value_name = "PLATFORM")]
        platform: Option<String>,

        /// Output format (shell, json)
        #[arg(short, long, value_name = "FORMAT", default_value = "shell")]
        format: String,

        /// Configuration file (discovered from the working directory if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Validate the configuration against every supported platform
    Check {
        /// Configuration file (discovered from the working directory if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// List named scripts defined by the configuration
    Scripts {
        /// Configuration file (discovered from the working directory if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// List supported platform tags
    Platforms,
}
