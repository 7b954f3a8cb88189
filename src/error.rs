use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::platform::Platform;

/// Fatal failures raised while loading or resolving a requirement set.
///
/// Every variant names the offending entry so the caller can report a
/// useful message. No partial plan is ever produced alongside one of these.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("unsupported platform '{tag}' (supported: linux-x64, linux-arm64, darwin-x64, darwin-arm64)")]
    UnsupportedPlatform { tag: String },

    #[error("invalid platform filter '{filter}' in {entry}")]
    InvalidPlatformFilter { entry: String, filter: String },

    #[error("conflicting values for environment variable '{name}': '{first_value}' from {first_source}, '{second_value}' from {second_source}")]
    EnvConflict {
        name: String,
        first_source: String,
        first_value: String,
        second_source: String,
        second_value: String,
    },

    #[error("duplicate script '{name}' defined by {first_source} and {second_source}")]
    DuplicateScript {
        name: String,
        first_source: String,
        second_source: String,
    },
}

impl ComposeError {
    /// Process exit code used by the CLI; each validation kind gets its own.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } | Self::Parse { .. } | Self::InvalidPlatformFilter { .. } => 3,
            Self::UnsupportedPlatform { .. } => 4,
            Self::EnvConflict { .. } => 5,
            Self::DuplicateScript { .. } => 6,
        }
    }
}

/// Non-fatal diagnostics collected during resolution.
///
/// Warnings ride along with a successful plan; the CLI prints them on stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A field the composer does not understand; ignored for forward compatibility.
    UnknownField { section: String, field: String },
    /// A platform-conditional value with no branch matching the target.
    NoPlatformBranch { entry: String, platform: Platform },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownField { section, field } => {
                write!(f, "unknown field '{field}' in {section}; ignored")
            }
            Warning::NoPlatformBranch { entry, platform } => {
                write!(f, "no branch of {entry} matches {platform}; value omitted")
            }
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
