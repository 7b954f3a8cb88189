use serde::{Serialize, Serializer};
use std::env;
use std::fmt;

use crate::error::ComposeError;

/// Operating system component of a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
}

impl Os {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "linux" => Some(Os::Linux),
            "darwin" | "macos" => Some(Os::Darwin),
            _ => None,
        }
    }
}

/// CPU architecture component of a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x64" | "x86_64" => Some(Arch::X64),
            "arm64" | "aarch64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

/// A supported OS/architecture target (e.g. `linux-x64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Every platform tag the composer knows how to resolve for.
    pub const ALL: [Self; 4] = [
        Self {
            os: Os::Linux,
            arch: Arch::X64,
        },
        Self {
            os: Os::Linux,
            arch: Arch::Arm64,
        },
        Self {
            os: Os::Darwin,
            arch: Arch::X64,
        },
        Self {
            os: Os::Darwin,
            arch: Arch::Arm64,
        },
    ];

    fn lookup(tag: &str) -> Option<Self> {
        let (os, arch) = tag.split_once('-')?;
        Some(Self {
            os: Os::from_name(os)?,
            arch: Arch::from_name(arch)?,
        })
    }

    /// Parse a platform tag, rejecting anything outside [`Platform::ALL`].
    pub fn parse(tag: &str) -> Result<Self, ComposeError> {
        Self::lookup(tag).ok_or_else(|| ComposeError::UnsupportedPlatform {
            tag: tag.to_string(),
        })
    }

    /// Detect the host platform from the running process.
    ///
    /// Returns `None` on hosts outside the supported set.
    pub fn current() -> Option<Self> {
        let os = Os::from_name(env::consts::OS)?;
        let arch = Arch::from_name(env::consts::ARCH)?;
        Some(Self { os, arch })
    }

    pub fn as_str(self) -> &'static str {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X64) => "linux-x64",
            (Os::Linux, Arch::Arm64) => "linux-arm64",
            (Os::Darwin, Arch::X64) => "darwin-x64",
            (Os::Darwin, Arch::Arm64) => "darwin-arm64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A guard attached to a conditional entry in the configuration.
///
/// Accepts an OS family (`linux-*`, or bare `linux`) or an exact tag
/// (`darwin-arm64`). Guards are parsed once up front so matching is a plain
/// enum comparison rather than string matching at each use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFilter {
    Os(Os),
    Exact(Platform),
}

impl PlatformFilter {
    pub fn parse(filter: &str) -> Option<Self> {
        if let Some(os) = filter.strip_suffix("-*").and_then(Os::from_name) {
            return Some(Self::Os(os));
        }
        if let Some(os) = Os::from_name(filter) {
            return Some(Self::Os(os));
        }
        Platform::lookup(filter).map(Self::Exact)
    }

    pub fn matches(self, platform: Platform) -> bool {
        match self {
            Self::Os(os) => platform.os == os,
            Self::Exact(exact) => platform == exact,
        }
    }
}
