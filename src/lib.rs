// Public API
pub mod cli;
pub mod commands;
pub mod ui;

// Core domain types
mod error;
mod plan;
mod platform;
mod render;
mod requirements;

// Re-export main types
pub use error::{ComposeError, Warning};
pub use plan::{ActivationPlan, EnvVar, Hook, Script};
pub use platform::{Arch, Os, Platform, PlatformFilter};
pub use render::render;
pub use requirements::{
    EnvValue, HookSpec, LanguageSpec, PackageEntry, PackageManagerSpec, RequirementSet,
    ScriptSpec, CONFIG_FILE,
};
