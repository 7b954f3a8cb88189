use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ComposeError, Warning};

/// File name looked up in the working directory and its ancestors.
pub const CONFIG_FILE: &str = "devshell.toml";

fn default_true() -> bool {
    true
}

/// The declarative, author-maintained description of an environment's needs.
///
/// Loaded read-only from `devshell.toml`; resolution never mutates it.
/// Unknown fields land in `extras` and surface as warnings rather than
/// failing the parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementSet {
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageSpec>,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, EnvValue>,
    #[serde(default)]
    pub hooks: BTreeMap<String, HookSpec>,
    #[serde(default)]
    pub scripts: BTreeMap<String, ScriptSpec>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, toml::Value>,
}

impl RequirementSet {
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        let contents = fs::read_to_string(path).map_err(|source| ComposeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded requirement set");
        Self::from_toml(&contents, path)
    }

    pub fn from_toml(contents: &str, origin: &Path) -> Result<Self, ComposeError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(contents).map_err(|source| ComposeError::Parse {
            path: origin.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Locate `devshell.toml` in `start` or the nearest ancestor directory.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Warnings for fields the schema does not know about.
    pub fn unknown_field_warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();

        for field in self.extras.keys() {
            warnings.push(Warning::UnknownField {
                section: "top level".to_string(),
                field: field.clone(),
            });
        }

        for (name, language) in &self.languages {
            for field in language.extras.keys() {
                warnings.push(Warning::UnknownField {
                    section: format!("languages.{name}"),
                    field: field.clone(),
                });
            }
        }

        for (name, hook) in &self.hooks {
            for field in hook.extras.keys() {
                warnings.push(Warning::UnknownField {
                    section: format!("hooks.{name}"),
                    field: field.clone(),
                });
            }
        }

        warnings
    }
}

/// A language toolchain requested by the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSpec {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default, rename = "package-manager")]
    pub package_manager: Option<PackageManagerSpec>,
    #[serde(default)]
    pub env: BTreeMap<String, EnvValue>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, toml::Value>,
}

impl LanguageSpec {
    /// Package identifier implied by this toolchain, e.g. `rust@stable`.
    ///
    /// `version` wins over `channel` when both are present.
    pub fn toolchain_package(&self, name: &str) -> String {
        versioned(name, self.version.as_deref().or(self.channel.as_deref()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PackageManagerSpec {
    Name(String),
    Pinned {
        name: String,
        #[serde(default)]
        version: Option<String>,
    },
}

impl PackageManagerSpec {
    pub fn package(&self) -> String {
        match self {
            PackageManagerSpec::Name(name) => name.clone(),
            PackageManagerSpec::Pinned { name, version } => versioned(name, version.as_deref()),
        }
    }
}

fn versioned(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{name}@{version}"),
        None => name.to_string(),
    }
}

/// One entry in the ordered `packages` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    Name(String),
    Guarded {
        name: String,
        #[serde(default, alias = "platform")]
        platforms: Vec<String>,
    },
}

impl PackageEntry {
    pub fn name(&self) -> &str {
        match self {
            PackageEntry::Name(name) => name,
            PackageEntry::Guarded { name, .. } => name,
        }
    }

    /// Platform filters guarding this entry; empty means unconditional.
    pub fn platforms(&self) -> &[String] {
        match self {
            PackageEntry::Name(_) => &[],
            PackageEntry::Guarded { platforms, .. } => platforms,
        }
    }
}

/// An environment variable value: a literal, or one branch per platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    PerPlatform(BTreeMap<String, String>),
}

/// A lifecycle hook (e.g. pre-commit) registered by the activation script.
///
/// Enabled hooks also contribute their `packages` to the merge and are
/// exposed as runnable aliases alongside the named scripts.
#[derive(Debug, Clone, Deserialize)]
pub struct HookSpec {
    #[serde(default = "default_true")]
    pub enable: bool,
    pub command: String,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, toml::Value>,
}

/// A named convenience script, either a bare command or a detailed form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptSpec {
    Command(String),
    Detailed {
        exec: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl ScriptSpec {
    pub fn exec(&self) -> &str {
        match self {
            ScriptSpec::Command(command) => command,
            ScriptSpec::Detailed { exec, .. } => exec,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ScriptSpec::Command(_) => None,
            ScriptSpec::Detailed { description, .. } => description.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
packages = [
  "git",
  "jq",
  { name = "inotify-tools", platforms = ["linux-*"] },
]

path = ["node_modules/.bin"]

[languages.rust]
channel = "stable"

[languages.javascript]
version = "22"
package-manager = { name = "pnpm", version = "10" }

[env]
RUST_LOG = "info"

[env.LIBRARY_PATH]
"linux-*" = "/usr/lib"
"darwin-*" = "/opt/homebrew/lib"

[hooks.pre-commit]
command = "cargo fmt --check"
packages = ["rustfmt"]

[scripts]
test = "cargo test"

[scripts.dev]
description = "Run the app in watch mode"
exec = "pnpm dev"
"#;

    #[test]
    fn parses_full_configuration() {
        let set = RequirementSet::from_toml(SAMPLE, Path::new("devshell.toml")).unwrap();

        assert_eq!(set.packages.len(), 3);
        assert_eq!(set.packages[2].name(), "inotify-tools");
        assert_eq!(set.packages[2].platforms(), ["linux-*"]);
        assert_eq!(set.path, ["node_modules/.bin"]);

        let rust = &set.languages["rust"];
        assert!(rust.enable);
        assert_eq!(rust.toolchain_package("rust"), "rust@stable");

        let js = &set.languages["javascript"];
        assert_eq!(js.toolchain_package("javascript"), "javascript@22");
        assert_eq!(js.package_manager.as_ref().unwrap().package(), "pnpm@10");

        assert_eq!(set.env["RUST_LOG"], EnvValue::Literal("info".to_string()));
        assert!(matches!(set.env["LIBRARY_PATH"], EnvValue::PerPlatform(_)));

        let hook = &set.hooks["pre-commit"];
        assert!(hook.enable);
        assert_eq!(hook.command, "cargo fmt --check");
        assert_eq!(hook.packages, ["rustfmt"]);

        assert_eq!(set.scripts["test"].exec(), "cargo test");
        assert_eq!(set.scripts["dev"].exec(), "pnpm dev");
        assert_eq!(
            set.scripts["dev"].description(),
            Some("Run the app in watch mode")
        );
    }

    #[test]
    fn empty_contents_produce_empty_set() {
        let set = RequirementSet::from_toml("  \n", Path::new("devshell.toml")).unwrap();
        assert!(set.languages.is_empty());
        assert!(set.packages.is_empty());
        assert!(set.scripts.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error =
            RequirementSet::from_toml("packages = [", Path::new("devshell.toml")).unwrap_err();
        assert!(matches!(error, ComposeError::Parse { .. }));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn unknown_fields_become_warnings() {
        let contents = r#"
[languages.rust]
channel = "stable"
targets = ["wasm32-unknown-unknown"]

[telemetry]
enable = true
"#;
        let set = RequirementSet::from_toml(contents, Path::new("devshell.toml")).unwrap();
        let warnings = set.unknown_field_warnings();

        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&Warning::UnknownField {
            section: "top level".to_string(),
            field: "telemetry".to_string(),
        }));
        assert!(warnings.contains(&Warning::UnknownField {
            section: "languages.rust".to_string(),
            field: "targets".to_string(),
        }));
    }

    #[test]
    fn find_walks_up_to_the_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested = temp.path().join("crates/app/src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "packages = []\n").unwrap();

        let found = RequirementSet::find(&nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILE));
        assert_eq!(RequirementSet::find(Path::new("/nonexistent")), None);
    }
}
