use serde::Serialize;

use crate::error::{ComposeError, Warning};
use crate::platform::{Platform, PlatformFilter};
use crate::requirements::{EnvValue, PackageEntry, RequirementSet};

/// A resolved environment variable with the section that defined it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    pub source: String,
}

/// A hook registration carried into the activation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hook {
    pub name: String,
    pub command: String,
}

/// A runnable alias: a named script, or an enabled hook exposed for manual runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    pub name: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: String,
}

/// The resolved, platform-specific, conflict-free flattening of a
/// [`RequirementSet`]. Derived fresh per resolution and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationPlan {
    pub platform: Platform,
    pub packages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    pub env: Vec<EnvVar>,
    pub hooks: Vec<Hook>,
    pub scripts: Vec<Script>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl RequirementSet {
    /// Resolve this requirement set into an activation plan for `platform`.
    ///
    /// Pure and deterministic: identical inputs produce identical plans, and
    /// a validation failure never leaves a partial plan behind. Package merge
    /// order is languages (name order, toolchain before its package manager),
    /// then hook packages, then the explicit `packages` list in file order,
    /// de-duplicated keeping the first occurrence.
    pub fn resolve(&self, platform: Platform) -> Result<ActivationPlan, ComposeError> {
        let mut warnings = self.unknown_field_warnings();

        let mut packages = Vec::new();
        for (name, language) in &self.languages {
            if !language.enable {
                continue;
            }
            push_unique(&mut packages, language.toolchain_package(name));
            if let Some(manager) = &language.package_manager {
                push_unique(&mut packages, manager.package());
            }
        }
        for hook in self.hooks.values().filter(|hook| hook.enable) {
            for package in &hook.packages {
                push_unique(&mut packages, package.clone());
            }
        }
        for entry in &self.packages {
            if entry_applies(entry, platform)? {
                push_unique(&mut packages, entry.name().to_string());
            }
        }

        let mut path = Vec::new();
        for dir in &self.path {
            push_unique(&mut path, dir.clone());
        }

        let mut env: Vec<EnvVar> = Vec::new();
        for (name, language) in &self.languages {
            if !language.enable {
                continue;
            }
            let source = format!("languages.{name}");
            for (var, value) in &language.env {
                if let Some(resolved) =
                    select_env_value(var, value, &source, platform, &mut warnings)?
                {
                    insert_env(&mut env, var, resolved, &source)?;
                }
            }
        }
        for (var, value) in &self.env {
            if let Some(resolved) = select_env_value(var, value, "env", platform, &mut warnings)? {
                insert_env(&mut env, var, resolved, "env")?;
            }
        }

        let hooks: Vec<Hook> = self
            .hooks
            .iter()
            .filter(|(_, hook)| hook.enable)
            .map(|(name, hook)| Hook {
                name: name.clone(),
                command: hook.command.clone(),
            })
            .collect();

        let mut scripts = Vec::new();
        for (name, spec) in &self.scripts {
            push_script(
                &mut scripts,
                Script {
                    name: name.clone(),
                    command: spec.exec().to_string(),
                    description: spec.description().map(str::to_string),
                    source: format!("scripts.{name}"),
                },
            )?;
        }
        for hook in &hooks {
            push_script(
                &mut scripts,
                Script {
                    name: hook.name.clone(),
                    command: hook.command.clone(),
                    description: None,
                    source: format!("hooks.{}", hook.name),
                },
            )?;
        }

        tracing::debug!(
            platform = %platform,
            packages = packages.len(),
            env = env.len(),
            scripts = scripts.len(),
            "resolved activation plan"
        );

        Ok(ActivationPlan {
            platform,
            packages,
            path,
            env,
            hooks,
            scripts,
            warnings,
        })
    }
}

/// Stable de-duplication: keep the first occurrence, preserve order.
fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|existing| *existing == value) {
        list.push(value);
    }
}

fn entry_applies(entry: &PackageEntry, platform: Platform) -> Result<bool, ComposeError> {
    let filters = entry.platforms();
    if filters.is_empty() {
        return Ok(true);
    }

    for raw in filters {
        let filter =
            PlatformFilter::parse(raw).ok_or_else(|| ComposeError::InvalidPlatformFilter {
                entry: format!("packages.{}", entry.name()),
                filter: raw.clone(),
            })?;
        if filter.matches(platform) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Pick the value of an env var for the target platform.
///
/// Literal values pass through. Per-platform values select the branch whose
/// filter matches; two matching branches with divergent values are a conflict,
/// and no matching branch omits the variable with a warning.
fn select_env_value(
    name: &str,
    value: &EnvValue,
    source: &str,
    platform: Platform,
    warnings: &mut Vec<Warning>,
) -> Result<Option<String>, ComposeError> {
    let branches = match value {
        EnvValue::Literal(text) => return Ok(Some(text.clone())),
        EnvValue::PerPlatform(branches) => branches,
    };

    let entry = format!("{source}.{name}");
    let mut selected: Option<(&str, &str)> = None;

    for (key, text) in branches {
        let filter =
            PlatformFilter::parse(key).ok_or_else(|| ComposeError::InvalidPlatformFilter {
                entry: entry.clone(),
                filter: key.clone(),
            })?;
        if !filter.matches(platform) {
            continue;
        }

        match selected {
            Some((first_key, first_value)) if first_value != text => {
                return Err(ComposeError::EnvConflict {
                    name: name.to_string(),
                    first_source: format!("{entry}.{first_key}"),
                    first_value: first_value.to_string(),
                    second_source: format!("{entry}.{key}"),
                    second_value: text.clone(),
                });
            }
            Some(_) => {}
            None => selected = Some((key, text)),
        }
    }

    if selected.is_none() {
        warnings.push(Warning::NoPlatformBranch { entry, platform });
    }

    Ok(selected.map(|(_, text)| text.to_string()))
}

fn insert_env(
    env: &mut Vec<EnvVar>,
    name: &str,
    value: String,
    source: &str,
) -> Result<(), ComposeError> {
    if let Some(existing) = env.iter().find(|var| var.name == name) {
        if existing.value == value {
            return Ok(());
        }
        return Err(ComposeError::EnvConflict {
            name: name.to_string(),
            first_source: existing.source.clone(),
            first_value: existing.value.clone(),
            second_source: source.to_string(),
            second_value: value,
        });
    }

    env.push(EnvVar {
        name: name.to_string(),
        value,
        source: source.to_string(),
    });
    Ok(())
}

fn push_script(scripts: &mut Vec<Script>, script: Script) -> Result<(), ComposeError> {
    if let Some(existing) = scripts.iter().find(|entry| entry.name == script.name) {
        return Err(ComposeError::DuplicateScript {
            name: script.name,
            first_source: existing.source.clone(),
            second_source: script.source,
        });
    }

    scripts.push(script);
    Ok(())
}
