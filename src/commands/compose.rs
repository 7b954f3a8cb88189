use anyhow::{Context, Result};
use std::path::Path;

use crate::{render, ui, RequirementSet};

pub fn execute(platform: Option<&str>, format: &str, config: Option<&Path>) -> Result<()> {
    let path = super::locate_config(config)?;
    let platform = super::target_platform(platform)?;

    let requirements = RequirementSet::load(&path)?;
    let plan = requirements.resolve(platform)?;

    for warning in &plan.warnings {
        ui::warn(warning);
    }

    match format {
        "shell" => print!("{}", render(&plan)),
        "json" => {
            let encoded = serde_json::to_string_pretty(&plan)
                .context("Failed to encode activation plan as JSON")?;
            println!("{encoded}");
        }
        other => anyhow::bail!("Unknown output format '{other}' (expected 'shell' or 'json')"),
    }

    Ok(())
}
