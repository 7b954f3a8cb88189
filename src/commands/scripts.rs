use anyhow::Result;
use std::path::Path;

use crate::{ui, RequirementSet};

pub fn execute(config: Option<&Path>) -> Result<()> {
    let path = super::locate_config(config)?;
    let requirements = RequirementSet::load(&path)?;

    if requirements.scripts.is_empty() {
        ui::info(format!("No scripts defined in {}", path.display()));
        return Ok(());
    }

    for (name, spec) in &requirements.scripts {
        let summary = spec.description().unwrap_or_else(|| spec.exec());
        println!("{name:<16} {summary}");
    }

    Ok(())
}
