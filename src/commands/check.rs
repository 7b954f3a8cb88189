use anyhow::Result;
use std::path::Path;

use crate::{ui, Platform, RequirementSet};

/// Validate the configuration by resolving it for every supported platform,
/// so platform-conditional conflicts surface regardless of the host.
pub fn execute(config: Option<&Path>) -> Result<()> {
    let path = super::locate_config(config)?;
    let requirements = RequirementSet::load(&path)?;

    let mut issues = Vec::new();
    let mut warned = false;

    for platform in Platform::ALL {
        match requirements.resolve(platform) {
            Ok(plan) => {
                // Load-time warnings repeat per platform; report them once.
                if !warned {
                    for warning in &plan.warnings {
                        ui::warn(warning);
                    }
                    warned = true;
                }
            }
            Err(error) => issues.push(format!("{platform}: {error}")),
        }
    }

    if issues.is_empty() {
        ui::success(
            "Check",
            format!(
                "Validated {} for {} platform(s).",
                path.display(),
                Platform::ALL.len()
            ),
        );
        Ok(())
    } else {
        for issue in &issues {
            ui::error(issue);
        }
        anyhow::bail!("Validation failed ({} issue(s)).", issues.len());
    }
}
