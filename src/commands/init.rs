use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::ui;

// Starter configuration embedded at compile time
const TEMPLATE: &str = include_str!("../../templates/devshell.toml");

pub fn execute(force: bool) -> Result<()> {
    let path = Path::new(crate::CONFIG_FILE);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            crate::CONFIG_FILE
        );
    }

    fs::write(path, TEMPLATE)
        .with_context(|| format!("Failed to write {}", crate::CONFIG_FILE))?;

    ui::success("Created", crate::CONFIG_FILE);
    Ok(())
}
