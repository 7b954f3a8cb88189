use anyhow::Result;

use crate::Platform;

pub fn execute() -> Result<()> {
    let current = Platform::current();

    for platform in Platform::ALL {
        if current == Some(platform) {
            println!("* {platform} (current)");
        } else {
            println!("  {platform}");
        }
    }

    Ok(())
}
