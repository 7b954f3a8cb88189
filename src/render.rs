use std::fmt::Write;

use crate::plan::ActivationPlan;

/// Render an activation plan as POSIX shell text.
///
/// Pure serialization: env exports first, then a single ordered `PATH`
/// prepend, the package sequence for the external fetch step, hook
/// registrations, and script aliases. Ordering follows the plan exactly
/// since `PATH`-like values are order-sensitive.
pub fn render(plan: &ActivationPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# dsh activation ({})", plan.platform);

    for var in &plan.env {
        let _ = writeln!(out, "export {}={}", var.name, quote(&var.value));
    }

    if !plan.path.is_empty() {
        let _ = writeln!(out, "export PATH={}:\"$PATH\"", quote(&plan.path.join(":")));
    }

    if !plan.packages.is_empty() {
        let _ = writeln!(out, "export DSH_PACKAGES={}", quote(&plan.packages.join(" ")));
    }

    for hook in &plan.hooks {
        let _ = writeln!(
            out,
            "dsh_register_hook {} {}",
            quote(&hook.name),
            quote(&hook.command)
        );
    }

    for script in &plan.scripts {
        let _ = writeln!(out, "alias {}={}", script.name, quote(&script.command));
    }

    out
}

/// Single-quote a value for sh, escaping embedded single quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
