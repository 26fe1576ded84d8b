//! List command
//!
//! Show every declared extension with its `CMake` target and output directory

use anyhow::Result;
use ukv_build::BuildPlan;

/// List extensions in build order
#[allow(
    clippy::unnecessary_wraps,
    reason = "Result type maintained for consistency with command signature pattern"
)]
pub(crate) fn run(plan: &BuildPlan, names_only: bool) -> Result<()> {
    let builder = plan.builder();

    for spec in &plan.extensions {
        if names_only {
            println!("{spec}");
        } else {
            println!(
                "{:<20} {:<20} {}",
                spec.name(),
                spec.target_name(),
                builder.output_dir(spec).display()
            );
        }
    }

    Ok(())
}
