//! Plan command
//!
//! Print the resolved configuration and the exact commands `build` would run

use anyhow::{Context, Result};
use ukv_build::BuildPlan;

/// Print the plan as text or JSON without running anything
pub(crate) fn run(plan: &BuildPlan, json: bool) -> Result<()> {
    let report = plan.report();

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize build plan")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Project:      {}", report.project_root.display());
    println!("Build dir:    {}", report.build_dir.display());
    println!("Parallelism:  {}", report.config.parallelism);
    if !report.config.target_architectures.is_empty() {
        println!(
            "Architectures: {}",
            report.config.target_architectures.join(", ")
        );
    }
    if report.skip_native {
        println!(
            "Native build skipped (UKV_DEBUG_PYTHON); copying from {}",
            report.prebuilt_dir.display()
        );
    }

    for extension in &report.extensions {
        println!();
        println!("{} ({})", extension.name, extension.target);
        println!("  output: {}", extension.output_dir.display());
        for command in &extension.commands {
            println!("  $ {command}");
        }
    }

    Ok(())
}
