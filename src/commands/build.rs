//! Build command
//!
//! Build every declared extension (or the `--only` subset) in order

use anyhow::Result;
use ukv_build::extensions::{build_extensions, summarize};
use ukv_build::{BuildMode, BuildPlan};

/// Execute a prepared plan against the real `CMake`.
pub(crate) fn run(plan: &BuildPlan, quiet: bool) -> Result<()> {
    let mut builder = plan.builder().quiet(quiet);
    let outcomes = build_extensions(&mut builder, &plan.extensions)?;

    if !quiet {
        for outcome in &outcomes {
            let verb = match outcome.mode {
                BuildMode::Compiled => "Built",
                BuildMode::CopiedPrebuilt => "Placed",
            };
            println!(
                "  {verb} {} -> {} ({:.1}s)",
                outcome.extension,
                outcome.output_dir.display(),
                outcome.duration.as_secs_f64()
            );
        }

        let (compiled, copied, total) = summarize(&outcomes);
        println!(
            "Done: {compiled} compiled, {copied} copied in {:.1}s",
            total.as_secs_f64()
        );
    }

    Ok(())
}
