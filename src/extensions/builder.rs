//! Extension Builder Orchestration
//!
//! Realizes each declared extension in order: either copies prebuilt
//! artifacts (debug short-circuit) or runs the `CMake` configure and build
//! steps. The first failure stops the run; extensions already placed stay
//! where they are.

use super::cmake_extension::BuildSystem;
use super::prebuilt::copy_tree;
use super::types::{BuildError, BuildMode, BuildOutcome, ExtensionSpec};
use crate::build_config::BuildConfig;
use crate::paths::Layout;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Builds one extension at a time against a shared configuration
#[derive(Debug)]
pub struct ExtensionBuilder<'a, B> {
    /// External build system
    build_system: B,
    /// Shared, already resolved configuration
    config: &'a BuildConfig,
    layout: &'a Layout,
    /// Copy prebuilt artifacts instead of compiling (`UKV_DEBUG_PYTHON`)
    skip_native: bool,
    /// Suppress progress output
    quiet: bool,
}

impl<'a, B: BuildSystem> ExtensionBuilder<'a, B> {
    /// Create a new extension builder.
    #[must_use]
    pub fn new(
        build_system: B,
        config: &'a BuildConfig,
        layout: &'a Layout,
        skip_native: bool,
    ) -> Self {
        Self {
            build_system,
            config,
            layout,
            skip_native,
            quiet: false,
        }
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Absolute output directory for `spec`, with a trailing separator.
    #[must_use]
    pub fn output_dir(&self, spec: &ExtensionSpec) -> PathBuf {
        spec.output_dir(&absolute(&self.layout.build_lib))
    }

    /// Configure arguments for `spec`: output bindings first, then the shared set.
    #[must_use]
    pub fn configure_args(&self, spec: &ExtensionSpec) -> Vec<String> {
        let output_dir = self.output_dir(spec);
        let mut args = vec![
            format!("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}", output_dir.display()),
            format!("-DCMAKE_ARCHIVE_OUTPUT_DIRECTORY={}", output_dir.display()),
        ];
        args.extend(self.config.configure_args.iter().cloned());
        args
    }

    /// Realize one extension.
    ///
    /// # Errors
    ///
    /// Returns the first failing step. A failed configure never reaches the
    /// build step.
    pub fn build(&mut self, spec: &ExtensionSpec) -> Result<BuildOutcome, BuildError> {
        let start_time = Instant::now();
        let output_dir = self.output_dir(spec);

        if self.skip_native {
            crate::debug!("UKV_DEBUG_PYTHON set; skipping native build of {spec}");
            if !self.quiet {
                println!(
                    "Copying prebuilt {spec} from {}",
                    self.layout.prebuilt_dir.display()
                );
            }
            copy_tree(&self.layout.prebuilt_dir, &output_dir)?;
            return Ok(BuildOutcome {
                extension: spec.name().to_string(),
                output_dir,
                mode: BuildMode::CopiedPrebuilt,
                duration: start_time.elapsed(),
            });
        }

        let target = spec.target_name();
        if !self.quiet {
            println!("Building {spec} (target {target})");
        }

        let configure_args = self.configure_args(spec);
        self.build_system.configure(
            spec.name(),
            spec.source_dir(),
            &configure_args,
            &self.layout.build_dir,
        )?;
        self.build_system.build(
            spec.name(),
            &target,
            &self.config.build_args,
            &self.layout.build_dir,
        )?;

        Ok(BuildOutcome {
            extension: spec.name().to_string(),
            output_dir,
            mode: BuildMode::Compiled,
            duration: start_time.elapsed(),
        })
    }

    /// Consume the builder, returning the build system (useful for inspecting fakes).
    pub fn into_build_system(self) -> B {
        self.build_system
    }
}

/// Get summary statistics.
///
/// # Returns
/// (`compiled_count`, `copied_count`, `total_duration`)
#[must_use]
pub fn summarize(outcomes: &[BuildOutcome]) -> (usize, usize, Duration) {
    let compiled = outcomes
        .iter()
        .filter(|o| o.mode == BuildMode::Compiled)
        .count();
    let copied = outcomes.len() - compiled;
    let total_duration = outcomes.iter().map(|o| o.duration).sum();

    (compiled, copied, total_duration)
}

/// Build every extension in order, stopping at the first failure.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ukv_build::env_vars::ProcessEnv;
/// use ukv_build::extensions::{
///     CMakeBuildSystem, ExtensionBuilder, build_extensions, declared_extensions,
/// };
/// use ukv_build::paths::Layout;
/// use ukv_build::platform::Host;
/// use ukv_build::{BuildConfig, ResolveOptions};
///
/// let root = Path::new("/src/ukv");
/// let options = ResolveOptions { jobs: None, python: "python3".into() };
/// let config = BuildConfig::resolve(&ProcessEnv, &Host::detect(), &options)?;
/// let layout = Layout::for_project(root);
/// let mut builder = ExtensionBuilder::new(CMakeBuildSystem::new("cmake"), &config, &layout, false);
///
/// for outcome in build_extensions(&mut builder, &declared_extensions(root))? {
///     println!("{} -> {}", outcome.extension, outcome.output_dir.display());
/// }
/// # Ok::<(), ukv_build::extensions::BuildError>(())
/// ```
pub fn build_extensions<B: BuildSystem>(
    builder: &mut ExtensionBuilder<'_, B>,
    specs: &[ExtensionSpec],
) -> Result<Vec<BuildOutcome>, BuildError> {
    let mut outcomes = Vec::with_capacity(specs.len());
    for spec in specs {
        outcomes.push(builder.build(spec)?);
    }
    Ok(outcomes)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
