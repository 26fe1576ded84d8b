//! Build planning
//!
//! Collects everything one run needs: the project layout, the resolved
//! [`BuildConfig`], the selected extensions and the `CMake` executable. The
//! plan is immutable once prepared; `build` executes it, `plan` prints it.

use crate::build_config::{BuildConfig, ResolveOptions, resolve_interpreter};
use crate::config::Config;
use crate::env_vars::{self, Env};
use crate::extensions::{
    BuildError, CMakeBuildSystem, ExtensionBuilder, ExtensionSpec, Invocation,
    declared_extensions, select,
};
use crate::paths::{Layout, find_project_root_from, resolve_against, with_trailing_separator};
use crate::platform::Host;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Command-line inputs to planning
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Project root; discovered from the working directory when absent
    pub project_dir: Option<PathBuf>,
    /// Explicit config file
    pub config_file: Option<PathBuf>,
    pub build_lib: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub prebuilt_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    /// Restrict the run to these extensions (all when empty)
    pub only: Vec<String>,
}

/// Everything needed to build the selected extensions
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub layout: Layout,
    pub config: BuildConfig,
    pub extensions: Vec<ExtensionSpec>,
    /// `UKV_DEBUG_PYTHON` was set
    pub skip_native: bool,
    pub cmake: CMakeBuildSystem,
}

/// One extension as it would be realized
#[derive(Debug, Clone, Serialize)]
pub struct PlannedExtension {
    pub name: String,
    pub target: String,
    pub output_dir: PathBuf,
    /// Empty when the native build is skipped
    pub commands: Vec<Invocation>,
}

/// Serializable view of a plan, for `plan --json`
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport<'a> {
    pub project_root: &'a Path,
    pub build_dir: &'a Path,
    pub skip_native: bool,
    pub prebuilt_dir: &'a Path,
    pub config: &'a BuildConfig,
    pub extensions: Vec<PlannedExtension>,
}

impl BuildPlan {
    /// Resolve a plan. Precedence: command line, then environment, then
    /// config file, then defaults.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or malformed config file, an unreadable
    /// `CMAKE_ARGS_F` file, or an unknown `--only` name.
    pub fn prepare(
        env: &impl Env,
        host: &Host,
        cwd: &Path,
        options: &PlanOptions,
    ) -> Result<Self, BuildError> {
        let project_root = options.project_dir.as_ref().map_or_else(
            || find_project_root_from(cwd),
            |dir| resolve_against(cwd, dir),
        );
        crate::debug!("project root: {}", project_root.display());

        let config_file = options
            .config_file
            .as_ref()
            .map(|path| resolve_against(cwd, path));
        let file = Config::load(&project_root, config_file.as_deref())?;
        let mut layout = file.layout(&project_root);
        if let Some(build_lib) = &options.build_lib {
            layout.build_lib = resolve_against(cwd, build_lib);
        }
        if let Some(build_dir) = &options.build_dir {
            layout.build_dir = resolve_against(cwd, build_dir);
        }
        if let Some(prebuilt_dir) = &options.prebuilt_dir {
            layout.prebuilt_dir = with_trailing_separator(resolve_against(cwd, prebuilt_dir));
        }

        let resolve_options = ResolveOptions {
            jobs: options.jobs.or(file.jobs),
            python: resolve_interpreter(env, file.python.as_deref()),
        };
        let config = BuildConfig::resolve(env, host, &resolve_options)?;

        let extensions = select(declared_extensions(&project_root), &options.only)?;
        let skip_native = env_vars::debug_skip_native(env);
        let cmake = CMakeBuildSystem::locate(env, file.cmake.as_deref());

        Ok(Self {
            layout,
            config,
            extensions,
            skip_native,
            cmake,
        })
    }

    /// Builder wired to the real `CMake`.
    #[must_use]
    pub fn builder(&self) -> ExtensionBuilder<'_, CMakeBuildSystem> {
        ExtensionBuilder::new(
            self.cmake.clone(),
            &self.config,
            &self.layout,
            self.skip_native,
        )
    }

    /// The exact command lines each extension would run.
    #[must_use]
    pub fn planned_extensions(&self) -> Vec<PlannedExtension> {
        let builder = self.builder();
        self.extensions
            .iter()
            .map(|spec| {
                let target = spec.target_name();
                let commands = if self.skip_native {
                    Vec::new()
                } else {
                    vec![
                        Invocation::configure(
                            self.cmake.cmake_path(),
                            spec.source_dir(),
                            &builder.configure_args(spec),
                            &self.layout.build_dir,
                        ),
                        Invocation::build(
                            self.cmake.cmake_path(),
                            &target,
                            &self.config.build_args,
                            &self.layout.build_dir,
                        ),
                    ]
                };
                PlannedExtension {
                    name: spec.name().to_string(),
                    target,
                    output_dir: builder.output_dir(spec),
                    commands,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn report(&self) -> PlanReport<'_> {
        PlanReport {
            project_root: &self.layout.project_root,
            build_dir: &self.layout.build_dir,
            skip_native: self.skip_native,
            prebuilt_dir: &self.layout.prebuilt_dir,
            config: &self.config,
            extensions: self.planned_extensions(),
        }
    }
}
