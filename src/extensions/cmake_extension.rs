//! `CMake` extension building
//!
//! Drives `CMake` through its two-step command-line protocol:
//! ```bash
//! cmake <source-dir> -DKEY=VALUE ...
//! cmake --build . --target <target> -jN
//! ```
//! Both steps run in the build directory with inherited stdio, so compiler
//! diagnostics reach the terminal unchanged.

use super::types::{BuildError, BuildStep};
use crate::build_config::which;
use crate::env_vars::{self, Env};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The external build system, reduced to the two calls the orchestrator makes
pub trait BuildSystem {
    /// Generate the build tree for `source_dir` inside `build_dir`.
    fn configure(
        &mut self,
        extension: &str,
        source_dir: &Path,
        args: &[String],
        build_dir: &Path,
    ) -> Result<(), BuildError>;

    /// Build one target of the tree previously configured in `build_dir`.
    fn build(
        &mut self,
        extension: &str,
        target: &str,
        args: &[String],
        build_dir: &Path,
    ) -> Result<(), BuildError>;
}

/// One fully spelled-out command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl Invocation {
    /// Command line for the configure step.
    #[must_use]
    pub fn configure(program: &str, source_dir: &Path, args: &[String], build_dir: &Path) -> Self {
        let mut argv = vec![source_dir.display().to_string()];
        argv.extend_from_slice(args);
        Self {
            program: program.to_string(),
            args: argv,
            cwd: build_dir.to_path_buf(),
        }
    }

    /// Command line for the build step.
    #[must_use]
    pub fn build(program: &str, target: &str, args: &[String], build_dir: &Path) -> Self {
        let mut argv = vec![
            "--build".to_string(),
            ".".to_string(),
            "--target".to_string(),
            target.to_string(),
        ];
        argv.extend_from_slice(args);
        Self {
            program: program.to_string(),
            args: argv,
            cwd: build_dir.to_path_buf(),
        }
    }

    /// Run to completion and map a non-zero exit to [`BuildError::CommandFailed`].
    pub fn run(&self, step: BuildStep, extension: &str) -> Result<(), BuildError> {
        crate::debug!("running in {}: {self}", self.cwd.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .status()
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                extension: extension.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                step,
                extension: extension.to_string(),
                status: status.code(),
            })
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Real `CMake` executable
#[derive(Debug, Clone)]
pub struct CMakeBuildSystem {
    /// Path to `CMake` executable
    cmake_path: String,
}

impl CMakeBuildSystem {
    #[must_use]
    pub fn new(cmake_path: impl Into<String>) -> Self {
        Self {
            cmake_path: cmake_path.into(),
        }
    }

    /// Locate `CMake` on the system.
    /// Priority order:
    /// 1. `CMAKE` environment variable
    /// 2. `cmake` key of the config file
    /// 3. `cmake` in `PATH`
    /// 4. The bare name `cmake`, left for the OS to resolve
    #[must_use]
    pub fn locate(env: &impl Env, configured: Option<&str>) -> Self {
        let cmake_path = env_vars::cmake_executable(env)
            .or_else(|| configured.map(ToString::to_string))
            .or_else(|| which("cmake"))
            .unwrap_or_else(|| "cmake".to_string());
        Self::new(cmake_path)
    }

    #[must_use]
    pub fn cmake_path(&self) -> &str {
        &self.cmake_path
    }
}

impl BuildSystem for CMakeBuildSystem {
    fn configure(
        &mut self,
        extension: &str,
        source_dir: &Path,
        args: &[String],
        build_dir: &Path,
    ) -> Result<(), BuildError> {
        std::fs::create_dir_all(build_dir).map_err(|source| BuildError::CreateDir {
            path: build_dir.to_path_buf(),
            source,
        })?;
        Invocation::configure(&self.cmake_path, source_dir, args, build_dir)
            .run(BuildStep::Configure, extension)
    }

    fn build(
        &mut self,
        extension: &str,
        target: &str,
        args: &[String],
        build_dir: &Path,
    ) -> Result<(), BuildError> {
        Invocation::build(&self.cmake_path, target, args, build_dir)
            .run(BuildStep::Build, extension)
    }
}
