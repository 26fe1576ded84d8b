//! Shared test helpers and utilities

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use ukv_build::env_vars::{CMAKE, PYTHON};
use ukv_build::extensions::{BuildError, BuildStep, BuildSystem};

/// Path to the compiled `ukv-build` binary
#[allow(dead_code)]
pub(crate) fn get_ukv_build_binary() -> &'static str {
    env!("CARGO_BIN_EXE_ukv-build")
}

/// `ukv-build` command with the debug and override variables cleared, so the
/// caller's environment cannot leak into assertions
#[allow(dead_code)]
pub(crate) fn ukv_build_command(project: &Path) -> Command {
    let mut cmd = Command::new(get_ukv_build_binary());
    cmd.current_dir(project)
        .env_remove("UKV_DEBUG_PYTHON")
        .env_remove("CMAKE_ARGS")
        .env_remove("CMAKE_ARGS_F")
        .env_remove("CMAKE_BUILD_PARALLEL_LEVEL")
        .env_remove("ARCHFLAGS")
        .env_remove("UKV_BUILD_DEBUG")
        .env(CMAKE, "cmake")
        .env(PYTHON, "/usr/bin/python3");
    cmd
}

/// Create a project root with a `CMakeLists.txt` and a prebuilt artifact tree
///
/// # Returns
/// The temporary project directory
#[allow(dead_code)]
pub(crate) fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    fs::write(root.join("CMakeLists.txt"), "project(ukv)\n").expect("Failed to write CMakeLists.txt");

    let prebuilt = root.join("build").join("lib");
    fs::create_dir_all(prebuilt.join("nested")).expect("Failed to create prebuilt dir");
    fs::write(prebuilt.join("libukv_embedded_umem.so"), b"umem").expect("Failed to write artifact");
    fs::write(prebuilt.join("nested").join("libarrow.so"), b"arrow")
        .expect("Failed to write artifact");

    temp_dir
}

/// One call received by [`RecordingBuildSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub(crate) enum Recorded {
    Configure { extension: String, args: Vec<String> },
    Build { extension: String, target: String, args: Vec<String> },
}

/// Build system fake that records every call and can fail on demand
#[derive(Debug, Default)]
#[allow(dead_code)]
pub(crate) struct RecordingBuildSystem {
    pub(crate) calls: Vec<Recorded>,
    /// Extension whose configure step exits non-zero
    pub(crate) fail_configure: Option<String>,
    /// Extension whose build step exits non-zero
    pub(crate) fail_build: Option<String>,
}

impl BuildSystem for RecordingBuildSystem {
    fn configure(
        &mut self,
        extension: &str,
        _source_dir: &Path,
        args: &[String],
        _build_dir: &Path,
    ) -> Result<(), BuildError> {
        self.calls.push(Recorded::Configure {
            extension: extension.to_string(),
            args: args.to_vec(),
        });
        if self.fail_configure.as_deref() == Some(extension) {
            return Err(BuildError::CommandFailed {
                step: BuildStep::Configure,
                extension: extension.to_string(),
                status: Some(1),
            });
        }
        Ok(())
    }

    fn build(
        &mut self,
        extension: &str,
        target: &str,
        args: &[String],
        _build_dir: &Path,
    ) -> Result<(), BuildError> {
        self.calls.push(Recorded::Build {
            extension: extension.to_string(),
            target: target.to_string(),
            args: args.to_vec(),
        });
        if self.fail_build.as_deref() == Some(extension) {
            return Err(BuildError::CommandFailed {
                step: BuildStep::Build,
                extension: extension.to_string(),
                status: Some(2),
            });
        }
        Ok(())
    }
}
