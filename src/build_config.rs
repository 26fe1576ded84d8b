//! Build configuration resolution
//!
//! Everything the `CMake` steps need that does not depend on which extension
//! is being built: job count, shared configure flags, build-step flags and
//! target architectures. Resolved once, before the first extension, and
//! shared read-only afterwards.

use crate::env_vars::{self, Env};
use crate::extensions::BuildError;
use crate::platform::Host;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

/// Feature switches for every backend engine and for the Python SDK itself.
pub const FEATURE_FLAGS: [&str; 5] = [
    "-DUKV_BUILD_ENGINE_UMEM=1",
    "-DUKV_BUILD_ENGINE_LEVELDB=1",
    "-DUKV_BUILD_ENGINE_ROCKSDB=1",
    "-DUKV_BUILD_API_FLIGHT_CLIENT=1",
    "-DUKV_BUILD_SDK_PYTHON=1",
];

static ARCH_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-arch\s+(\S+)").expect("arch flag pattern is valid"));

/// Inputs to resolution that come from the command line or config file
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Explicit job count; replaces the CPU-derived default
    pub jobs: Option<usize>,
    /// Python interpreter handed to `CMake` as `PYTHON_EXECUTABLE`
    pub python: String,
}

/// Fully resolved, immutable build parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Job count for the build step
    pub parallelism: usize,
    /// Configure arguments shared by every extension
    pub configure_args: Vec<String>,
    /// Extra arguments for `cmake --build`
    pub build_args: Vec<String>,
    /// Architectures requested through `ARCHFLAGS`, in order of appearance
    pub target_architectures: Vec<String>,
}

impl BuildConfig {
    /// Resolve the configuration from an environment and host description.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ArgsFile`] if `CMAKE_ARGS_F` names an unreadable file,
    /// or [`BuildError::InvalidEnv`] if an override is not valid Unicode.
    pub fn resolve(
        env: &impl Env,
        host: &Host,
        options: &ResolveOptions,
    ) -> Result<Self, BuildError> {
        let parallelism = options
            .jobs
            .unwrap_or_else(|| default_parallelism(host.logical_cpus));
        crate::debug!(
            "parallelism = {parallelism} ({} logical CPUs)",
            host.logical_cpus
        );

        let mut configure_args = vec![format!("-DPYTHON_EXECUTABLE={}", options.python)];
        configure_args.extend(FEATURE_FLAGS.iter().map(ToString::to_string));
        configure_args.extend(extra_configure_args(env)?);

        let target_architectures = if host.platform.supports_multi_arch() {
            parse_archflags(&env_vars::archflags(env)?)
        } else {
            Vec::new()
        };
        if !target_architectures.is_empty() {
            crate::debug!("target architectures: {}", target_architectures.join(", "));
            configure_args.push(format!(
                "-DCMAKE_OSX_ARCHITECTURES={}",
                target_architectures.join(";")
            ));
        }

        let mut build_args = Vec::new();
        if env_vars::build_parallel_level_set(env) {
            crate::debug!("CMAKE_BUILD_PARALLEL_LEVEL set; leaving job count to CMake");
        } else if parallelism > 0 {
            build_args.push(format!("-j{parallelism}"));
        }

        Ok(Self {
            parallelism,
            configure_args,
            build_args,
            target_architectures,
        })
    }
}

/// Half the logical processors, rounded down.
///
/// A single-CPU host yields zero, in which case no `-j` flag is passed.
#[must_use]
pub const fn default_parallelism(logical_cpus: usize) -> usize {
    logical_cpus / 2
}

/// Extra configure arguments from `CMAKE_ARGS`, or failing that from the file
/// named by `CMAKE_ARGS_F`. Only one source is ever consulted.
///
/// # Errors
///
/// Fails on a non-Unicode `CMAKE_ARGS` or an unreadable `CMAKE_ARGS_F` file.
pub fn extra_configure_args(env: &impl Env) -> Result<Vec<String>, BuildError> {
    if let Some(raw) = env_vars::cmake_args(env)? {
        crate::debug!("extra configure arguments from CMAKE_ARGS");
        return Ok(split_args(&raw));
    }

    if let Some(path) = env_vars::cmake_args_file(env).map(PathBuf::from) {
        crate::debug!("extra configure arguments from {}", path.display());
        let contents = fs::read_to_string(&path)
            .map_err(|source| BuildError::ArgsFile { path, source })?;
        return Ok(split_args(&contents));
    }

    Ok(Vec::new())
}

/// Split an argument string on whitespace, dropping empty tokens.
#[must_use]
pub fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Extract every `-arch <value>` from a compiler flag string, in order.
#[must_use]
pub fn parse_archflags(flags: &str) -> Vec<String> {
    ARCH_FLAG
        .captures_iter(flags)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Find the Python interpreter to hand to `CMake`.
/// Priority order:
/// 1. `PYTHON` environment variable
/// 2. `python` key of the config file
/// 3. `python3`, then `python`, in `PATH`
/// 4. The bare name `python3`
#[must_use]
pub fn resolve_interpreter(env: &impl Env, configured: Option<&str>) -> String {
    if let Some(python) = env_vars::python_executable(env) {
        return python;
    }
    if let Some(python) = configured {
        return python.to_string();
    }
    ["python3", "python"]
        .into_iter()
        .find_map(which)
        .unwrap_or_else(|| "python3".to_string())
}

/// Locate `program` in `PATH`.
pub(crate) fn which(program: &str) -> Option<String> {
    let output = Command::new("which").arg(program).output().ok()?;
    output.status.success().then_some(())?;
    let path = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!path.is_empty()).then_some(path)
}
