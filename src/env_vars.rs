//! Build environment variable handling.
//!
//! All lookups go through the [`Env`] trait so configuration can be resolved
//! against a synthetic environment in tests instead of mutating the process
//! environment.

use crate::extensions::BuildError;
use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};

/// Presence-only flag: copy prebuilt artifacts instead of compiling.
pub const UKV_DEBUG_PYTHON: &str = "UKV_DEBUG_PYTHON";

/// Raw, whitespace-separated extra `CMake` configure arguments.
pub const CMAKE_ARGS: &str = "CMAKE_ARGS";

/// Path to a file holding extra `CMake` configure arguments.
pub const CMAKE_ARGS_F: &str = "CMAKE_ARGS_F";

/// Presence-only: `CMake` picks the job count itself, so no `-j` is passed.
pub const CMAKE_BUILD_PARALLEL_LEVEL: &str = "CMAKE_BUILD_PARALLEL_LEVEL";

/// macOS compiler architecture flags (`-arch arm64 -arch x86_64`).
pub const ARCHFLAGS: &str = "ARCHFLAGS";

/// Override for the `CMake` executable.
pub const CMAKE: &str = "CMAKE";

/// Override for the Python interpreter passed to `CMake`.
pub const PYTHON: &str = "PYTHON";

/// Read-only view of an environment.
pub trait Env {
    /// Raw value of `key`, or `None` when unset.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Value of `key`, or `None` when unset or not valid Unicode.
    fn var(&self, key: &str) -> Option<String> {
        self.var_os(key).and_then(|value| value.into_string().ok())
    }

    /// Whether `key` is set at all, regardless of its value.
    fn is_set(&self, key: &str) -> bool {
        self.var_os(key).is_some()
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }
}

/// In-memory environment, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.vars.insert(key.to_string(), value.as_ref().to_os_string());
        self
    }
}

impl<K: Into<String>, V: AsRef<OsStr>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.as_ref().to_os_string()))
                .collect(),
        }
    }
}

impl Env for MapEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

impl<E: Env + ?Sized> Env for &E {
    fn var_os(&self, key: &str) -> Option<OsString> {
        (**self).var_os(key)
    }
}

/// Value of `key` when it must be Unicode if set.
///
/// # Errors
///
/// Returns [`BuildError::InvalidEnv`] for a set but non-Unicode value.
pub fn required_unicode(env: &impl Env, key: &str) -> Result<Option<String>, BuildError> {
    env.var_os(key)
        .map(|value| {
            value.into_string().map_err(|_| BuildError::InvalidEnv {
                key: key.to_string(),
            })
        })
        .transpose()
}

// Native build control

/// Check if the native build should be skipped in favor of copying prebuilt artifacts.
pub fn debug_skip_native(env: &impl Env) -> bool {
    env.is_set(UKV_DEBUG_PYTHON)
}

/// Get extra configure arguments passed inline.
///
/// # Errors
///
/// Fails when `CMAKE_ARGS` is set but not valid Unicode.
pub fn cmake_args(env: &impl Env) -> Result<Option<String>, BuildError> {
    required_unicode(env, CMAKE_ARGS)
}

/// Get the path of a file holding extra configure arguments.
pub fn cmake_args_file(env: &impl Env) -> Option<OsString> {
    env.var_os(CMAKE_ARGS_F)
}

/// Check if `CMake` was told the build parallelism explicitly.
pub fn build_parallel_level_set(env: &impl Env) -> bool {
    env.is_set(CMAKE_BUILD_PARALLEL_LEVEL)
}

/// Get architecture flags (empty string when unset).
///
/// # Errors
///
/// Fails when `ARCHFLAGS` is set but not valid Unicode.
pub fn archflags(env: &impl Env) -> Result<String, BuildError> {
    Ok(required_unicode(env, ARCHFLAGS)?.unwrap_or_default())
}

// Tool locations

/// Get the `CMake` executable override.
pub fn cmake_executable(env: &impl Env) -> Option<String> {
    env.var(CMAKE).filter(|s| !s.is_empty())
}

/// Get the Python interpreter override.
pub fn python_executable(env: &impl Env) -> Option<String> {
    env.var(PYTHON).filter(|s| !s.is_empty())
}
