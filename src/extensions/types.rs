//! Extension type definitions
//!
//! An extension is one Python-importable module compiled from the UKV native
//! tree. Each one maps to a single `CMake` target and lands in a directory
//! the packaging layer derives from its dotted name.

use crate::paths::with_trailing_separator;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Namespace prefix shared by every declared extension name.
pub const NAMESPACE_PREFIX: &str = "ukv.";

/// Prefix of the `CMake` targets that build Python extensions.
pub const TARGET_MARKER: &str = "py_";

/// Map a dotted extension name to its `CMake` target.
///
/// `ukv.umem` becomes `py_umem`. Names outside the namespace keep their full
/// text behind the marker, so every input has exactly one target.
#[must_use]
pub fn target_name_for(extension_name: &str) -> String {
    let bare = extension_name
        .strip_prefix(NAMESPACE_PREFIX)
        .unwrap_or(extension_name);
    format!("{TARGET_MARKER}{bare}")
}

/// One loadable extension module and the native tree that builds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSpec {
    /// Dotted module name, e.g. `ukv.rocksdb`
    name: String,
    /// Root of the native source tree (contains `CMakeLists.txt`)
    source_dir: PathBuf,
}

impl ExtensionSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Internal `CMake` target for this extension.
    #[must_use]
    pub fn target_name(&self) -> String {
        target_name_for(&self.name)
    }

    /// Directory the compiled module must land in.
    ///
    /// Mirrors the packaging convention: `ukv.umem` installs as
    /// `<build_lib>/ukv/umem.<abi-suffix>`, so artifacts go to
    /// `<build_lib>/ukv/`. Always ends with a path separator.
    #[must_use]
    pub fn output_dir(&self, build_lib: &Path) -> PathBuf {
        let mut dir = build_lib.to_path_buf();
        let mut components: Vec<&str> = self.name.split('.').collect();
        components.pop();
        for component in components {
            dir.push(component);
        }
        with_trailing_separator(dir)
    }
}

impl fmt::Display for ExtensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How an extension ended up in its output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Configured and built through `CMake`
    Compiled,
    /// Copied from a previous native build (`UKV_DEBUG_PYTHON`)
    CopiedPrebuilt,
}

impl BuildMode {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Compiled => "compiled",
            Self::CopiedPrebuilt => "copied prebuilt artifacts",
        }
    }
}

/// Result of realizing one extension
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Extension name
    pub extension: String,
    /// Where the artifacts were placed
    pub output_dir: PathBuf,
    pub mode: BuildMode,
    pub duration: Duration,
}

/// Which half of the two-step `CMake` protocol was running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Configure,
    Build,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => f.write_str("configure"),
            Self::Build => f.write_str("build"),
        }
    }
}

/// Fatal errors raised while configuring or building extensions
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to read CMake arguments file {path}: {source}")]
    ArgsFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Environment variable {key} is not valid Unicode")]
    InvalidEnv { key: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("Failed to run {program} for {extension}: {source}")]
    Spawn {
        program: String,
        extension: String,
        #[source]
        source: io::Error,
    },

    #[error("CMake {step} step failed for {extension} ({})", describe_status(.status.as_ref()))]
    CommandFailed {
        step: BuildStep,
        extension: String,
        status: Option<i32>,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Prebuilt artifact directory not found: {0}")]
    MissingPrebuilt(PathBuf),

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Process exit code that best represents this error.
    ///
    /// A failed child's own exit code is passed through.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_status(status: Option<&i32>) -> String {
    status.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}
