//! Configuration file management
//!
//! Reads the optional `ukv-build.toml` project file. Every key is optional;
//! environment variables and command-line flags take precedence over it.

use crate::extensions::BuildError;
use crate::paths::{Layout, resolve_against, with_trailing_separator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local config file.
pub const CONFIG_FILE_NAME: &str = "ukv-build.toml";

/// Build configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Install root for compiled extensions
    #[serde(default)]
    pub build_lib: Option<PathBuf>,

    /// Working directory for `CMake`
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Artifacts copied when `UKV_DEBUG_PYTHON` is set
    #[serde(default)]
    pub prebuilt_dir: Option<PathBuf>,

    /// `CMake` executable
    #[serde(default)]
    pub cmake: Option<String>,

    /// Python interpreter handed to `CMake`
    #[serde(default)]
    pub python: Option<String>,

    /// Parallel jobs for the build step
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration for a project.
    /// Priority: `custom_path` -> `<project>/ukv-build.toml` -> defaults.
    ///
    /// `custom_path` is used as given; callers resolve it against their own
    /// working directory. An explicitly requested file must exist, the
    /// project file is optional.
    pub fn load(project_root: &Path, custom_path: Option<&Path>) -> Result<Self, BuildError> {
        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let local = project_root.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from(&local);
        }

        Ok(Self::default())
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self, BuildError> {
        let contents = fs::read_to_string(path).map_err(|source| BuildError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| BuildError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config file contents.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply file overrides to the default layout of `project_root`.
    #[must_use]
    pub fn layout(&self, project_root: &Path) -> Layout {
        let mut layout = Layout::for_project(project_root);
        if let Some(build_lib) = &self.build_lib {
            layout.build_lib = resolve_against(project_root, build_lib);
        }
        if let Some(build_dir) = &self.build_dir {
            layout.build_dir = resolve_against(project_root, build_dir);
        }
        if let Some(prebuilt_dir) = &self.prebuilt_dir {
            layout.prebuilt_dir =
                with_trailing_separator(resolve_against(project_root, prebuilt_dir));
        }
        layout
    }
}
