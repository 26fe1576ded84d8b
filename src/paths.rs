//! Path utilities for locating the native project and laying out build output.

use std::ffi::OsString;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// File that marks the root of the native source tree.
pub const PROJECT_MARKER: &str = "CMakeLists.txt";

/// Default install root for compiled extensions, relative to the project.
pub const DEFAULT_BUILD_LIB: &str = "build/python";

/// Default directory of artifacts from an earlier native build.
pub const DEFAULT_PREBUILT_DIR: &str = "build/lib";

/// Find the project root starting from `start`.
/// Walks up to the nearest directory containing `CMakeLists.txt`; falls back to `start`.
#[must_use]
pub fn find_project_root_from(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Find the project root from the current directory.
pub fn find_project_root() -> io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(find_project_root_from(&cwd))
}

/// Resolve `path` against `base` unless it is already absolute.
#[must_use]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Append a trailing separator so `CMake` treats the path as a directory.
#[must_use]
pub fn with_trailing_separator(path: PathBuf) -> PathBuf {
    if has_trailing_separator(&path) {
        return path;
    }
    let mut raw: OsString = path.into_os_string();
    raw.push(MAIN_SEPARATOR.to_string());
    PathBuf::from(raw)
}

/// Check whether the textual form of `path` ends with a separator.
#[must_use]
pub fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

/// Resolved filesystem layout for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Native source root, shared by every extension
    pub project_root: PathBuf,
    /// Install root; extensions land in `<build_lib>/<package>/`
    pub build_lib: PathBuf,
    /// Working directory for the `CMake` configure and build steps
    pub build_dir: PathBuf,
    /// Source of the debug short-circuit copy
    pub prebuilt_dir: PathBuf,
}

impl Layout {
    /// Default layout rooted at `project_root`.
    ///
    /// The build directory is the project root itself, matching an in-tree
    /// `cmake <root>` invocation.
    #[must_use]
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            build_lib: project_root.join(DEFAULT_BUILD_LIB),
            build_dir: project_root.to_path_buf(),
            prebuilt_dir: with_trailing_separator(project_root.join(DEFAULT_PREBUILT_DIR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn trailing_separator_added_once() {
        let once = with_trailing_separator(PathBuf::from("/tmp/out"));
        assert!(has_trailing_separator(&once));
        let twice = with_trailing_separator(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn project_root_found_in_ancestor() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_MARKER), "project(ukv)\n").unwrap();
        let nested = temp.path().join("python").join("ukv");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root_from(&nested), temp.path());
    }

    #[test]
    fn project_root_defaults_to_start() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("empty");
        fs::create_dir_all(&nested).unwrap();

        // No marker anywhere below the temp root; only ancestors outside it could match
        let root = find_project_root_from(&nested);
        assert!(root == nested || root.join(PROJECT_MARKER).is_file());
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let base = Path::new("/project");
        assert_eq!(
            resolve_against(base, Path::new("/elsewhere")),
            PathBuf::from("/elsewhere")
        );
        assert_eq!(
            resolve_against(base, Path::new("build")),
            PathBuf::from("/project/build")
        );
    }

    #[test]
    fn default_layout() {
        let layout = Layout::for_project(Path::new("/project"));
        assert_eq!(layout.build_lib, PathBuf::from("/project/build/python"));
        assert_eq!(layout.build_dir, PathBuf::from("/project"));
        assert!(has_trailing_separator(&layout.prebuilt_dir));
        assert!(layout.prebuilt_dir.starts_with("/project/build/lib"));
    }
}
