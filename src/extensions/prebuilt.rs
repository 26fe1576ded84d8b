//! Prebuilt artifact placement
//!
//! With `UKV_DEBUG_PYTHON` set, extensions are not compiled. Whatever an
//! earlier native build left in the prebuilt directory is copied, tree and
//! all, into the extension's output directory.

use super::types::BuildError;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copy `from` into `to`, creating `to` first.
///
/// Existing files are overwritten and symlinked directories are followed. If
/// `to` lies inside `from`, that subtree is skipped so the copy never feeds
/// on its own output.
///
/// # Returns
/// Number of files copied
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize, BuildError> {
    fs::create_dir_all(to).map_err(|source| BuildError::CreateDir {
        path: to.to_path_buf(),
        source,
    })?;

    if !from.is_dir() {
        return Err(BuildError::MissingPrebuilt(from.to_path_buf()));
    }

    let copy_err = |src: &Path, dst: &Path, source: std::io::Error| BuildError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    // Compared canonically: `to` may be spelled through `..` or a symlink
    let dest_canonical = to.canonicalize().map_err(|e| copy_err(from, to, e))?;

    let mut copied = 0;
    let walker = WalkDir::new(from)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .canonicalize()
                .map_or(true, |path| path != dest_canonical)
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            copy_err(&path, to, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| BuildError::CreateDir {
                path: target.clone(),
                source,
            })?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| BuildError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::copy(entry.path(), &target).map_err(|e| copy_err(entry.path(), &target, e))?;
            copied += 1;
        }
    }

    crate::debug!(
        "copied {copied} prebuilt file(s) from {} to {}",
        from.display(),
        to.display()
    );
    Ok(copied)
}
