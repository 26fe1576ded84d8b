//! Declared extension modules
//!
//! The set is fixed: one module per backend engine plus the Arrow Flight
//! client. Engines are switched on or off only through the configure flags;
//! every entry is always attempted, so a missing engine dependency fails the
//! build instead of silently dropping a module.

use super::types::{BuildError, ExtensionSpec};
use std::path::Path;

/// Extension names in build order.
pub const EXTENSION_NAMES: [&str; 4] = [
    "ukv.umem",
    "ukv.rocksdb",
    "ukv.leveldb",
    "ukv.flight_client",
];

/// All extensions, built from the single native tree at `source_dir`.
#[must_use]
pub fn declared_extensions(source_dir: &Path) -> Vec<ExtensionSpec> {
    EXTENSION_NAMES
        .iter()
        .map(|name| ExtensionSpec::new(*name, source_dir))
        .collect()
}

/// Keep only the named extensions, in declaration order.
///
/// An empty `names` keeps everything.
///
/// # Errors
///
/// Returns [`BuildError::UnknownExtension`] for a name that is not declared.
pub fn select(
    specs: Vec<ExtensionSpec>,
    names: &[impl AsRef<str>],
) -> Result<Vec<ExtensionSpec>, BuildError> {
    if names.is_empty() {
        return Ok(specs);
    }

    if let Some(unknown) = names
        .iter()
        .map(|name| name.as_ref())
        .find(|name| !specs.iter().any(|spec| spec.name() == *name))
    {
        return Err(BuildError::UnknownExtension(unknown.to_string()));
    }

    Ok(specs
        .into_iter()
        .filter(|spec| names.iter().any(|name| name.as_ref() == spec.name()))
        .collect())
}
