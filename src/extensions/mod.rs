//! Native extension building
//!
//! Compiles the UKV native library into one Python extension module per
//! backend engine. Each extension is either:
//! - configured and built with `CMake` (`cmake <src>` + `cmake --build`)
//! - copied from an earlier native build (`UKV_DEBUG_PYTHON`)

pub mod builder;
pub mod cmake_extension;
pub mod prebuilt;
pub mod registry;
pub mod types;

pub use builder::{ExtensionBuilder, build_extensions, summarize};
pub use cmake_extension::{BuildSystem, CMakeBuildSystem, Invocation};
pub use prebuilt::copy_tree;
pub use registry::{EXTENSION_NAMES, declared_extensions, select};
pub use types::{
    BuildError, BuildMode, BuildOutcome, BuildStep, ExtensionSpec, NAMESPACE_PREFIX,
    TARGET_MARKER, target_name_for,
};
