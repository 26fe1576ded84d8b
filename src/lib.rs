//! ukv-build internal library code
//!
//! Builds the UKV Python extension modules by driving `CMake` once per
//! backend engine.

pub mod build_config;
pub mod config;
pub mod debug;
pub mod env_vars;
pub mod extensions;
pub mod paths;
pub mod plan;
pub mod platform;

// Re-export common types for convenience
pub use build_config::{BuildConfig, ResolveOptions};
pub use config::Config;
pub use debug::{debug_log, init_debug, is_debug_enabled};
pub use env_vars::{Env, MapEnv, ProcessEnv};
pub use extensions::{
    BuildError, BuildMode, BuildOutcome, BuildSystem, CMakeBuildSystem, ExtensionBuilder,
    ExtensionSpec, build_extensions,
};
pub use paths::Layout;
pub use plan::{BuildPlan, PlanOptions};
pub use platform::{Host, HostPlatform};
