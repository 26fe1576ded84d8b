//! Host platform detection
//!
//! Only two facts about the host matter to the build: whether it is macOS
//! (the one platform where `ARCHFLAGS` can request universal builds) and how
//! many logical processors it has.

use std::env;
use std::fmt;

/// Host operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Darwin,
    Linux,
    Windows,
    Other,
}

impl HostPlatform {
    /// Detect the platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    /// Map a Rust `target_os` string to a platform family.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "ios" => Self::Darwin,
            "linux" | "android" => Self::Linux,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Whether `CMake` honors `CMAKE_OSX_ARCHITECTURES` here.
    #[must_use]
    pub const fn supports_multi_arch(self) -> bool {
        matches!(self, Self::Darwin)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Other => env::consts::OS,
        };
        f.write_str(name)
    }
}

/// Snapshot of the host facts the configuration resolver needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    pub platform: HostPlatform,
    pub logical_cpus: usize,
}

impl Host {
    /// Detect the current host.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            platform: HostPlatform::current(),
            logical_cpus: num_cpus::get(),
        }
    }
}
