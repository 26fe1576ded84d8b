//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_ukv_build_binary`)
//! - Fixture projects and a recording build system (via `helpers`)

pub(crate) mod helpers;

// Re-export get_ukv_build_binary for convenient access
#[allow(unused_imports)]
pub(crate) use helpers::get_ukv_build_binary;
