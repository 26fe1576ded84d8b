//! Subcommand implementations

pub(crate) mod build;
pub(crate) mod completion;
pub(crate) mod list;
pub(crate) mod plan;
