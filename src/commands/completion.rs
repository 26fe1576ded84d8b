//! Completion command
//!
//! Generate shell completion scripts

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Binary name completions are registered under.
const BIN_NAME: &str = "ukv-build";

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
///
/// ```bash
/// ukv-build completion bash > /usr/local/share/bash-completion/completions/ukv-build
/// ukv-build completion zsh > /usr/local/share/zsh/site-functions/_ukv-build
/// ```
#[allow(
    clippy::unnecessary_wraps,
    reason = "Result type maintained for consistency with command signature pattern"
)]
pub(crate) fn run(shell: Shell) -> Result<()> {
    write_completion(shell, &mut io::stdout());
    Ok(())
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}
