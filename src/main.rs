//! ukv-build command-line interface
//!
//! Builds the UKV Python extension modules through `CMake`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use ukv_build::debug::DEBUG_ENV;
use ukv_build::{BuildError, BuildPlan, Host, PlanOptions, ProcessEnv};

/// Display an error with its cause chain
fn display_error(err: &anyhow::Error) {
    eprintln!("error: {err}");

    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }
}

/// Exit code for a failed run: a failed `CMake` step passes its own code through
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<BuildError>()
        .map_or(1, BuildError::exit_code)
}

#[derive(Parser)]
#[command(name = "ukv-build")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build UKV Python extension modules with CMake", long_about = None)]
pub(crate) struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(
        long,
        global = true,
        env = DEBUG_ENV,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that resolves a build plan
#[derive(Args, Debug, Clone, Default)]
struct PlanArgs {
    /// Native project root (default: nearest ancestor with CMakeLists.txt)
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Config file (default: ukv-build.toml in the project root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Install root for compiled extensions
    #[arg(long)]
    build_lib: Option<PathBuf>,

    /// Working directory for CMake
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Artifacts to copy when UKV_DEBUG_PYTHON is set
    #[arg(long)]
    prebuilt_dir: Option<PathBuf>,

    /// Parallel jobs for the build step (default: half the logical CPUs)
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Only handle these extensions (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,
}

impl PlanArgs {
    fn into_options(self) -> PlanOptions {
        PlanOptions {
            project_dir: self.project_dir,
            config_file: self.config,
            build_lib: self.build_lib,
            build_dir: self.build_dir,
            prebuilt_dir: self.prebuilt_dir,
            jobs: self.jobs,
            only: self.only,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build every extension module in order
    Build {
        #[command(flatten)]
        plan: PlanArgs,

        /// Suppress progress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List extension modules with their CMake targets and output directories
    List {
        #[command(flatten)]
        plan: PlanArgs,

        /// Print names only
        #[arg(long)]
        names_only: bool,
    },

    /// Show the resolved configuration and commands without running them
    Plan {
        #[command(flatten)]
        plan: PlanArgs,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn prepare(args: PlanArgs) -> Result<BuildPlan> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let plan = BuildPlan::prepare(&ProcessEnv, &Host::detect(), &cwd, &args.into_options())?;
    Ok(plan)
}

fn main() {
    let cli = Cli::parse();

    ukv_build::init_debug(cli.debug);

    let result = match cli.command {
        Commands::Build { plan, quiet } => {
            prepare(plan).and_then(|plan| commands::build::run(&plan, quiet))
        }
        Commands::List { plan, names_only } => {
            prepare(plan).and_then(|plan| commands::list::run(&plan, names_only))
        }
        Commands::Plan { plan, json } => {
            prepare(plan).and_then(|plan| commands::plan::run(&plan, json))
        }
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        display_error(&e);
        process::exit(exit_code(&e));
    }
}

mod commands;
