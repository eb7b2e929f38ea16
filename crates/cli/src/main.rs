mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use bdrive_lib::Flags;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::BuildArgs;
use crate::output::OutputFormat;

/// bdrive - configure, build and run a native project out of tree
#[derive(Parser)]
#[command(name = "bdrive")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Accepted for compatibility; has no effect (the GPU backend is always configured off)
  #[arg(long)]
  use_gpu: bool,

  /// Build the test programs (the default)
  #[arg(long, conflicts_with = "no_tests")]
  tests: bool,

  /// Do not build the test programs
  #[arg(long)]
  no_tests: bool,

  /// Run the main program and test programs after a successful build
  #[arg(long)]
  run: bool,

  /// Generate documentation as part of the build
  #[arg(long)]
  document: bool,

  /// Keep an existing build directory instead of removing it
  #[arg(long)]
  use_cache: bool,

  /// Project root containing the top-level CMakeLists.txt
  #[arg(short = 'C', long, default_value = ".")]
  project_dir: PathBuf,

  /// Print what would be run without touching anything
  #[arg(long)]
  dry_run: bool,

  /// Output format for the plan and the run summary
  #[arg(long, value_enum, default_value_t)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = BuildArgs {
    flags: Flags {
      tests: cli.tests,
      no_tests: cli.no_tests,
      use_gpu: cli.use_gpu,
      run: cli.run,
      document: cli.document,
      use_cache: cli.use_cache,
    },
    project_dir: cli.project_dir,
    dry_run: cli.dry_run,
    output: cli.output,
  };

  cmd::cmd_build(&args)
}
