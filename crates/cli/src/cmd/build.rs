//! The build command: resolve options, then drive every phase.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use bdrive_lib::config::process_env;
use bdrive_lib::platform::{self, Layout};
use bdrive_lib::process::{ChildStdout, SystemRunner};
use bdrive_lib::{BuildConfiguration, DriveReport, Flags, drive, plan};

use super::plan::print_plan;
use crate::output::{OutputFormat, Tone, elapsed, emit_json, field, print_artifacts, status};

/// Arguments for [`cmd_build`], taken straight from the command line.
pub struct BuildArgs {
  pub flags: Flags,
  pub project_dir: PathBuf,
  pub dry_run: bool,
  pub output: OutputFormat,
}

/// Execute the build command.
///
/// Resolves the configuration before any side effect, then prepares the
/// build directory, configures, builds, and optionally runs the artifacts.
/// Test failures are reported in the summary but never fail the command.
pub fn cmd_build(args: &BuildArgs) -> Result<()> {
  let os = platform::detect().context("Cannot determine artifact layout")?;
  let config =
    BuildConfiguration::resolve(&args.flags, &args.project_dir, os, process_env).context("Invalid options")?;

  if args.dry_run {
    return print_plan(&plan(&config, os), args.output);
  }

  let start = Instant::now();
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  // Keep stdout for the JSON document; toolchain and artifact output moves to stderr.
  let runner = SystemRunner::new(if args.output.is_json() {
    ChildStdout::Stderr
  } else {
    ChildStdout::Inherit
  });

  let report = rt
    .block_on(drive(&config, &Layout::for_os(os), &runner))
    .context("Build failed")?;
  debug!(elapsed = ?start.elapsed(), "driver finished");

  if args.output.is_json() {
    emit_json(&serde_json::json!({
      "build_dir": report.context.build_dir,
      "reused": report.context.reused,
      "artifacts": report.artifacts,
      "duration_ms": start.elapsed().as_millis() as u64,
    }))?;
  } else {
    print_summary(&report, start);
  }

  Ok(())
}

fn print_summary(report: &DriveReport, start: Instant) {
  println!();
  status(Tone::Good, "Build complete!");
  field("Build directory", &report.context.build_dir.display().to_string());

  if let Some(artifacts) = &report.artifacts {
    print_artifacts(artifacts);
  }

  field("Duration", &elapsed(start.elapsed()));
}
