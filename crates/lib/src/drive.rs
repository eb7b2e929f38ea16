//! The four-phase pipeline: resolve, prepare, configure/build, run.
//!
//! Phases run strictly in order and any phase error ends the invocation.
//! Resolution happens before [`drive`] is called, so a usage error never
//! reaches the filesystem.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::artifacts::{self, ArtifactDescriptor, ArtifactError, ArtifactReport};
use crate::config::BuildConfiguration;
use crate::platform::{Layout, Os};
use crate::process::{Invocation, ProcessRunner};
use crate::toolchain::{self, ToolchainError};
use crate::workdir::{self, WorkdirError, WorkingContext};

/// Errors that end an invocation.
#[derive(Debug, Error)]
pub enum DriveError {
  #[error(transparent)]
  Workdir(#[from] WorkdirError),

  #[error(transparent)]
  Toolchain(#[from] ToolchainError),

  #[error(transparent)]
  Artifact(#[from] ArtifactError),
}

/// Result of a successful invocation.
#[derive(Debug, Serialize)]
pub struct DriveReport {
  pub context: WorkingContext,
  /// Present only when artifacts were run.
  pub artifacts: Option<ArtifactReport>,
}

/// Run every phase for `config`.
pub async fn drive<R: ProcessRunner>(
  config: &BuildConfiguration,
  layout: &Layout,
  runner: &R,
) -> Result<DriveReport, DriveError> {
  let context = workdir::prepare(config)?;
  info!(path = %context.build_dir.display(), reused = context.reused, "build directory ready");

  toolchain::configure_and_build(config, &context, runner).await?;
  info!("build finished");

  let artifacts = if config.run_after_build {
    Some(artifacts::run_artifacts(config, &context, layout, runner).await?)
  } else {
    None
  };

  Ok(DriveReport { context, artifacts })
}

/// Everything an invocation would do, computed without side effects.
#[derive(Debug, Serialize)]
pub struct Plan {
  pub os: Os,
  pub configuration: BuildConfiguration,
  pub layout: Layout,
  pub configure: Invocation,
  pub build: Invocation,
  /// Artifacts that would be looked for; empty unless `--run` was given.
  pub artifacts: Vec<ArtifactDescriptor>,
}

/// Describe the invocation for `config` without touching the filesystem.
pub fn plan(config: &BuildConfiguration, os: Os) -> Plan {
  let layout = Layout::for_os(os);
  let source_dir = std::path::absolute(&config.project_dir).unwrap_or_else(|_| config.project_dir.clone());
  let context = WorkingContext {
    build_dir: crate::config::build_dir_for(&source_dir),
    source_dir,
    reused: config.use_cache,
  };

  let artifacts = if config.run_after_build {
    std::iter::once(artifacts::main_descriptor(&layout, &context.build_dir))
      .chain(artifacts::test_descriptors(config, &layout, &context.build_dir))
      .collect()
  } else {
    Vec::new()
  };

  Plan {
    os,
    configuration: config.clone(),
    configure: toolchain::configure_invocation(config, &context),
    build: toolchain::build_invocation(config, &context),
    layout,
    artifacts,
  }
}

impl Plan {
  pub fn build_dir(&self) -> PathBuf {
    self.configure.cwd.clone()
  }
}
