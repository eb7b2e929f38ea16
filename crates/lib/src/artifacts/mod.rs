//! Post-build artifact discovery and execution.
//!
//! The main program runs first; a non-zero exit there is fatal. Test programs
//! then run one at a time in their enumerated order, and each result is only
//! recorded: a failing or missing test never stops the others or the driver.

pub mod types;

use std::path::Path;

use tracing::{error, info, warn};

use crate::config::BuildConfiguration;
use crate::consts::{MAIN_ARTIFACT, TEST_ARTIFACTS};
use crate::platform::Layout;
use crate::process::{Invocation, ProcessRunner, containing_dir};
use crate::workdir::WorkingContext;

pub use types::{ArtifactDescriptor, ArtifactError, ArtifactKind, ArtifactReport, ArtifactResult, ArtifactStatus};

/// The main program's descriptor.
pub fn main_descriptor(layout: &Layout, build_dir: &Path) -> ArtifactDescriptor {
  ArtifactDescriptor {
    name: MAIN_ARTIFACT.to_string(),
    expected_path: layout.main_path(build_dir, MAIN_ARTIFACT),
    kind: ArtifactKind::Main,
  }
}

/// Test program descriptors in run order, empty unless tests were built.
pub fn test_descriptors(config: &BuildConfiguration, layout: &Layout, build_dir: &Path) -> Vec<ArtifactDescriptor> {
  if !config.build_tests {
    return Vec::new();
  }

  TEST_ARTIFACTS
    .iter()
    .map(|name| ArtifactDescriptor {
      name: name.to_string(),
      expected_path: layout.test_path(build_dir, name),
      kind: ArtifactKind::Test,
    })
    .collect()
}

/// Run the main program and, if tests were built, every test program.
pub async fn run_artifacts<R: ProcessRunner>(
  config: &BuildConfiguration,
  ctx: &WorkingContext,
  layout: &Layout,
  runner: &R,
) -> Result<ArtifactReport, ArtifactError> {
  let main = run_main(main_descriptor(layout, &ctx.build_dir), runner).await?;

  let mut tests = Vec::new();
  for descriptor in test_descriptors(config, layout, &ctx.build_dir) {
    tests.push(run_test(descriptor, runner).await);
  }

  Ok(ArtifactReport { main, tests })
}

async fn run_main<R: ProcessRunner>(descriptor: ArtifactDescriptor, runner: &R) -> Result<ArtifactResult, ArtifactError> {
  if !descriptor.expected_path.is_file() {
    warn!(path = %descriptor.expected_path.display(), "main program not found, skipping");
    return Ok(ArtifactResult {
      descriptor,
      status: ArtifactStatus::Missing,
    });
  }

  info!(name = %descriptor.name, "running main program");
  let outcome = runner
    .run(&invocation_for(&descriptor.expected_path))
    .await
    .map_err(ArtifactError::MainSpawn)?;

  if !outcome.succeeded {
    error!(path = %descriptor.expected_path.display(), code = ?outcome.exit_code, "main program failed");
    return Err(ArtifactError::MainFailed {
      path: descriptor.expected_path.display().to_string(),
      code: outcome.exit_code,
    });
  }

  Ok(ArtifactResult {
    descriptor,
    status: ArtifactStatus::Passed,
  })
}

async fn run_test<R: ProcessRunner>(descriptor: ArtifactDescriptor, runner: &R) -> ArtifactResult {
  if !descriptor.expected_path.is_file() {
    warn!(name = %descriptor.name, path = %descriptor.expected_path.display(), "test program not found, skipping");
    return ArtifactResult {
      descriptor,
      status: ArtifactStatus::Missing,
    };
  }

  info!(name = %descriptor.name, "running test program");
  let status = match runner.run(&invocation_for(&descriptor.expected_path)).await {
    Ok(outcome) if outcome.succeeded => ArtifactStatus::Passed,
    Ok(outcome) => {
      warn!(name = %descriptor.name, code = ?outcome.exit_code, "test program failed");
      ArtifactStatus::Failed {
        exit_code: outcome.exit_code,
      }
    }
    Err(err) => {
      warn!(name = %descriptor.name, error = %err, "test program could not be started");
      ArtifactStatus::Unstartable {
        reason: err.to_string(),
      }
    }
  };

  ArtifactResult { descriptor, status }
}

fn invocation_for(path: &Path) -> Invocation {
  Invocation::new(path.display().to_string(), containing_dir(path))
}
