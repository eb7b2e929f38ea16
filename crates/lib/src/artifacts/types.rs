//! Types describing build artifacts and the outcome of running them.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::process::SpawnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
  Main,
  Test,
}

/// An executable the build is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
  pub name: String,
  pub expected_path: PathBuf,
  pub kind: ArtifactKind,
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArtifactStatus {
  Passed,
  Failed { exit_code: Option<i32> },
  /// Present on disk but could not be started.
  Unstartable { reason: String },
  Missing,
}

impl ArtifactStatus {
  pub fn is_failure(&self) -> bool {
    matches!(self, Self::Failed { .. } | Self::Unstartable { .. })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactResult {
  #[serde(flatten)]
  pub descriptor: ArtifactDescriptor,
  #[serde(flatten)]
  pub status: ArtifactStatus,
}

/// Outcome of the run phase. Test failures live here and never become errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
  pub main: ArtifactResult,
  pub tests: Vec<ArtifactResult>,
}

impl ArtifactReport {
  pub fn tests_passed(&self) -> usize {
    self.count(|s| matches!(s, ArtifactStatus::Passed))
  }

  pub fn tests_failed(&self) -> usize {
    self.count(ArtifactStatus::is_failure)
  }

  pub fn tests_missing(&self) -> usize {
    self.count(|s| matches!(s, ArtifactStatus::Missing))
  }

  fn count(&self, pred: impl Fn(&ArtifactStatus) -> bool) -> usize {
    self.tests.iter().filter(|r| pred(&r.status)).count()
  }
}

/// Fatal run-phase errors. Only the main artifact can produce one.
#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("main program {path} failed with exit code {code:?}")]
  MainFailed { path: String, code: Option<i32> },

  #[error("main program could not be started: {0}")]
  MainSpawn(#[source] SpawnError),
}
