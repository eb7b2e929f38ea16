//! Configure and build invocations.
//!
//! The option set is fixed apart from the test and documentation toggles: the
//! release profile is always requested, the NN subsystem is always enabled and
//! the GPU backend is always disabled, whatever `--use-gpu` says.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::BuildConfiguration;
use crate::consts::RELEASE_PROFILE;
use crate::process::{Invocation, ProcessRunner, SpawnError};
use crate::workdir::WorkingContext;

/// Which toolchain step an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Configure,
  Build,
}

impl std::fmt::Display for Step {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Step::Configure => write!(f, "configure"),
      Step::Build => write!(f, "build"),
    }
  }
}

/// Errors from the configure/build phase.
#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error("{step} step failed with exit code {code:?}: {cmd}")]
  Failed { step: Step, code: Option<i32>, cmd: String },

  #[error("{step} step could not be started: {source}")]
  Spawn {
    step: Step,
    #[source]
    source: SpawnError,
  },
}

fn toggle(on: bool) -> &'static str {
  if on { "ON" } else { "OFF" }
}

/// The configure invocation for `config`, run inside the build directory.
pub fn configure_invocation(config: &BuildConfiguration, ctx: &WorkingContext) -> Invocation {
  Invocation::new(&config.toolchain_program, &ctx.build_dir)
    .arg(ctx.source_dir.display().to_string())
    .arg(format!("-DCMAKE_BUILD_TYPE={}", RELEASE_PROFILE))
    .arg("-DENABLE_NN=ON")
    .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", config.toolchain_file().display()))
    .arg(format!("-DBUILD_TESTS={}", toggle(config.build_tests)))
    .arg("-DENABLE_GPU=OFF")
    .arg(format!("-DBUILD_DOCS={}", toggle(config.update_docs)))
}

/// The build invocation for the configured directory.
pub fn build_invocation(config: &BuildConfiguration, ctx: &WorkingContext) -> Invocation {
  Invocation::new(&config.toolchain_program, &ctx.build_dir)
    .arg("--build")
    .arg(".")
    .arg("--config")
    .arg(RELEASE_PROFILE)
}

/// Run configure, then build. Build is attempted only if configure succeeded.
pub async fn configure_and_build<R: ProcessRunner>(
  config: &BuildConfiguration,
  ctx: &WorkingContext,
  runner: &R,
) -> Result<(), ToolchainError> {
  if config.use_gpu {
    warn!("--use-gpu has no effect; the GPU backend is always configured off");
  }

  for (step, invocation) in [
    (Step::Configure, configure_invocation(config, ctx)),
    (Step::Build, build_invocation(config, ctx)),
  ] {
    info!(%step, "running toolchain step");

    let outcome = runner
      .run(&invocation)
      .await
      .map_err(|source| ToolchainError::Spawn { step, source })?;

    if !outcome.succeeded {
      error!(%step, code = ?outcome.exit_code, "toolchain step failed");
      return Err(ToolchainError::Failed {
        step,
        code: outcome.exit_code,
        cmd: invocation.command_line(),
      });
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::config::Flags;
  use crate::platform::Os;
  use crate::util::testutil::RecordingRunner;

  fn config(flags: Flags) -> BuildConfiguration {
    BuildConfiguration::resolve(&flags, "/src/game", Os::Linux, |_| None).unwrap()
  }

  fn ctx() -> WorkingContext {
    WorkingContext {
      source_dir: PathBuf::from("/src/game"),
      build_dir: PathBuf::from("/src/game/build"),
      reused: false,
    }
  }

  #[test]
  fn configure_has_fixed_options() {
    for use_gpu in [false, true] {
      let inv = configure_invocation(
        &config(Flags {
          use_gpu,
          ..Flags::default()
        }),
        &ctx(),
      );

      assert_eq!(inv.program, "cmake");
      assert_eq!(inv.cwd, PathBuf::from("/src/game/build"));
      assert_eq!(inv.args[0], "/src/game");
      assert!(inv.has_arg("-DCMAKE_BUILD_TYPE=Release"));
      assert!(inv.has_arg("-DENABLE_NN=ON"));
      assert!(inv.has_arg("-DENABLE_GPU=OFF"));
      assert!(!inv.has_arg("-DENABLE_GPU=ON"));
    }
  }

  #[test]
  fn configure_maps_tests_and_docs() {
    let default = configure_invocation(&config(Flags::default()), &ctx());
    assert!(default.has_arg("-DBUILD_TESTS=ON"));
    assert!(default.has_arg("-DBUILD_DOCS=OFF"));

    let flipped = configure_invocation(
      &config(Flags {
        no_tests: true,
        document: true,
        ..Flags::default()
      }),
      &ctx(),
    );
    assert!(flipped.has_arg("-DBUILD_TESTS=OFF"));
    assert!(flipped.has_arg("-DBUILD_DOCS=ON"));
  }

  #[test]
  fn configure_points_at_toolchain_file() {
    let inv = configure_invocation(&config(Flags::default()), &ctx());
    let expected = format!(
      "-DCMAKE_TOOLCHAIN_FILE={}",
      PathBuf::from("/opt/vcpkg/scripts/buildsystems/vcpkg.cmake").display()
    );
    assert!(inv.has_arg(&expected));
  }

  #[test]
  fn windows_configure_uses_absolute_default_toolchain_file() {
    let config = BuildConfiguration::resolve(&Flags::default(), "C:/src/game", Os::Windows, |_| None).unwrap();

    let inv = configure_invocation(&config, &ctx());

    assert!(inv.has_arg("-DCMAKE_TOOLCHAIN_FILE=C:/vcpkg/scripts/buildsystems/vcpkg.cmake"));
  }

  #[test]
  fn build_requests_release_profile() {
    let inv = build_invocation(&config(Flags::default()), &ctx());
    assert_eq!(inv.args, vec!["--build", ".", "--config", "Release"]);
  }

  #[tokio::test]
  async fn runs_configure_then_build() {
    let runner = RecordingRunner::new();

    configure_and_build(&config(Flags::default()), &ctx(), &runner).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].has_arg("-DENABLE_NN=ON"));
    assert!(calls[1].has_arg("--build"));
  }

  #[tokio::test]
  async fn configure_failure_skips_build() {
    let runner = RecordingRunner::new().exit_with("-DENABLE_NN=ON", 1);

    let err = configure_and_build(&config(Flags::default()), &ctx(), &runner)
      .await
      .unwrap_err();

    assert!(matches!(
      err,
      ToolchainError::Failed {
        step: Step::Configure,
        code: Some(1),
        ..
      }
    ));
    assert_eq!(runner.calls().len(), 1);
  }

  #[tokio::test]
  async fn build_failure_is_fatal() {
    let runner = RecordingRunner::new().exit_with("--build", 2);

    let err = configure_and_build(&config(Flags::default()), &ctx(), &runner)
      .await
      .unwrap_err();

    assert!(matches!(
      err,
      ToolchainError::Failed {
        step: Step::Build,
        code: Some(2),
        ..
      }
    ));
    assert_eq!(runner.calls().len(), 2);
  }

  #[tokio::test]
  async fn unstartable_toolchain_is_spawn_error() {
    let runner = RecordingRunner::new().unspawnable("cmake");

    let err = configure_and_build(&config(Flags::default()), &ctx(), &runner)
      .await
      .unwrap_err();

    assert!(matches!(
      err,
      ToolchainError::Spawn {
        step: Step::Configure,
        ..
      }
    ));
    assert_eq!(runner.calls().len(), 1);
  }
}
