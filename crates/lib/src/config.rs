//! Option resolution.
//!
//! Turns the operator's flags and the environment into a single immutable
//! [`BuildConfiguration`] that every later phase receives explicitly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  DEFAULT_BUILD_TESTS, DEFAULT_TOOLCHAIN_PROGRAM, TOOLCHAIN_FILE, TOOLCHAIN_PROGRAM_ENV, TOOLCHAIN_ROOT_ENV,
  UNIX_TOOLCHAIN_ROOT, WINDOWS_TOOLCHAIN_ROOT,
};
use crate::platform::Os;

/// Errors raised while resolving options.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("--tests and --no-tests cannot be used together")]
  ConflictingFlags,
}

/// Raw operator flags, before defaults are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
  pub tests: bool,
  pub no_tests: bool,
  pub use_gpu: bool,
  pub run: bool,
  pub document: bool,
  pub use_cache: bool,
}

impl Flags {
  /// Collapse `--tests`/`--no-tests` into an explicit choice, if one was made.
  pub fn test_selection(&self) -> Result<Option<bool>, ConfigError> {
    match (self.tests, self.no_tests) {
      (true, true) => Err(ConfigError::ConflictingFlags),
      (true, false) => Ok(Some(true)),
      (false, true) => Ok(Some(false)),
      (false, false) => Ok(None),
    }
  }
}

/// Normalized configuration for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
  pub build_tests: bool,
  /// Accepted for compatibility. It never changes what is configured or run.
  pub use_gpu: bool,
  pub run_after_build: bool,
  pub update_docs: bool,
  pub use_cache: bool,
  /// Parent of the `vcpkg` checkout. Existence is the toolchain's concern.
  pub toolchain_root: PathBuf,
  pub toolchain_program: String,
  /// Source root handed to configure; the build directory lives beneath it.
  pub project_dir: PathBuf,
}

impl BuildConfiguration {
  /// Resolve a configuration, reading overrides through `env`.
  ///
  /// `env` is a lookup so that resolution stays free of side effects; pass
  /// [`process_env`] for the real environment.
  pub fn resolve<F>(flags: &Flags, project_dir: impl Into<PathBuf>, os: Os, env: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let build_tests = flags.test_selection()?.unwrap_or(DEFAULT_BUILD_TESTS);

    let config = Self {
      build_tests,
      use_gpu: flags.use_gpu,
      run_after_build: flags.run,
      update_docs: flags.document,
      use_cache: flags.use_cache,
      toolchain_root: resolve_toolchain_root(os, &env),
      toolchain_program: non_empty(env(TOOLCHAIN_PROGRAM_ENV)).unwrap_or_else(|| DEFAULT_TOOLCHAIN_PROGRAM.to_string()),
      project_dir: project_dir.into(),
    };

    debug!(?config, "resolved build configuration");
    Ok(config)
  }

  /// Path of the dependency manager's toolchain file.
  ///
  /// Joined with an explicit `/` so a bare drive root such as `C:` yields
  /// `C:/vcpkg/...` rather than the drive-relative `C:vcpkg\...`.
  pub fn toolchain_file(&self) -> PathBuf {
    let root = self.toolchain_root.display().to_string();
    PathBuf::from(format!("{}/{}", root.trim_end_matches(['/', '\\']), TOOLCHAIN_FILE))
  }

  pub fn build_dir(&self) -> PathBuf {
    build_dir_for(&self.project_dir)
  }
}

/// The build directory for a given project root.
pub fn build_dir_for(project_dir: &Path) -> PathBuf {
  project_dir.join(crate::consts::BUILD_DIR_NAME)
}

/// `VCPKG_ROOT` when set and non-empty, otherwise the platform default.
pub fn resolve_toolchain_root<F>(os: Os, env: F) -> PathBuf
where
  F: Fn(&str) -> Option<String>,
{
  match non_empty(env(TOOLCHAIN_ROOT_ENV)) {
    Some(root) => PathBuf::from(root),
    None if os.is_windows() => PathBuf::from(WINDOWS_TOOLCHAIN_ROOT),
    None => PathBuf::from(UNIX_TOOLCHAIN_ROOT),
  }
}

/// Environment lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
  std::env::var(key).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}
