//! Build directory lifecycle.
//!
//! [`prepare`] leaves the build directory existing and set as the process
//! working directory. Without cache reuse a pre-existing directory is removed
//! first; a removal blocked by open handles or locks is fatal and reported with
//! operator guidance rather than retried.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{BuildConfiguration, build_dir_for};

/// Errors from preparing the build directory.
#[derive(Debug, Error)]
pub enum WorkdirError {
  #[error("project directory {path} is not accessible: {source}")]
  ProjectDir {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error(
    "build directory {path} is in use and could not be removed: {source}\n\
     Close any program holding files inside it (shells, editors, debuggers, a running build or test).\n\
     Check for antivirus, backup or indexing software holding exclusive locks, then retry.\n\
     Pass --use-cache to build without removing it."
  )]
  ResourceBusy {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove build directory {path}: {source}")]
  Remove {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to create build directory {path}: {source}")]
  Create {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to enter build directory {path}: {source}")]
  Enter {
    path: String,
    #[source]
    source: io::Error,
  },
}

/// The prepared build directory, active as the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingContext {
  /// Absolute project root, handed to configure as the source directory.
  pub source_dir: PathBuf,
  /// Absolute build directory.
  pub build_dir: PathBuf,
  /// Whether an existing directory was kept.
  pub reused: bool,
}

/// Destroy or reuse the build directory, make sure it exists, and enter it.
pub fn prepare(config: &BuildConfiguration) -> Result<WorkingContext, WorkdirError> {
  let source_dir = dunce::canonicalize(&config.project_dir).map_err(|source| WorkdirError::ProjectDir {
    path: config.project_dir.display().to_string(),
    source,
  })?;
  let build_dir = build_dir_for(&source_dir);

  let existed = build_dir.exists();
  if existed && !config.use_cache {
    info!(path = %build_dir.display(), "removing existing build directory");
    remove(&build_dir).map_err(|err| classify_remove_error(&build_dir, err))?;
  } else if existed {
    info!(path = %build_dir.display(), "reusing existing build directory");
  }

  if !build_dir.exists() {
    debug!(path = %build_dir.display(), "creating build directory");
    std::fs::create_dir_all(&build_dir).map_err(|source| WorkdirError::Create {
      path: build_dir.display().to_string(),
      source,
    })?;
  }

  std::env::set_current_dir(&build_dir).map_err(|source| WorkdirError::Enter {
    path: build_dir.display().to_string(),
    source,
  })?;

  Ok(WorkingContext {
    source_dir,
    build_dir,
    reused: existed && config.use_cache,
  })
}

fn remove(path: &Path) -> io::Result<()> {
  if path.is_dir() {
    std::fs::remove_dir_all(path)
  } else {
    std::fs::remove_file(path)
  }
}

/// Map a removal failure onto the busy/other split.
pub fn classify_remove_error(path: &Path, source: io::Error) -> WorkdirError {
  let path = path.display().to_string();
  if is_busy(&source) {
    WorkdirError::ResourceBusy { path, source }
  } else {
    WorkdirError::Remove { path, source }
  }
}

fn is_busy(err: &io::Error) -> bool {
  matches!(
    err.kind(),
    io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
  ) || is_lock_violation(err)
}

// ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION
#[cfg(windows)]
fn is_lock_violation(err: &io::Error) -> bool {
  matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_lock_violation(_err: &io::Error) -> bool {
  false
}
