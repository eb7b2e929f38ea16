//! Run-and-wait execution of external programs.
//!
//! Every external step (configure, build, each artifact) goes through a
//! [`ProcessRunner`]. A non-zero exit is an ordinary [`RunOutcome`]; only a
//! program that cannot be started at all is an error.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory the program is started in.
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Program and arguments joined for display.
  pub fn command_line(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }

  pub fn has_arg(&self, arg: &str) -> bool {
    self.args.iter().any(|a| a == arg)
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.command_line())
  }
}

/// Exit status of a finished program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
  /// `None` when the process was terminated by a signal.
  pub exit_code: Option<i32>,
  pub succeeded: bool,
}

impl RunOutcome {
  pub fn from_code(code: i32) -> Self {
    Self {
      exit_code: Some(code),
      succeeded: code == 0,
    }
  }
}

impl From<std::process::ExitStatus> for RunOutcome {
  fn from(status: std::process::ExitStatus) -> Self {
    Self {
      exit_code: status.code(),
      succeeded: status.success(),
    }
  }
}

/// A program could not be started.
#[derive(Debug, Error)]
#[error("failed to start '{program}' in {cwd}: {source}")]
pub struct SpawnError {
  pub program: String,
  pub cwd: String,
  #[source]
  pub source: io::Error,
}

/// Starts a program and waits for it to exit.
pub trait ProcessRunner {
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<RunOutcome, SpawnError>>;
}

/// Where a child's standard output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildStdout {
  /// Shared with the driver's own stdout.
  #[default]
  Inherit,
  /// Redirected to the driver's stderr, keeping stdout free for machine-readable output.
  Stderr,
}

/// Runs programs on the host. Output is passed through verbatim, never captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
  stdout: ChildStdout,
}

impl SystemRunner {
  pub fn new(stdout: ChildStdout) -> Self {
    Self { stdout }
  }

  fn stdout(&self) -> Stdio {
    match self.stdout {
      ChildStdout::Inherit => Stdio::inherit(),
      ChildStdout::Stderr => Stdio::from(std::io::stderr()),
    }
  }
}

impl ProcessRunner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<RunOutcome, SpawnError> {
    info!(cmd = %invocation, cwd = %invocation.cwd.display(), "running");

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .stdin(Stdio::inherit())
      .stdout(self.stdout())
      .stderr(Stdio::inherit())
      .status()
      .await
      .map_err(|source| SpawnError {
        program: invocation.program.clone(),
        cwd: invocation.cwd.display().to_string(),
        source,
      })?;

    let outcome = RunOutcome::from(status);
    debug!(program = %invocation.program, exit_code = ?outcome.exit_code, "process exited");
    Ok(outcome)
  }
}

/// Directory containing `path`, or `path` itself when it has no parent.
pub fn containing_dir(path: &Path) -> PathBuf {
  path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .map(Path::to_path_buf)
    .unwrap_or_else(|| PathBuf::from("."))
}
