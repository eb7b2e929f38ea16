//! Test utilities for bdrive-lib.
//!
//! Cross-platform shell helpers plus a [`RecordingRunner`] that stands in for
//! the toolchain and artifacts without starting real processes.

use std::io;
use std::path::Path;
use std::sync::Mutex;

use crate::process::{Invocation, ProcessRunner, RunOutcome, SpawnError};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// Write an executable shell script at `path`, creating parent directories.
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
  use std::os::unix::fs::PermissionsExt;

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Create an empty file at `path`, creating parent directories.
pub fn touch(path: &Path) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, b"").unwrap();
}

/// Records every invocation and answers with scripted exit codes.
///
/// Invocations whose command line contains a registered needle get that
/// needle's exit code; everything else exits 0.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  exit_codes: Vec<(String, i32)>,
  unspawnable: Vec<String>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn exit_with(mut self, needle: &str, code: i32) -> Self {
    self.exit_codes.push((needle.to_string(), code));
    self
  }

  pub fn unspawnable(mut self, needle: &str) -> Self {
    self.unspawnable.push(needle.to_string());
    self
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }
}

impl ProcessRunner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<RunOutcome, SpawnError> {
    self.calls.lock().unwrap().push(invocation.clone());
    let line = invocation.command_line();

    if self.unspawnable.iter().any(|needle| line.contains(needle.as_str())) {
      return Err(SpawnError {
        program: invocation.program.clone(),
        cwd: invocation.cwd.display().to_string(),
        source: io::Error::from(io::ErrorKind::NotFound),
      });
    }

    let code = self
      .exit_codes
      .iter()
      .find(|(needle, _)| line.contains(needle.as_str()))
      .map(|(_, code)| *code)
      .unwrap_or(0);

    Ok(RunOutcome::from_code(code))
  }
}

/// Restores the process working directory when dropped.
pub struct CwdGuard(std::path::PathBuf);

impl CwdGuard {
  pub fn new() -> Self {
    Self(std::env::current_dir().unwrap())
  }
}

impl Drop for CwdGuard {
  fn drop(&mut self) {
    let _ = std::env::set_current_dir(&self.0);
  }
}
