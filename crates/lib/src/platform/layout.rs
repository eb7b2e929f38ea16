//! Where the toolchain places executables on each platform.
//!
//! Multi-config generators on Windows nest outputs under a folder named after
//! the build profile; single-config generators elsewhere do not. The layout is a
//! pure function of the [`Os`] and nothing else.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Os;
use crate::consts::RELEASE_PROFILE;

/// Executable naming and placement for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
  /// Appended to every executable name (`.exe` or nothing).
  pub suffix: &'static str,
  /// Directory of the main program, relative to the build directory.
  pub bin_subpath: PathBuf,
  /// Directory of the test programs, relative to the build directory.
  pub test_subpath: PathBuf,
}

impl Layout {
  pub fn for_os(os: Os) -> Self {
    match os {
      Os::Windows => Self {
        suffix: ".exe",
        bin_subpath: PathBuf::from(RELEASE_PROFILE),
        test_subpath: Path::new("tests").join(RELEASE_PROFILE),
      },
      Os::Linux | Os::MacOs => Self {
        suffix: "",
        bin_subpath: PathBuf::new(),
        test_subpath: PathBuf::from("tests"),
      },
    }
  }

  pub fn executable_name(&self, name: &str) -> String {
    format!("{}{}", name, self.suffix)
  }

  pub fn main_path(&self, build_dir: &Path, name: &str) -> PathBuf {
    build_dir.join(&self.bin_subpath).join(self.executable_name(name))
  }

  pub fn test_path(&self, build_dir: &Path, name: &str) -> PathBuf {
    build_dir.join(&self.test_subpath).join(self.executable_name(name))
  }
}
