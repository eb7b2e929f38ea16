//! Host platform detection and the artifact layout each platform produces.

pub mod layout;
pub mod os;

use thiserror::Error;

pub use layout::Layout;
pub use os::Os;

/// Errors raised while identifying the host platform.
#[derive(Debug, Error)]
pub enum PlatformError {
  /// The host OS is outside the closed set of supported platforms.
  #[error("unsupported platform '{0}': supported platforms are linux, darwin and windows")]
  Unsupported(String),
}

/// Detect the current OS, failing fast on anything unsupported.
pub fn detect() -> Result<Os, PlatformError> {
  Os::current().ok_or_else(|| PlatformError::Unsupported(std::env::consts::OS.to_string()))
}
