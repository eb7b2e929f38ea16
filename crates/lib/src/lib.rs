//! bdrive-lib: orchestration logic for the bdrive build driver
//!
//! A single invocation flows through four phases:
//! - `config`: flags and environment resolved into a `BuildConfiguration`
//! - `workdir`: the build directory removed or reused, created, and entered
//! - `toolchain`: configure then build, stopping at the first failure
//! - `artifacts`: the main program and test programs run after the build
//!
//! `drive` composes them; `process` is the run-and-wait seam to the outside world.

pub mod artifacts;
pub mod config;
pub mod consts;
pub mod drive;
pub mod platform;
pub mod process;
pub mod toolchain;
pub mod workdir;

#[cfg(test)]
mod util;

pub use config::{BuildConfiguration, ConfigError, Flags};
pub use drive::{DriveError, DriveReport, Plan, drive, plan};
