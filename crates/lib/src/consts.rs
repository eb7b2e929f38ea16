//! Central defaults and fixed names.
//!
//! Every default the driver applies lives here so a change is a single edit.

/// Whether test executables are produced when neither `--tests` nor `--no-tests` is given.
pub const DEFAULT_BUILD_TESTS: bool = true;

/// Environment variable overriding the toolchain (vcpkg) root.
pub const TOOLCHAIN_ROOT_ENV: &str = "VCPKG_ROOT";

/// Environment variable overriding the toolchain program.
pub const TOOLCHAIN_PROGRAM_ENV: &str = "BDRIVE_CMAKE";

pub const DEFAULT_TOOLCHAIN_PROGRAM: &str = "cmake";

/// Toolchain root used on Windows hosts when `VCPKG_ROOT` is unset.
pub const WINDOWS_TOOLCHAIN_ROOT: &str = "C:";

/// Toolchain root used on every other host when `VCPKG_ROOT` is unset.
pub const UNIX_TOOLCHAIN_ROOT: &str = "/opt";

/// Toolchain file location relative to the toolchain root.
pub const TOOLCHAIN_FILE: &str = "vcpkg/scripts/buildsystems/vcpkg.cmake";

/// Name of the out-of-tree build directory beneath the project root.
pub const BUILD_DIR_NAME: &str = "build";

/// The only build profile the driver ever requests.
pub const RELEASE_PROFILE: &str = "Release";

pub const MAIN_ARTIFACT: &str = "TetrisEngine";

/// Test executables, in the order they are run.
pub const TEST_ARTIFACTS: &[&str] = &["test_board", "test_piece", "test_game"];
