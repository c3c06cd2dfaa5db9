//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a directory-tree fixture and a few configuration
//! snippets used across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_file("p/config.yaml", "x: 1")
//!         .with_file("p/c/config.yaml", configs::INHERIT);
//!     let config = fixture.resolve("p/c", &ResolveOptions::default()).unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use cascade_config::{ResolveOptions, ResolvedConfig};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use cascade_config::{resolve, Error, ResolveOptions, ResolvedConfig};
    pub use predicates::prelude::*;
    pub use serde_yaml::Value;

    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Opt in to the parent directory's configuration.
    pub const INHERIT: &str = "settings:\n  inherit: true\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: [unclosed";
}

/// A temporary directory tree of configuration files.
///
/// Resolution walks up to the filesystem root, so every fixture resolves
/// with search paths that name only files the fixture itself creates.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("p/config.yaml", "x: 1")
///     .with_file("p/c/config.yaml", "x: 2");
///
/// fixture
///     .command()
///     .args(["config", "view", "--cwd", "p/c"])
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content, creating parent
    /// directories as needed.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a fixture entry.
    pub fn join(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Resolve the configuration for a fixture-relative path.
    pub fn resolve(
        &self,
        path: &str,
        options: &ResolveOptions,
    ) -> cascade_config::Result<ResolvedConfig> {
        cascade_config::resolve(self.join(path), options)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a command configured to run in this fixture's directory.
    ///
    /// Search paths are pinned so the user's environment cannot leak in.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cascade-config");
        cmd.current_dir(self.path())
            .env_remove("CASCADE_CONFIG_SEARCH_PATHS")
            .env_remove("CASCADE_CONFIG_FULL_ERRORS")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_nested_files() {
        let fixture = TestFixture::new().with_file("a/b/config.yaml", "x: 1");
        assert!(fixture.join("a/b/config.yaml").is_file());
    }

    #[test]
    fn test_fixture_with_dir() {
        let fixture = TestFixture::new().with_dir("empty/level");
        assert!(fixture.join("empty/level").is_dir());
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
