//! Test support utilities for strata integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own project dir (holding the file store and the
/// secret tree) and home dir (holding the age keys). Child processes use
/// `.current_dir()`, so tests can run in parallel.
pub struct Test {
    /// Temporary project directory
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with the table and the default key created.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Absolute path of a project-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a project file, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(path, contents).expect("failed to write file");
    }

    /// Read a project file.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("failed to read file")
    }

    /// Encrypt secrets into a secret file of the tree.
    pub fn with_secret_file(relative: &str, secrets: &[(&str, &str)]) -> Self {
        let t = Self::init();
        for (k, v) in secrets {
            let output = t.encrypt_add(k, v, relative);
            assert!(
                output.status.success(),
                "Failed to encrypt {}: {}",
                k,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }
}
