//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables that would leak settings from the developer's shell.
const ISOLATED_VARS: &[&str] = &[
    "STRATA_TABLE",
    "STRATA_KEY",
    "STRATA_STORE",
    "STRATA_STORE_PATH",
    "STRATA_CIPHER",
    "STRATA_LOG",
    "AWS_REGION",
];

impl Test {
    /// Create a strata command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - Colors disabled
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_strata"));
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run strata with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run strata")
    }

    /// Shortcut for `strata init`.
    pub fn init_cmd(&self) -> Output {
        self.run(&["init"])
    }

    /// Shortcut for `strata encrypt KEY=VALUE --add FILE`.
    pub fn encrypt_add(&self, key: &str, value: &str, file: &str) -> Output {
        let pair = format!("{key}={value}");
        self.run(&["encrypt", &pair, "--add", file])
    }

    /// Shortcut for `strata sync DIR`.
    pub fn sync(&self, dir: &str) -> Output {
        self.run(&["sync", dir])
    }

    /// Shortcut for `strata sync DIR --dry-run`.
    pub fn sync_dry_run(&self, dir: &str) -> Output {
        self.run(&["sync", dir, "--dry-run"])
    }

    /// Shortcut for `strata namespaces`.
    pub fn namespaces(&self) -> Output {
        self.run(&["namespaces"])
    }

    /// Shortcut for `strata get NAMESPACE KEY`.
    pub fn get(&self, namespace: &str, key: &str) -> Output {
        self.run(&["get", namespace, key])
    }
}
