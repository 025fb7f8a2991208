//! External command execution
//!
//! Every tool this crate drives (git, the build tool, npm, the pre-publish
//! hook shell) goes through [`ProcessRunner`], so a single test
//! double can observe and script all of them.

pub mod mock;

pub use mock::RecordingRunner;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{PublishError, Result};

/// Options for one external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    /// Let stderr stream to the operator instead of capturing it
    pub verbose: bool,
}

impl RunOptions {
    pub fn in_dir(cwd: impl AsRef<Path>) -> Self {
        RunOptions {
            cwd: cwd.as_ref().to_path_buf(),
            env: Vec::new(),
            verbose: false,
        }
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Runs an external program and returns its captured standard output.
///
/// Implementations fail with [`PublishError::Process`] on a non-zero exit
/// status and [`PublishError::Spawn`] when the program cannot be started.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[&str], options: &RunOptions) -> Result<String>;
}

/// [`ProcessRunner`] backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], options: &RunOptions) -> Result<String> {
        info!(
            "Executing: {} {} with cwd: {}",
            program,
            args.join(" "),
            options.cwd.display()
        );

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&options.cwd).stdin(Stdio::null());

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        if options.verbose {
            cmd.stderr(Stdio::inherit());
        }

        let output = cmd.output().map_err(|source| PublishError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(PublishError::Process {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(program, bytes = stdout.len(), "command finished");
        Ok(stdout)
    }
}

/// Resolve the executable name of a script-shim tool such as `ng` or `npm`.
///
/// On Windows these tools are installed as `.cmd` wrappers.
pub fn platform_program(name: &str) -> String {
    if cfg!(windows) && !name.ends_with(".cmd") {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}

/// Path rendered for use as a command-line argument
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_builder() {
        let options = RunOptions::in_dir("/tmp").verbose().env("A", "1");
        assert_eq!(options.cwd, PathBuf::from("/tmp"));
        assert!(options.verbose);
        assert_eq!(options.env, vec![("A".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_platform_program() {
        let resolved = platform_program("ng");
        if cfg!(windows) {
            assert_eq!(resolved, "ng.cmd");
        } else {
            assert_eq!(resolved, "ng");
        }
        assert_eq!(platform_program("npm.cmd"), "npm.cmd");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner
            .run("sh", &["-c", "echo hello"], &RunOptions::in_dir("."))
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let err = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"], &RunOptions::in_dir("."))
            .unwrap_err();

        match err {
            PublishError::Process { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(
                "definitely-not-a-real-program-4711",
                &[],
                &RunOptions::in_dir("."),
            )
            .unwrap_err();
        assert!(matches!(err, PublishError::Spawn { .. }));
    }
}
