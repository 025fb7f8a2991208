//! npm as version bumper and packager

use std::path::Path;

use crate::domain::validate_version;
use crate::error::{PublishError, Result};
use crate::process::{path_arg, platform_program, ProcessRunner, RunOptions};

pub const DEFAULT_NPM_PROGRAM: &str = "npm";

pub struct Npm<'a> {
    runner: &'a dyn ProcessRunner,
    program: String,
}

impl<'a> Npm<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, program: &str) -> Self {
        Npm {
            runner,
            program: platform_program(program),
        }
    }

    /// Run `npm version patch` in `dir` and return the new version without the `v`.
    ///
    /// Only the manifest is rewritten; npm is told not to commit or tag, so
    /// the caller owns the version commit.
    pub fn bump_patch_version(&self, dir: &Path) -> Result<String> {
        let output = self.runner.run(
            &self.program,
            &["version", "patch", "--no-git-tag-version"],
            &RunOptions::in_dir(dir),
        )?;

        let trimmed = output.trim();
        validate_version(trimmed.strip_prefix('v').unwrap_or(trimmed))
    }

    /// Pack `package_dir` into an archive inside `out_dir`; returns the archive file name
    pub fn pack(&self, package_dir: &Path, out_dir: &Path) -> Result<String> {
        let package_dir = std::path::absolute(package_dir)?;
        let package_arg = path_arg(&package_dir);
        let output = self.runner.run(
            &self.program,
            &["pack", package_arg.as_str()],
            &RunOptions::in_dir(out_dir),
        )?;

        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string)
            .ok_or_else(|| {
                PublishError::package(format!(
                    "{} pack {} did not report an archive name",
                    self.program, package_arg
                ))
            })
    }
}
