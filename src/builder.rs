//! Project build invocation

use std::path::Path;

use crate::error::Result;
use crate::process::{platform_program, ProcessRunner, RunOptions};

pub const DEFAULT_BUILD_PROGRAM: &str = "ng";

/// Builds workspace projects with `<program> build <project> [--prod]`
pub struct Builder<'a> {
    runner: &'a dyn ProcessRunner,
    program: String,
    prod: bool,
}

impl<'a> Builder<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, program: &str, prod: bool) -> Self {
        Builder {
            runner,
            program: platform_program(program),
            prod,
        }
    }

    pub fn build_project(&self, workspace_root: &Path, project_name: &str) -> Result<()> {
        let mut args = vec!["build", project_name];
        if self.prod {
            args.push("--prod");
        }

        self.runner.run(
            &self.program,
            &args,
            &RunOptions::in_dir(workspace_root).verbose(),
        )?;
        Ok(())
    }
}
