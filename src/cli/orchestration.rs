//! Main workflow orchestration logic
//!
//! Loads the workspace configuration, discovers the projects and runs the
//! publish batch. Kept apart from `main.rs` so it can be driven without clap
//! and with any [`ProcessRunner`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::load_config;
use crate::domain::PublishResult;
use crate::process::ProcessRunner;
use crate::publish::{publish_all_if_changed, GitPublishOps, PublishOptions};
use crate::workspace::{discover_projects, filter_projects};

/// Arguments for the publish workflow
///
/// Mirrors the CLI Args in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Path to a config file other than `<workspace>/publish-to-git.toml`
    pub config_path: Option<PathBuf>,

    /// Root of the workspace and primary repository
    pub workspace: PathBuf,

    /// Overrides every other commit prefix setting, even when empty
    pub commit_prefix: Option<String>,

    /// Publish only this project, regardless of its publish flag
    pub package: Option<String>,

    /// Keep mirror repositories and report full errors
    pub debug: bool,

    /// Pass `--prod` to the build
    pub prod: bool,
}

impl Default for PublishWorkflowArgs {
    fn default() -> Self {
        PublishWorkflowArgs {
            config_path: None,
            workspace: PathBuf::from("."),
            commit_prefix: None,
            package: None,
            debug: false,
            prod: true,
        }
    }
}

/// Main publish workflow
///
/// 1. Load configuration
/// 2. Discover projects and apply `--package`
/// 3. Run the decision engine over every project, in order
///
/// The first failing project fails the whole run.
pub fn run_publish_workflow(
    args: &PublishWorkflowArgs,
    runner: &dyn ProcessRunner,
) -> Result<Vec<PublishResult>> {
    let config = load_config(args.config_path.as_deref(), &args.workspace)
        .with_context(|| format!("workspace {}", args.workspace.display()))?;

    let projects = discover_projects(&args.workspace, &config, args.commit_prefix.as_deref())?;
    let projects = filter_projects(projects, args.package.as_deref())?;

    info!(count = projects.len(), "projects selected");

    let options = PublishOptions {
        workspace_root: args.workspace.clone(),
        debug: args.debug,
        prod: args.prod,
        build_program: config.build.program.clone(),
        npm_program: config.npm.program.clone(),
    };
    let ops = GitPublishOps::new(runner, options);

    let results = publish_all_if_changed(&projects, &ops)?;
    for result in &results {
        info!(project = %result.project_name, state = %result.publish_state, "done");
    }

    Ok(results)
}
