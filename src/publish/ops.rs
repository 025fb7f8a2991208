use std::path::PathBuf;

use crate::builder::DEFAULT_BUILD_PROGRAM;
use crate::domain::ProjectInfo;
use crate::error::Result;
use crate::git::Git;
use crate::npm::{Npm, DEFAULT_NPM_PROGRAM};
use crate::process::ProcessRunner;
use crate::publish::{MirrorPublisher, PublishOps};

/// Run-wide settings threaded into the publish procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Root of the primary repository working tree
    pub workspace_root: PathBuf,
    /// Keep mirror repositories on disk and report their location
    pub debug: bool,
    /// Pass `--prod` to the build tool
    pub prod: bool,
    pub build_program: String,
    pub npm_program: String,
}

impl Default for PublishOptions {
    fn default() -> Self {
        PublishOptions {
            workspace_root: PathBuf::from("."),
            debug: false,
            prod: true,
            build_program: DEFAULT_BUILD_PROGRAM.to_string(),
            npm_program: DEFAULT_NPM_PROGRAM.to_string(),
        }
    }
}

/// Production [`PublishOps`]: git for repository state, npm for version
/// bumps, [`MirrorPublisher`] for the publish itself
pub struct GitPublishOps<'a> {
    runner: &'a dyn ProcessRunner,
    options: PublishOptions,
}

impl<'a> GitPublishOps<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, options: PublishOptions) -> Self {
        GitPublishOps { runner, options }
    }

    fn git(&self) -> Git<'a> {
        Git::new(self.runner, &self.options.workspace_root)
    }
}

impl PublishOps for GitPublishOps<'_> {
    fn working_dir_is_clean(&self) -> Result<bool> {
        self.git().working_dir_is_clean()
    }

    fn project_publish_tags(&self, project_name: &str) -> Result<Vec<String>> {
        self.git().project_publish_tags(project_name)
    }

    fn has_changes_since_tag(&self, project: &ProjectInfo, tag: &str) -> Result<bool> {
        self.git().has_changes_since_tag(&project.root, tag)
    }

    fn bump_patch_version(&self, project: &ProjectInfo) -> Result<String> {
        let dir = self.options.workspace_root.join(project.manifest_dir());
        Npm::new(self.runner, &self.options.npm_program).bump_patch_version(&dir)
    }

    fn stage_all_and_commit(&self, message: &str) -> Result<()> {
        self.git().stage_all_and_commit(message)
    }

    fn publish(&self, project: &ProjectInfo) -> Result<()> {
        MirrorPublisher::new(self.runner, &self.options).publish(project)?;
        Ok(())
    }
}
