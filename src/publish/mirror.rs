use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{info, warn};

use crate::archive;
use crate::builder::Builder;
use crate::domain::{ProjectInfo, PublishTag};
use crate::error::Result;
use crate::git::Git;
use crate::hooks::{HookContext, HookExecutor};
use crate::npm::Npm;
use crate::process::ProcessRunner;
use crate::publish::PublishOptions;
use crate::TOOL_NAME;

/// Remote name of the external repository inside the mirror repository
pub const PACKAGE_REMOTE: &str = "package-repo";

/// Stages of the publish procedure, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Build,
    PrePublishHook,
    TagPrimary,
    PushPrimary,
    CreateMirror,
    Pack,
    CommitMirror,
    PushMirror,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStage::Build => "build",
            PublishStage::PrePublishHook => "pre-publish hook",
            PublishStage::TagPrimary => "tag primary repository",
            PublishStage::PushPrimary => "push primary repository",
            PublishStage::CreateMirror => "create mirror repository",
            PublishStage::Pack => "pack build output",
            PublishStage::CommitMirror => "commit and tag mirror repository",
            PublishStage::PushMirror => "push mirror repository",
        };
        f.write_str(name)
    }
}

/// Disposable directory holding the mirror repository.
///
/// Deleted when dropped, unless it was kept for inspection in debug mode.
#[derive(Debug)]
pub enum MirrorDir {
    Scoped(TempDir),
    Kept(PathBuf),
}

impl MirrorDir {
    pub fn create(keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", TOOL_NAME))
            .tempdir()?;

        if keep {
            let path = dir.keep();
            warn!(path = %path.display(), "debug mode: mirror repository will not be removed");
            Ok(MirrorDir::Kept(path))
        } else {
            Ok(MirrorDir::Scoped(dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            MirrorDir::Scoped(dir) => dir.path(),
            MirrorDir::Kept(path) => path,
        }
    }

    pub fn kept_path(&self) -> Option<&Path> {
        match self {
            MirrorDir::Scoped(_) => None,
            MirrorDir::Kept(path) => Some(path),
        }
    }
}

/// What a completed publish produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Tag pushed to the primary repository
    pub tag: String,
    /// Tag pushed to the external repository
    pub mirror_tag: String,
    /// Mirror repository left on disk in debug mode
    pub kept_mirror: Option<PathBuf>,
}

/// Builds a project and pushes its packaged output to the project's own repository.
///
/// Any failing stage stops the procedure. Nothing already pushed is rolled
/// back; a primary tag without a mirror push has to be reconciled by hand.
pub struct MirrorPublisher<'a> {
    runner: &'a dyn ProcessRunner,
    options: &'a PublishOptions,
}

impl<'a> MirrorPublisher<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, options: &'a PublishOptions) -> Self {
        MirrorPublisher { runner, options }
    }

    pub fn publish(&self, project: &ProjectInfo) -> Result<PublishReceipt> {
        let repository_url = project.repository_url()?;
        let name = project.project_name.as_str();
        let version = project.version.as_str();
        let workspace_root = &self.options.workspace_root;

        self.enter(project, PublishStage::Build);
        Builder::new(self.runner, &self.options.build_program, self.options.prod)
            .build_project(workspace_root, name)?;

        if let Some(command) = project.pre_publish.as_deref() {
            self.enter(project, PublishStage::PrePublishHook);
            HookExecutor::execute(
                self.runner,
                command,
                &HookContext::for_project(project),
                workspace_root,
            )?;
        }

        let primary = Git::new(self.runner, workspace_root);
        let tag = PublishTag::encode(name, version);

        self.enter(project, PublishStage::TagPrimary);
        primary.tag_annotated(&tag, &format!("{} tagged {} with {}", TOOL_NAME, name, version))?;

        self.enter(project, PublishStage::PushPrimary);
        primary.push_follow_tags()?;

        self.enter(project, PublishStage::CreateMirror);
        let mirror = self.create_mirror_repo(repository_url)?;

        self.enter(project, PublishStage::Pack);
        self.pack_into(project, mirror.path())?;

        self.enter(project, PublishStage::CommitMirror);
        let mirror_git = Git::new(self.runner, mirror.path());
        let mirror_tag = format!("v{}", version);
        let message = project.prefixed_message(&format!(
            "Published {} with {}",
            PublishTag::encode(name, version),
            TOOL_NAME
        ));
        mirror_git.stage_all_and_commit(&message)?;
        mirror_git.tag_annotated(&mirror_tag, &message)?;

        self.enter(project, PublishStage::PushMirror);
        mirror_git.push_tag(PACKAGE_REMOTE, &mirror_tag)?;

        info!(project = name, %tag, %mirror_tag, "published");

        Ok(PublishReceipt {
            tag,
            mirror_tag,
            kept_mirror: mirror.kept_path().map(Path::to_path_buf),
        })
    }

    /// Fresh repository in a disposable directory with the external remote added
    pub fn create_mirror_repo(&self, repository_url: &str) -> Result<MirrorDir> {
        let mirror = MirrorDir::create(self.options.debug)?;
        let git = Git::new(self.runner, mirror.path());

        git.init()?;
        git.remote_add(PACKAGE_REMOTE, repository_url)?;

        Ok(mirror)
    }

    /// Pack the build output and unpack it at the root of `repo_dir`
    pub fn pack_into(&self, project: &ProjectInfo, repo_dir: &Path) -> Result<()> {
        let package_dir = self.options.workspace_root.join(&project.dest);
        let archive_name =
            Npm::new(self.runner, &self.options.npm_program).pack(&package_dir, repo_dir)?;

        archive::extract_and_remove(&repo_dir.join(archive_name), repo_dir)
    }

    fn enter(&self, project: &ProjectInfo, stage: PublishStage) {
        info!(project = %project.project_name, version = %project.version, %stage, "publish stage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::fixtures::write_package_tarball;
    use crate::domain::project::fixtures::lib1;
    use crate::error::PublishError;
    use crate::process::{platform_program, RecordingRunner};

    fn options() -> PublishOptions {
        PublishOptions {
            prod: false,
            ..PublishOptions::default()
        }
    }

    fn runner() -> RecordingRunner {
        let npm = platform_program("npm");
        RecordingRunner::new()
            .respond(&npm, "pack", "lib1-1.0.0.tgz\n")
            .effect(&npm, "pack", |call| {
                write_package_tarball(
                    &call.cwd.join("lib1-1.0.0.tgz"),
                    &[("package.json", r#"{"name": "lib1", "version": "1.0.0"}"#)],
                );
            })
    }

    #[test]
    fn test_publish_runs_stages_in_order() {
        let runner = runner();
        let options = options();

        let receipt = MirrorPublisher::new(&runner, &options)
            .publish(&lib1())
            .unwrap();

        assert_eq!(receipt.tag, "lib1@v1.0.0");
        assert_eq!(receipt.mirror_tag, "v1.0.0");
        assert_eq!(receipt.kept_mirror, None);

        let calls = runner.invocations();
        let summary: Vec<String> = calls
            .iter()
            .map(|c| format!("{} {}", c.program, c.args.first().cloned().unwrap_or_default()))
            .collect();

        assert_eq!(
            summary,
            vec![
                format!("{} build", platform_program("ng")),
                "git tag".to_string(),
                "git push".to_string(),
                "git init".to_string(),
                "git remote".to_string(),
                format!("{} pack", platform_program("npm")),
                "git add".to_string(),
                "git commit".to_string(),
                "git tag".to_string(),
                "git push".to_string(),
            ]
        );

        assert_eq!(
            calls[1].args,
            vec!["tag", "lib1@v1.0.0", "-m", "publish-to-git tagged lib1 with 1.0.0"]
        );
        assert_eq!(calls[2].args, vec!["push", "--follow-tags"]);
        assert_eq!(
            calls[4].args,
            vec!["remote", "add", "package-repo", "ssh://git@some-repo/lib1.git"]
        );
        assert_eq!(
            calls[7].args,
            vec!["commit", "-m", "Published lib1@v1.0.0 with publish-to-git"]
        );
        assert_eq!(
            calls[8].args,
            vec!["tag", "v1.0.0", "-m", "Published lib1@v1.0.0 with publish-to-git"]
        );
        assert_eq!(calls[9].args, vec!["push", "package-repo", "v1.0.0"]);
    }

    #[test]
    fn test_mirror_commands_run_in_disposable_dir() {
        let runner = runner();
        let options = options();

        MirrorPublisher::new(&runner, &options)
            .publish(&lib1())
            .unwrap();

        let calls = runner.invocations();
        let mirror_dir = calls[3].cwd.clone();
        assert_ne!(mirror_dir, options.workspace_root);
        assert!(calls[3..].iter().all(|c| c.cwd == mirror_dir));
        // Scoped directory is gone once the procedure returns.
        assert!(!mirror_dir.exists());
    }

    #[test]
    fn test_debug_mode_keeps_mirror_dir() {
        let runner = runner();
        let options = PublishOptions {
            debug: true,
            ..options()
        };

        let receipt = MirrorPublisher::new(&runner, &options)
            .publish(&lib1())
            .unwrap();

        let kept = receipt.kept_mirror.expect("mirror kept in debug mode");
        assert!(kept.join("package.json").exists());
        assert!(!kept.join("lib1-1.0.0.tgz").exists());
        std::fs::remove_dir_all(kept).unwrap();
    }

    #[test]
    fn test_commit_prefix_applies_to_mirror_commit() {
        let runner = runner();
        let options = options();
        let project = ProjectInfo {
            commit_prefix: "[release]".to_string(),
            ..lib1()
        };

        MirrorPublisher::new(&runner, &options)
            .publish(&project)
            .unwrap();

        assert!(runner
            .command_lines()
            .contains(&"git commit -m [release] Published lib1@v1.0.0 with publish-to-git".to_string()));
    }

    #[test]
    fn test_pre_publish_hook_runs_after_build() {
        let runner = runner();
        let options = options();
        let project = ProjectInfo {
            pre_publish: Some("npm run copy-assets".to_string()),
            ..lib1()
        };

        MirrorPublisher::new(&runner, &options)
            .publish(&project)
            .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls[0].program, platform_program("ng"));
        assert_eq!(calls[1].args.last().unwrap(), "npm run copy-assets");
        assert_eq!(calls[2].args[0], "tag");
    }

    #[test]
    fn test_failing_stage_stops_procedure() {
        let runner = runner().fail("git", "push", "permission denied");
        let options = options();

        let err = MirrorPublisher::new(&runner, &options)
            .publish(&lib1())
            .unwrap_err();

        assert!(matches!(err, PublishError::Process { .. }));
        assert!(!runner.command_lines().iter().any(|c| c == "git init"));
    }

    #[test]
    fn test_missing_repository_url_fails_before_build() {
        let runner = runner();
        let options = options();
        let project = ProjectInfo {
            repository_url: None,
            ..lib1()
        };

        let err = MirrorPublisher::new(&runner, &options)
            .publish(&project)
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidProject(_)));
        assert!(runner.invocations().is_empty());
    }
}
