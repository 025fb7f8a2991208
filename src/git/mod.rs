//! Git gateway
//!
//! A thin call-through to a [`ProcessRunner`] specialised for the `git`
//! binary. Network transport and authentication are left to git itself.
//!
//! ```rust,no_run
//! # use publish_to_git::git::Git;
//! # use publish_to_git::process::SystemRunner;
//! # fn example() -> publish_to_git::Result<()> {
//! let git = Git::new(&SystemRunner, ".");
//! if git.working_dir_is_clean()? {
//!     let tags = git.project_publish_tags("lib1")?;
//!     println!("{} published versions", tags.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::domain::PublishTag;
use crate::error::Result;
use crate::process::{path_arg, ProcessRunner, RunOptions};

pub const GIT_PROGRAM: &str = "git";

/// Git commands bound to one repository working directory
pub struct Git<'a> {
    runner: &'a dyn ProcessRunner,
    cwd: PathBuf,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, cwd: impl AsRef<Path>) -> Self {
        Git {
            runner,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Run an arbitrary git command and return its stdout
    pub fn run(&self, args: &[&str]) -> Result<String> {
        self.runner
            .run(GIT_PROGRAM, args, &RunOptions::in_dir(&self.cwd))
    }

    /// True when `git status --porcelain` reports nothing
    pub fn working_dir_is_clean(&self) -> Result<bool> {
        Ok(self.run(&["status", "--porcelain"])?.trim().is_empty())
    }

    /// All tag names, in the order git lists them
    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(non_blank_lines(&self.run(&["tag"])?))
    }

    /// Publish tags of one project, keeping git's relative order.
    ///
    /// Tags that do not decode as publish tags are not ours and are skipped.
    pub fn project_publish_tags(&self, project_name: &str) -> Result<Vec<String>> {
        Ok(self
            .tags()?
            .into_iter()
            .filter(|tag| PublishTag::decode(tag).is_some_and(|t| t.is_for(project_name)))
            .collect())
    }

    /// Whether any file under `root` differs between `tag` and the working tree
    pub fn has_changes_since_tag(&self, root: &Path, tag: &str) -> Result<bool> {
        let root = path_arg(root);
        let changed = self.run(&["diff", "--name-only", tag, "--", root.as_str()])?;
        Ok(!non_blank_lines(&changed).is_empty())
    }

    pub fn stage(&self, file_spec: &str) -> Result<()> {
        self.run(&["add", file_spec])?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    pub fn stage_all_and_commit(&self, message: &str) -> Result<()> {
        self.stage(".")?;
        self.commit(message)
    }

    /// Create an annotated tag at HEAD
    pub fn tag_annotated(&self, tag: &str, message: &str) -> Result<()> {
        self.run(&["tag", tag, "-m", message])?;
        Ok(())
    }

    /// Push commits together with the annotated tags reachable from them
    pub fn push_follow_tags(&self) -> Result<()> {
        self.run(&["push", "--follow-tags"])?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.run(&["init"])?;
        Ok(())
    }

    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.run(&["push", remote, tag])?;
        Ok(())
    }
}

fn non_blank_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::process::RecordingRunner;

    #[test]
    fn test_working_dir_dirty() {
        let runner = RecordingRunner::new().respond("git", "status", "\nM some-file.ts\n");
        let git = Git::new(&runner, ".");

        assert!(!git.working_dir_is_clean().unwrap());
        assert_eq!(runner.command_lines(), vec!["git status --porcelain"]);
    }

    #[test]
    fn test_working_dir_clean() {
        let runner = RecordingRunner::new().respond("git", "status", "\n\n");
        let git = Git::new(&runner, ".");

        assert!(git.working_dir_is_clean().unwrap());
    }

    #[test]
    fn test_project_publish_tags() {
        let runner = RecordingRunner::new().respond(
            "git",
            "tag",
            "lib1@v1.2.0\nlib2@v3.0.1\nrelease-7\nlib1@v2.1.0\n",
        );
        let git = Git::new(&runner, ".");

        assert_eq!(
            git.project_publish_tags("lib1").unwrap(),
            vec!["lib1@v1.2.0", "lib1@v2.1.0"]
        );
        assert_eq!(git.project_publish_tags("lib2").unwrap(), vec!["lib2@v3.0.1"]);
    }

    #[test]
    fn test_project_publish_tags_keeps_order() {
        let runner =
            RecordingRunner::new().respond("git", "tag", "a@v1.0.0\na@v1.0.1\nb@v2.0.0\n");
        let git = Git::new(&runner, ".");

        assert_eq!(
            git.project_publish_tags("a").unwrap(),
            vec!["a@v1.0.0", "a@v1.0.1"]
        );
    }

    #[test]
    fn test_project_publish_tags_empty() {
        let runner = RecordingRunner::new().respond("git", "tag", "\n");
        let git = Git::new(&runner, ".");

        assert!(git.project_publish_tags("lib1").unwrap().is_empty());
    }

    #[test]
    fn test_project_publish_tags_git_failure() {
        let runner = RecordingRunner::new().fail("git", "tag", "Git error");
        let git = Git::new(&runner, ".");

        let err = git.project_publish_tags("lib1").unwrap_err();
        assert!(matches!(err, PublishError::Process { .. }));
        assert!(err.to_string().contains("Git error"));
    }

    #[test]
    fn test_has_changes_since_tag() {
        let runner = RecordingRunner::new().respond("git", "diff", "projects/lib1/some-file\n");
        let git = Git::new(&runner, ".");

        assert!(git
            .has_changes_since_tag(Path::new("projects/lib1"), "lib1@v1.0.0")
            .unwrap());
        assert_eq!(
            runner.command_lines(),
            vec!["git diff --name-only lib1@v1.0.0 -- projects/lib1"]
        );
    }

    #[test]
    fn test_has_no_changes_since_tag() {
        let runner = RecordingRunner::new().respond("git", "diff", "\n");
        let git = Git::new(&runner, ".");

        assert!(!git
            .has_changes_since_tag(Path::new("projects/lib1"), "lib1@v1.0.0")
            .unwrap());
    }

    #[test]
    fn test_stage_all_and_commit() {
        let runner = RecordingRunner::new();
        let git = Git::new(&runner, ".");

        git.stage_all_and_commit("WIP").unwrap();

        let calls = runner.invocations();
        assert_eq!(calls[0].args, vec!["add", "."]);
        assert_eq!(calls[1].args, vec!["commit", "-m", "WIP"]);
    }

    #[test]
    fn test_tag_and_push() {
        let runner = RecordingRunner::new();
        let git = Git::new(&runner, "repo");

        git.tag_annotated("lib1@v1.0.24", "tagged").unwrap();
        git.push_follow_tags().unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["git tag lib1@v1.0.24 -m tagged", "git push --follow-tags"]
        );
        assert!(runner
            .invocations()
            .iter()
            .all(|i| i.cwd == PathBuf::from("repo")));
    }

    #[test]
    fn test_init_and_remote_add() {
        let runner = RecordingRunner::new();
        let git = Git::new(&runner, "./tmp");

        git.init().unwrap();
        git.remote_add("package-repo", "https://some-repo.git").unwrap();
        git.push_tag("package-repo", "v1.0.0").unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "git init",
                "git remote add package-repo https://some-repo.git",
                "git push package-repo v1.0.0",
            ]
        );
    }
}
