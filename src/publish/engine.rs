use tracing::info;

use crate::domain::{ProjectInfo, PublishResult, PublishState, PublishTag};
use crate::error::{PublishError, Result};
use crate::TOOL_NAME;

/// Capabilities the decision engine acts through.
///
/// The production implementation is [`GitPublishOps`](super::GitPublishOps);
/// tests substitute a recording double.
pub trait PublishOps {
    /// Whether the shared working tree has no uncommitted changes
    fn working_dir_is_clean(&self) -> Result<bool>;

    /// Existing publish tags of one project
    fn project_publish_tags(&self, project_name: &str) -> Result<Vec<String>>;

    /// Whether files under the project root changed since `tag`
    fn has_changes_since_tag(&self, project: &ProjectInfo, tag: &str) -> Result<bool>;

    /// Increment the patch version and return the new version
    fn bump_patch_version(&self, project: &ProjectInfo) -> Result<String>;

    fn stage_all_and_commit(&self, message: &str) -> Result<()>;

    /// Run the full publish procedure for `project` at its `version`
    fn publish(&self, project: &ProjectInfo) -> Result<()>;
}

/// Decide and carry out the publish action for one project.
///
/// Outcomes:
/// - publishing disabled: [`PublishState::Disabled`], nothing written
/// - current version never tagged: publish as is, [`PublishState::PublishedFresh`]
/// - tagged and unchanged: [`PublishState::UpToDate`], nothing written
/// - tagged but changed: bump the patch version, commit, publish the new
///   version, [`PublishState::PublishedBumped`]
///
/// A dirty working tree fails before any other git or build call. Failures
/// of the underlying operations are returned unchanged.
pub fn publish_if_changed(project: &ProjectInfo, ops: &dyn PublishOps) -> Result<PublishResult> {
    project.validate()?;

    if !ops.working_dir_is_clean()? {
        return Err(PublishError::WorkingDirNotClean);
    }

    let name = project.project_name.as_str();

    if !project.publish {
        info!(project = name, "publish disabled");
        return Ok(PublishResult::new(name, &project.version, PublishState::Disabled));
    }

    let tag = PublishTag::encode(name, &project.version);
    let existing_tags = ops.project_publish_tags(name)?;

    if !existing_tags.contains(&tag) {
        info!(project = name, version = %project.version, "version not yet published");
        ops.publish(project)?;
        return Ok(PublishResult::new(
            name,
            &project.version,
            PublishState::PublishedFresh,
        ));
    }

    if !ops.has_changes_since_tag(project, &tag)? {
        info!(project = name, %tag, "no changes since tag");
        return Ok(PublishResult::new(name, &project.version, PublishState::UpToDate));
    }

    let new_version = ops.bump_patch_version(project)?;
    info!(project = name, from = %project.version, to = %new_version, "version bumped");

    let bumped = project.with_version(&new_version);
    ops.stage_all_and_commit(&bump_commit_message(&bumped))?;
    ops.publish(&bumped)?;

    Ok(PublishResult::bumped(name, &project.version, &new_version))
}

/// Apply [`publish_if_changed`] to each project in order.
///
/// The first failure aborts the batch; results gathered so far are dropped.
pub fn publish_all_if_changed(
    projects: &[ProjectInfo],
    ops: &dyn PublishOps,
) -> Result<Vec<PublishResult>> {
    projects
        .iter()
        .map(|project| publish_if_changed(project, ops))
        .collect()
}

fn bump_commit_message(project: &ProjectInfo) -> String {
    project.prefixed_message(&format!(
        "{} updated {} to version v{}",
        TOOL_NAME, project.project_name, project.version
    ))
}
