//! Workspace discovery: turns the configuration, the Angular workspace file
//! and the package manifests into the ordered list of projects for one run.
//!
//! With an `angular.json` present, every project it lists is part of the run
//! (unconfigured ones with publishing disabled), followed by configured
//! packages the file does not mention. Without one, the configured packages
//! are the whole list and must spell out `type`, `root` and `dest`.

pub mod angular;

pub use angular::{read_angular_workspace, NgProjectLayout, ANGULAR_WORKSPACE_FILE};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{determine_commit_prefix, Config, PackageConfig};
use crate::domain::{validate_version, ProjectInfo, ProjectType};
use crate::error::{PublishError, Result};

pub const MANIFEST_FILE_NAME: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: Option<String>,
    repository: Option<ManifestRepository>,
}

/// npm accepts `"repository": "github:user/repo"` as well as the object form
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestRepository {
    Shorthand(String),
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        url: Option<String>,
    },
}

/// Build the project list for one run.
///
/// `command_line_prefix` is the `--commit-prefix` value, if given.
pub fn discover_projects(
    workspace_root: &Path,
    config: &Config,
    command_line_prefix: Option<&str>,
) -> Result<Vec<ProjectInfo>> {
    if config.packages.is_empty() {
        warn!("no packages configured for publishing");
        return Ok(Vec::new());
    }

    let detected = read_angular_workspace(workspace_root)?;
    if detected.is_none() {
        debug!("no {} found, using configured layouts", ANGULAR_WORKSPACE_FILE);
    }
    let detected = detected.unwrap_or_default();

    let from_angular = detected.iter().map(|layout| {
        project_info(
            workspace_root,
            config,
            &layout.name,
            Some(layout),
            config.package(&layout.name),
            command_line_prefix,
        )
    });

    let config_only = config
        .packages
        .iter()
        .filter(|package| !detected.iter().any(|layout| layout.name == package.name))
        .map(|package| {
            project_info(
                workspace_root,
                config,
                &package.name,
                None,
                Some(package),
                command_line_prefix,
            )
        });

    from_angular.chain(config_only).collect()
}

fn project_info(
    workspace_root: &Path,
    config: &Config,
    name: &str,
    detected: Option<&NgProjectLayout>,
    package: Option<&PackageConfig>,
    command_line_prefix: Option<&str>,
) -> Result<ProjectInfo> {
    let missing = |field: &str| {
        PublishError::config(format!(
            "{}: no '{}' configured and no {} entry to take it from",
            name, field, ANGULAR_WORKSPACE_FILE
        ))
    };

    let project_type = package
        .and_then(|p| p.project_type)
        .or(detected.map(|d| d.project_type))
        .ok_or_else(|| missing("type"))?;
    let root = package
        .and_then(|p| p.root.clone())
        .or(detected.map(|d| d.root.clone()))
        .ok_or_else(|| missing("root"))?;
    let dest = package
        .and_then(|p| p.dest.clone())
        .or(detected.map(|d| d.dest.clone()))
        .ok_or_else(|| missing("dest"))?;

    let manifest = manifest_path(workspace_root, project_type, &root);
    let version = read_manifest_version(name, &manifest)?;

    Ok(ProjectInfo {
        project_name: name.to_string(),
        project_type,
        root,
        dest,
        version,
        repository_url: package
            .and_then(|p| p.repository_url.clone())
            .filter(|url| !url.trim().is_empty()),
        publish: package.is_some_and(|p| p.publish),
        commit_prefix: determine_commit_prefix(command_line_prefix, config, name),
        pre_publish: package.and_then(|p| p.pre_publish.clone()),
    })
}

/// Libraries carry their own manifest; applications share the workspace one
fn manifest_path(workspace_root: &Path, project_type: ProjectType, root: &Path) -> PathBuf {
    match project_type {
        ProjectType::Library => workspace_root.join(root).join(MANIFEST_FILE_NAME),
        ProjectType::Application => workspace_root.join(MANIFEST_FILE_NAME),
    }
}

fn read_manifest_version(project_name: &str, manifest: &Path) -> Result<String> {
    let content = fs::read_to_string(manifest).map_err(|e| {
        PublishError::manifest(format!(
            "{}: error reading package file {}: {}",
            project_name,
            manifest.display(),
            e
        ))
    })?;

    let parsed: PackageManifest = serde_json::from_str(&content).map_err(|e| {
        PublishError::manifest(format!(
            "{}: invalid package file {}: {}",
            project_name,
            manifest.display(),
            e
        ))
    })?;

    let repository_valid = match &parsed.repository {
        None => true,
        Some(ManifestRepository::Shorthand(url)) => !url.trim().is_empty(),
        Some(ManifestRepository::Detailed { kind, url }) => kind.is_some() && url.is_some(),
    };
    if !repository_valid {
        return Err(PublishError::manifest(format!(
            "{}: invalid repository field in {}",
            project_name,
            manifest.display()
        )));
    }

    let version = parsed.version.ok_or_else(|| {
        PublishError::manifest(format!(
            "{}: missing version field in {}",
            project_name,
            manifest.display()
        ))
    })?;

    validate_version(&version)
}

/// Apply `--package`: keep only the named project, with publishing forced on
pub fn filter_projects(projects: Vec<ProjectInfo>, package: Option<&str>) -> Result<Vec<ProjectInfo>> {
    let selected: Vec<ProjectInfo> = match package {
        Some(name) => {
            let project = projects
                .into_iter()
                .find(|p| p.project_name == name)
                .ok_or_else(|| PublishError::ProjectNotFound(name.to_string()))?;

            vec![ProjectInfo {
                publish: true,
                ..project
            }]
        }
        None => projects,
    };

    if selected.is_empty() {
        return Err(PublishError::NoProjects);
    }

    Ok(selected)
}
