use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::DEFAULT_BUILD_PROGRAM;
use crate::domain::ProjectType;
use crate::error::{PublishError, Result};
use crate::npm::DEFAULT_NPM_PROGRAM;

/// File name looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = "publish-to-git.toml";

/// Represents the complete configuration for publish-to-git.
///
/// Lists the workspace packages, how they are published, and the tools used
/// to build and version them.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Prefix for generated commit messages, unless overridden per package
    #[serde(default)]
    pub commit_prefix: Option<String>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub npm: NpmConfig,

    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

fn default_build_program() -> String {
    DEFAULT_BUILD_PROGRAM.to_string()
}

fn default_npm_program() -> String {
    DEFAULT_NPM_PROGRAM.to_string()
}

/// Build tool invoked as `<program> build <project>`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_build_program")]
    pub program: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            program: default_build_program(),
        }
    }
}

/// Package manager used for `version patch` and `pack`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NpmConfig {
    #[serde(default = "default_npm_program")]
    pub program: String,
}

impl Default for NpmConfig {
    fn default() -> Self {
        NpmConfig {
            program: default_npm_program(),
        }
    }
}

/// One `[[packages]]` entry.
///
/// `type`, `root` and `dest` may be left out when `angular.json` declares the
/// project; values given here take precedence.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PackageConfig {
    pub name: String,

    #[serde(rename = "type", default)]
    pub project_type: Option<ProjectType>,

    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub dest: Option<PathBuf>,

    pub publish: bool,

    #[serde(default)]
    pub repository_url: Option<String>,

    #[serde(default)]
    pub commit_prefix: Option<String>,

    /// Shell command run after the build, before packaging
    #[serde(default)]
    pub pre_publish: Option<String>,
}

impl Config {
    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Check structural rules serde cannot express
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for package in &self.packages {
            if package.name.trim().is_empty() {
                return Err(PublishError::config("package with an empty name"));
            }

            if !seen.insert(package.name.as_str()) {
                return Err(PublishError::config(format!(
                    "package '{}' is listed more than once",
                    package.name
                )));
            }
        }

        Ok(())
    }
}

/// Loads the workspace configuration.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter
/// 2. `publish-to-git.toml` in the workspace root
///
/// # Returns
/// * `Ok(Config)` - Parsed and validated configuration
/// * `Err` - If no file exists, or it cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, workspace_root: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => workspace_root.join(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        return Err(PublishError::config(format!(
            "{} not found; add packages to publish there",
            path.display()
        )));
    }

    let config: Config = toml::from_str(&fs::read_to_string(&path)?)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the commit message prefix for one project.
///
/// The command line wins, then the package entry, then the global setting.
/// An explicitly empty value still wins over the levels below it.
pub fn determine_commit_prefix(
    command_line: Option<&str>,
    config: &Config,
    project_name: &str,
) -> String {
    command_line
        .or_else(|| {
            config
                .package(project_name)
                .and_then(|p| p.commit_prefix.as_deref())
        })
        .or(config.commit_prefix.as_deref())
        .unwrap_or_default()
        .to_string()
}
