use thiserror::Error;

/// Unified error type for publish-to-git operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Working directory is not clean")]
    WorkingDirNotClean,

    #[error("{program} {} failed with exit code {code}: {stderr}", .args.join(" "))]
    Process {
        program: String,
        args: Vec<String>,
        code: i32,
        stderr: String,
    },

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pre-publish hook '{command}' failed: {detail}")]
    Hook { command: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Packaging error: {0}")]
    Package(String),

    #[error("Project: {0} not found")]
    ProjectNotFound(String),

    #[error("No projects configured for publishing")]
    NoProjects,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in publish-to-git
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create an invalid project error with context
    pub fn invalid_project(msg: impl Into<String>) -> Self {
        PublishError::InvalidProject(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        PublishError::Manifest(msg.into())
    }

    /// Create a workspace layout error with context
    pub fn workspace(msg: impl Into<String>) -> Self {
        PublishError::Workspace(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        PublishError::Version(msg.into())
    }

    /// Create a packaging error with context
    pub fn package(msg: impl Into<String>) -> Self {
        PublishError::Package(msg.into())
    }

    /// Create a hook error carrying the attempted command
    pub fn hook(command: impl Into<String>, detail: impl Into<String>) -> Self {
        PublishError::Hook {
            command: command.into(),
            detail: detail.into(),
        }
    }
}
