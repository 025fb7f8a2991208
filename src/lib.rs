pub mod archive;
pub mod builder;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod npm;
pub mod process;
pub mod publish;
pub mod telemetry;
pub mod ui;
pub mod workspace;

pub use error::{PublishError, Result};

/// Name used in generated commit and tag messages
pub const TOOL_NAME: &str = "publish-to-git";
