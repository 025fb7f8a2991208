//! Domain logic - pure publishing rules independent of git and the build tools

pub mod project;
pub mod result;
pub mod tag;
pub mod version;

pub use project::{ProjectInfo, ProjectType};
pub use result::{PublishResult, PublishState};
pub use tag::PublishTag;
pub use version::validate_version;
