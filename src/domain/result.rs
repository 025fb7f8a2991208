use std::fmt;

/// Terminal outcome of the publish decision for one project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    /// Publishing is switched off for the project
    Disabled,
    /// The current version is tagged and nothing changed since
    UpToDate,
    /// The current version had never been published
    PublishedFresh,
    /// Files changed since the current version's tag; patch bumped and published
    PublishedBumped,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishState::Disabled => "disabled",
            PublishState::UpToDate => "up-to-date",
            PublishState::PublishedFresh => "published",
            PublishState::PublishedBumped => "published-bumped",
        };
        f.write_str(name)
    }
}

/// Outcome record for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub project_name: String,
    pub version: String,
    /// Present only for [`PublishState::PublishedBumped`]
    pub new_version: Option<String>,
    pub publish_state: PublishState,
}

impl PublishResult {
    pub fn new(project_name: &str, version: &str, publish_state: PublishState) -> Self {
        PublishResult {
            project_name: project_name.to_string(),
            version: version.to_string(),
            new_version: None,
            publish_state,
        }
    }

    pub fn bumped(project_name: &str, version: &str, new_version: &str) -> Self {
        PublishResult {
            new_version: Some(new_version.to_string()),
            ..Self::new(project_name, version, PublishState::PublishedBumped)
        }
    }
}
