use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Separator between the project name and the version in a publish tag
pub const TAG_SEPARATOR: &str = "@v";

/// A project publish tag: `{project_name}@v{version}`
///
/// Project names containing `@v` followed by a three-part version make
/// decoding ambiguous; the rightmost match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTag {
    pub project_name: String,
    pub version: String,
}

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    // Greedy name group: the last `@v<d>.<d>.<d>` in the string is the version.
    TAG_RE.get_or_init(|| Regex::new(r"^(.+)@v(\d+\.\d+\.\d+)$").expect("valid tag regex"))
}

impl PublishTag {
    pub fn new(project_name: impl Into<String>, version: impl Into<String>) -> Self {
        PublishTag {
            project_name: project_name.into(),
            version: version.into(),
        }
    }

    /// Encode a project name and version into a tag string
    /// Example: ("lib1", "1.0.0") -> "lib1@v1.0.0"
    pub fn encode(project_name: &str, version: &str) -> String {
        format!("{}{}{}", project_name, TAG_SEPARATOR, version)
    }

    /// Decode a tag string, returning `None` for tags that are not publish tags
    pub fn decode(tag: &str) -> Option<Self> {
        let captures = tag_regex().captures(tag)?;

        Some(PublishTag {
            project_name: captures[1].to_string(),
            version: captures[2].to_string(),
        })
    }

    /// Whether this tag belongs to the given project
    pub fn is_for(&self, project_name: &str) -> bool {
        self.project_name == project_name
    }
}

impl fmt::Display for PublishTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::encode(&self.project_name, &self.version))
    }
}
