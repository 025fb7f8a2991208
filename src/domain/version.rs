use crate::error::{PublishError, Result};

/// Validate a `MAJOR.MINOR.PATCH` version string and return it trimmed.
///
/// Pre-release and build metadata are rejected because publish tags only
/// carry the three numeric components.
pub fn validate_version(version: &str) -> Result<String> {
    let trimmed = version.trim();
    let parsed = semver::Version::parse(trimmed)
        .map_err(|e| PublishError::version(format!("Invalid version '{}': {}", trimmed, e)))?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(PublishError::version(format!(
            "Invalid version '{}': expected MAJOR.MINOR.PATCH",
            trimmed
        )));
    }

    Ok(trimmed.to_string())
}
