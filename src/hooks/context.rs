use std::collections::BTreeMap;

use crate::domain::ProjectInfo;

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Project being published
    pub project_name: String,
    /// Version being published
    pub version: String,
    /// Build output directory that will be packaged
    pub dest: String,
}

impl HookContext {
    pub fn for_project(project: &ProjectInfo) -> Self {
        HookContext {
            project_name: project.project_name.clone(),
            version: project.version.clone(),
            dest: project.dest.to_string_lossy().into_owned(),
        }
    }

    /// Convert context to PUBLISH_* environment variables for the hook command
    pub fn to_env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        env.insert("PUBLISH_PROJECT_NAME".to_string(), self.project_name.clone());
        env.insert("PUBLISH_VERSION".to_string(), self.version.clone());
        env.insert("PUBLISH_DEST".to_string(), self.dest.clone());

        env
    }
}
