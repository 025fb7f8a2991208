use std::path::Path;

use tracing::info;

use crate::error::{PublishError, Result};
use crate::hooks::HookContext;
use crate::process::{ProcessRunner, RunOptions};

/// Executes pre-publish hook commands through the platform shell
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook command with the given context
    ///
    /// The command runs in `cwd` with environment variables set from the
    /// context. Its output is logged but not otherwise interpreted.
    ///
    /// # Returns
    /// * `Ok(())` if the command exits with code 0
    /// * `Err(PublishError::Hook)` carrying the command and the failure detail otherwise
    pub fn execute(
        runner: &dyn ProcessRunner,
        command: &str,
        context: &HookContext,
        cwd: &Path,
    ) -> Result<()> {
        let mut options = RunOptions::in_dir(cwd);
        for (key, value) in context.to_env_vars() {
            options = options.env(key, value);
        }

        let (shell, flag) = shell();
        let output = runner
            .run(shell, &[flag, command], &options)
            .map_err(|e| PublishError::hook(command, e.to_string()))?;

        for line in output.lines().filter(|l| !l.trim().is_empty()) {
            info!(project = %context.project_name, "{}", line);
        }

        Ok(())
    }
}

fn shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{RecordingRunner, SystemRunner};

    fn context() -> HookContext {
        HookContext {
            project_name: "lib1".to_string(),
            version: "1.0.0".to_string(),
            dest: "dist/lib1".to_string(),
        }
    }

    #[test]
    fn test_hook_runs_through_shell_with_env() {
        let runner = RecordingRunner::new();
        HookExecutor::execute(&runner, "npm run prepare", &context(), Path::new(".")).unwrap();

        let call = &runner.invocations()[0];
        let (shell, flag) = shell();
        assert_eq!(call.program, shell);
        assert_eq!(call.args, vec![flag, "npm run prepare"]);
        assert!(call
            .env
            .contains(&("PUBLISH_VERSION".to_string(), "1.0.0".to_string())));
    }

    #[test]
    fn test_hook_failure_carries_command() {
        let (shell, flag) = shell();
        let runner = RecordingRunner::new().fail(shell, flag, "not found");

        let err =
            HookExecutor::execute(&runner, "./prepare.sh", &context(), Path::new(".")).unwrap_err();

        match err {
            PublishError::Hook { command, detail } => {
                assert_eq!(command, "./prepare.sh");
                assert!(detail.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_sees_environment() {
        let result = HookExecutor::execute(
            &SystemRunner,
            "test \"$PUBLISH_PROJECT_NAME\" = lib1",
            &context(),
            Path::new("."),
        );
        assert!(result.is_ok());

        let result =
            HookExecutor::execute(&SystemRunner, "exit 4", &context(), Path::new("."));
        assert!(matches!(result, Err(PublishError::Hook { .. })));
    }
}
