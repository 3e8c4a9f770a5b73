use crate::error::{Result, SemrelError};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;

/// Executes release pipeline hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script is executed with environment variables set from the context.
    /// If the script exits with code 0, the hook succeeds. Any non-zero exit
    /// code is treated as a failure.
    pub fn execute(script_path: &str, context: &HookContext) -> Result<()> {
        let path = Path::new(script_path);

        if !path.exists() {
            return Err(SemrelError::hook(format!(
                "Hook script not found: {}",
                script_path
            )));
        }

        if !path.is_file() {
            return Err(SemrelError::hook(format!(
                "Hook path is not a file: {}",
                script_path
            )));
        }

        let mut cmd = Command::new(script_path);
        for (key, value) in context.to_env_vars() {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| {
            SemrelError::hook(format!("Failed to execute hook {}: {}", script_path, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SemrelError::hook(format!(
                "Hook {} ({}) failed with exit code {}: {}",
                script_path,
                context.hook_type.name(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }
}
