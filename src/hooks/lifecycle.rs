use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Types of hooks available in the release pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    PreDispatch,
    PrePublish,
    PostPublish,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreDispatch => "pre-dispatch",
            HookType::PrePublish => "pre-publish",
            HookType::PostPublish => "post-publish",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// Branch the run was triggered on
    pub branch: String,
    /// Tag being released
    pub tag: String,
    /// Resolved version string
    pub version: String,
    /// Release channel name
    pub channel: String,
    /// Release type (major, minor, patch)
    pub release_type: String,
    /// Number of collected artifacts, if known at this hook point
    pub artifact_count: Option<usize>,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to SEMREL_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("SEMREL_BRANCH".to_string(), self.branch.clone());
        env.insert("SEMREL_TAG".to_string(), self.tag.clone());
        env.insert("SEMREL_VERSION".to_string(), self.version.clone());
        env.insert("SEMREL_CHANNEL".to_string(), self.channel.clone());
        env.insert(
            "SEMREL_RELEASE_TYPE".to_string(),
            self.release_type.clone(),
        );

        if let Some(count) = self.artifact_count {
            env.insert("SEMREL_ARTIFACT_COUNT".to_string(), count.to_string());
        }

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_type_names() {
        assert_eq!(HookType::PreDispatch.name(), "pre-dispatch");
        assert_eq!(HookType::PrePublish.name(), "pre-publish");
        assert_eq!(HookType::PostPublish.name(), "post-publish");
    }

    #[test]
    fn test_hook_context_to_env_vars_all_fields() {
        let ctx = HookContext {
            hook_type: HookType::PrePublish,
            branch: "main".to_string(),
            tag: "v1.2.3".to_string(),
            version: "1.2.3".to_string(),
            channel: "stable".to_string(),
            release_type: "minor".to_string(),
            artifact_count: Some(3),
        };

        let env = ctx.to_env_vars();
        assert_eq!(env.get("SEMREL_BRANCH"), Some(&"main".to_string()));
        assert_eq!(env.get("SEMREL_TAG"), Some(&"v1.2.3".to_string()));
        assert_eq!(env.get("SEMREL_VERSION"), Some(&"1.2.3".to_string()));
        assert_eq!(env.get("SEMREL_CHANNEL"), Some(&"stable".to_string()));
        assert_eq!(env.get("SEMREL_RELEASE_TYPE"), Some(&"minor".to_string()));
        assert_eq!(env.get("SEMREL_ARTIFACT_COUNT"), Some(&"3".to_string()));
    }

    #[test]
    fn test_hook_context_to_env_vars_without_artifacts() {
        let ctx = HookContext {
            hook_type: HookType::PreDispatch,
            branch: "release/1.x".to_string(),
            tag: "v1.3.0-rc.1".to_string(),
            version: "1.3.0-rc.1".to_string(),
            channel: "rc".to_string(),
            release_type: "minor".to_string(),
            artifact_count: None,
        };

        let env = ctx.to_env_vars();
        assert_eq!(env.len(), 5);
        assert!(env.get("SEMREL_ARTIFACT_COUNT").is_none());
    }
}
