use crate::error::{Result, SemrelError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Represents the complete configuration for the release pipeline.
///
/// Contains the project identity, ordered branch rules, the build target
/// matrix, conventional commit settings and lifecycle hooks.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    /// Ordered branch rules; the first matching rule wins.
    #[serde(default = "default_branch_rules")]
    pub branches: Vec<BranchRuleConfig>,

    /// Build target matrix; each entry is one (os, arch) pair.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

/// Project identity used for artifact naming.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
}

fn default_project_name() -> String {
    "app".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: default_project_name(),
        }
    }
}

/// One branch-to-channel rule.
///
/// `pattern` is an exact branch name or a glob with `*` wildcards
/// ("release/*"). `channel` is one of stable, rc, beta or none.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BranchRuleConfig {
    pub pattern: String,

    pub channel: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// Returns the default ordered branch rules.
fn default_branch_rules() -> Vec<BranchRuleConfig> {
    vec![
        BranchRuleConfig {
            pattern: "main".to_string(),
            channel: "stable".to_string(),
            tag_pattern: default_tag_pattern(),
        },
        BranchRuleConfig {
            pattern: "master".to_string(),
            channel: "stable".to_string(),
            tag_pattern: default_tag_pattern(),
        },
        BranchRuleConfig {
            pattern: "release/*".to_string(),
            channel: "rc".to_string(),
            tag_pattern: default_tag_pattern(),
        },
        BranchRuleConfig {
            pattern: "develop".to_string(),
            channel: "beta".to_string(),
            tag_pattern: default_tag_pattern(),
        },
    ]
}

/// One build target: a (os, arch) pair plus target-specific options.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TargetConfig {
    pub os: String,

    pub arch: String,

    #[serde(default)]
    pub ext: String,

    /// Shell command the build backend runs for this target.
    #[serde(default)]
    pub command: Option<String>,

    /// Target-specific metadata forwarded to the build backend
    /// (e.g. resource-embedding fields).
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Returns the commit types classified as features.
fn default_feature_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

/// Returns the commit types classified as fixes.
fn default_fix_types() -> Vec<String> {
    vec!["fix".to_string(), "perf".to_string()]
}

/// Configuration for conventional commit classification.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_feature_types")]
    pub feature_types: Vec<String>,

    #[serde(default = "default_fix_types")]
    pub fix_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            feature_types: default_feature_types(),
            fix_types: default_fix_types(),
        }
    }
}

/// Optional lifecycle hook scripts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    #[serde(default)]
    pub pre_dispatch: Option<String>,

    #[serde(default)]
    pub pre_publish: Option<String>,

    #[serde(default)]
    pub post_publish: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project: ProjectConfig::default(),
            branches: default_branch_rules(),
            targets: Vec::new(),
            conventional_commits: ConventionalCommitsConfig::default(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration before the pipeline starts.
    ///
    /// Configuration errors are fatal and abort before the Resolving stage.
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(SemrelError::config("Project name must not be empty"));
        }

        if self.branches.is_empty() {
            return Err(SemrelError::config("At least one branch rule is required"));
        }

        for rule in &self.branches {
            rule.channel.parse::<crate::domain::Channel>()?;
            crate::domain::TagPattern::new(&rule.tag_pattern).validate()?;
        }

        // Duplicate (os, arch) pairs would produce colliding artifact names
        let mut seen = HashSet::new();
        for target in &self.targets {
            let identity = format!("{}-{}", target.os, target.arch);
            if !seen.insert(identity.clone()) {
                return Err(SemrelError::config(format!(
                    "Duplicate build target: {}",
                    identity
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semrel.toml` in current directory
/// 3. `semrel.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./semrel.toml").exists() {
        fs::read_to_string("./semrel.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("semrel.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| SemrelError::config(e.to_string()))?;
    Ok(config)
}
