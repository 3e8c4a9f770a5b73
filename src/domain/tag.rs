use crate::error::{Result, SemrelError};

/// Tag naming pattern (e.g. "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Pattern must contain the {version} placeholder to be usable
    pub fn validate(&self) -> Result<()> {
        if !self.pattern.contains("{version}") {
            return Err(SemrelError::config(format!(
                "Tag pattern '{}' must contain the {{version}} placeholder",
                self.pattern
            )));
        }
        Ok(())
    }

    /// Format a version according to the pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace("{version}", version)
    }

    /// Extract the version part from a tag matching this pattern
    ///
    /// Returns None when the tag does not match. The version part may carry
    /// a pre-release suffix ("1.3.0-rc.1").
    pub fn extract(&self, tag: &str) -> Option<String> {
        let escaped = regex::escape(&self.pattern);
        let regex_pattern = escaped.replace(
            r"\{version\}",
            r"(\d+\.\d+\.\d+(?:-[0-9A-Za-z][0-9A-Za-z.-]*)?)",
        );

        let re = regex::Regex::new(&format!("^{}$", regex_pattern)).ok()?;
        re.captures(tag)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern::new("v{version}")
    }
}
