use regex::Regex;

/// One commit from VCS history, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// The commit hash (shortened)
    pub id: String,
    /// The full commit message
    pub message: String,
    /// The commit author
    pub author: String,
    /// Commit time in unix seconds
    pub timestamp: i64,
}

impl CommitRecord {
    /// Create a commit record
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        CommitRecord {
            id: id.into(),
            message: message.into(),
            author: author.into(),
            timestamp,
        }
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message according to conventional commits spec
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text (never fatal)
    ///
    /// `is_breaking_change` reflects the `!` marker only; breaking-change
    /// footers are a policy-engine concern since the indicator strings are
    /// configurable.
    pub fn parse(message: &str) -> Self {
        // Try format: type(scope)!: description
        if let Some(captures) = Regex::new(r"^([a-z]+)\(([^)]+)\)(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let scope = captures.get(2).map(|m| m.as_str().to_string());
            let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope,
                description,
                is_breaking_change: has_exclamation,
            };
        }

        // Try format: type!: description
        if let Some(captures) = Regex::new(r"^([a-z]+)!:\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let description = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope: None,
                description,
                is_breaking_change: true,
            };
        }

        // Try format: type: description
        if let Some(captures) = Regex::new(r"^([a-z]+):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let description = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope: None,
                description,
                is_breaking_change: false,
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "other".to_string(),
            scope: None,
            description: message.to_string(),
            is_breaking_change: false,
        }
    }
}
