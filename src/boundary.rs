use std::fmt;

/// Warnings for non-fatal conditions met while resolving a release.
/// These are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest release tag
    NoNewCommits { latest_tag: String },
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Branch is not matched by any configured rule
    UnmatchedBranch { branch: String },
    /// A post-publish hook failed after the release was created
    HookFailed { hook: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::UnmatchedBranch { branch } => {
                write!(
                    f,
                    "Branch '{}' matches no configured rule; no release will be attempted",
                    branch
                )
            }
            BoundaryWarning::HookFailed { hook, reason } => {
                write!(f, "Hook '{}' failed: {}", hook, reason)
            }
        }
    }
}
