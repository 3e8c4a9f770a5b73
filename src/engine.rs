//! Release policy engine boundary
//!
//! Commit classification and release-notes rendering sit behind the
//! [PolicyEngine] trait so the resolver's bump-selection logic can be
//! tested without the conventional-commit parser, and so a different
//! policy engine can be swapped in.

use crate::config::ConventionalCommitsConfig;
use crate::domain::{CommitRecord, ParsedCommit, Version};

/// Release impact of a single commit, highest severity first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommitImpact {
    Breaking,
    Feature,
    Fix,
    Other,
}

impl CommitImpact {
    /// Section heading used when grouping release notes
    pub fn heading(&self) -> &'static str {
        match self {
            CommitImpact::Breaking => "Breaking Changes",
            CommitImpact::Feature => "Features",
            CommitImpact::Fix => "Fixes",
            CommitImpact::Other => "Other",
        }
    }
}

/// A commit paired with its classified release impact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub record: CommitRecord,
    pub impact: CommitImpact,
}

/// Commit classification and notes rendering capability
pub trait PolicyEngine: Send + Sync {
    /// Classify a commit message by release impact
    ///
    /// Malformed or non-conventional messages classify as
    /// [CommitImpact::Other], never fatal.
    fn classify(&self, message: &str) -> CommitImpact;

    /// Render release notes for a set of classified commits
    fn render(&self, version: &Version, commits: &[ClassifiedCommit]) -> String;
}

/// Policy engine backed by the conventional-commit taxonomy
pub struct ConventionalEngine {
    config: ConventionalCommitsConfig,
}

impl ConventionalEngine {
    /// Create an engine with the given commit-type configuration
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        ConventionalEngine { config }
    }

    fn has_breaking_footer(&self, message: &str) -> bool {
        self.config
            .breaking_change_indicators
            .iter()
            .any(|indicator| message.contains(indicator.as_str()))
    }
}

impl Default for ConventionalEngine {
    fn default() -> Self {
        ConventionalEngine::new(ConventionalCommitsConfig::default())
    }
}

impl PolicyEngine for ConventionalEngine {
    fn classify(&self, message: &str) -> CommitImpact {
        let parsed = ParsedCommit::parse(message);

        // The `!` marker is part of the commit grammar; footer indicators
        // are configuration
        if parsed.is_breaking_change || self.has_breaking_footer(message) {
            return CommitImpact::Breaking;
        }

        if self.config.feature_types.contains(&parsed.r#type) {
            CommitImpact::Feature
        } else if self.config.fix_types.contains(&parsed.r#type) {
            CommitImpact::Fix
        } else {
            CommitImpact::Other
        }
    }

    /// Notes are grouped by classification with commit order preserved
    /// inside each group; commits with no release impact are omitted.
    fn render(&self, version: &Version, commits: &[ClassifiedCommit]) -> String {
        let mut notes = format!("## {}\n", version);

        for impact in [
            CommitImpact::Breaking,
            CommitImpact::Feature,
            CommitImpact::Fix,
        ] {
            let group: Vec<&ClassifiedCommit> =
                commits.iter().filter(|c| c.impact == impact).collect();
            if group.is_empty() {
                continue;
            }

            notes.push_str(&format!("\n### {}\n\n", impact.heading()));
            for commit in group {
                notes.push_str(&format!(
                    "- {} ({})\n",
                    commit.record.summary(),
                    commit.record.id
                ));
            }
        }

        notes
    }
}
