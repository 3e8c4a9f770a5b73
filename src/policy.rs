//! Branch strategy policy - maps branch names to release channels
//!
//! Rules are evaluated in their declared order and the first match wins.
//! A branch matched by no rule gets [Channel::None]: no release is ever
//! attempted on it. The ordering is part of the contract, since silent
//! precedence changes are the principal failure mode of branch-aware
//! versioning.

use crate::config::BranchRuleConfig;
use crate::domain::{Channel, TagPattern};
use crate::error::Result;

/// One branch-name pattern mapped to a channel and tag format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRule {
    pub pattern: String,
    pub channel: Channel,
    pub tag_pattern: TagPattern,
}

impl BranchRule {
    /// True when the branch name matches this rule's pattern
    ///
    /// Patterns are exact names, or globs where `*` matches any run of
    /// characters ("release/*" matches "release/1.x").
    pub fn matches(&self, branch: &str) -> bool {
        if !self.pattern.contains('*') {
            return self.pattern == branch;
        }

        let escaped = regex::escape(&self.pattern).replace(r"\*", ".*");
        match regex::Regex::new(&format!("^{}$", escaped)) {
            Ok(re) => re.is_match(branch),
            Err(_) => false,
        }
    }
}

/// Channel resolution for one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDecision {
    pub channel: Channel,
    pub tag_pattern: TagPattern,
}

impl ChannelDecision {
    /// Decision for an unmatched branch: never release
    pub fn none() -> Self {
        ChannelDecision {
            channel: Channel::None,
            tag_pattern: TagPattern::default(),
        }
    }
}

/// Ordered branch rules, loaded once per run and never mutated during it
#[derive(Debug, Clone)]
pub struct BranchPolicy {
    rules: Vec<BranchRule>,
}

impl BranchPolicy {
    /// Build a policy from an ordered rule list
    pub fn new(rules: Vec<BranchRule>) -> Self {
        BranchPolicy { rules }
    }

    /// Build a policy from configuration, preserving declaration order
    pub fn from_config(rules: &[BranchRuleConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(BranchRule {
                    pattern: rule.pattern.clone(),
                    channel: rule.channel.parse()?,
                    tag_pattern: TagPattern::new(&rule.tag_pattern),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BranchPolicy { rules })
    }

    /// Resolve the release channel for a branch name
    ///
    /// Pure function: evaluates rules in declared order, first match wins;
    /// no match yields [Channel::None].
    pub fn resolve_channel(&self, branch: &str) -> ChannelDecision {
        for rule in &self.rules {
            if rule.matches(branch) {
                return ChannelDecision {
                    channel: rule.channel,
                    tag_pattern: rule.tag_pattern.clone(),
                };
            }
        }
        ChannelDecision::none()
    }

    /// The configured rules in declaration order
    pub fn rules(&self) -> &[BranchRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, channel: Channel) -> BranchRule {
        BranchRule {
            pattern: pattern.to_string(),
            channel,
            tag_pattern: TagPattern::default(),
        }
    }

    #[test]
    fn test_exact_match() {
        let policy = BranchPolicy::new(vec![rule("main", Channel::Stable)]);
        assert_eq!(policy.resolve_channel("main").channel, Channel::Stable);
    }

    #[test]
    fn test_no_match_yields_none() {
        let policy = BranchPolicy::new(vec![rule("main", Channel::Stable)]);
        assert_eq!(
            policy.resolve_channel("feature/login").channel,
            Channel::None
        );
    }

    #[test]
    fn test_glob_match() {
        let policy = BranchPolicy::new(vec![rule("release/*", Channel::Rc)]);
        assert_eq!(policy.resolve_channel("release/1.x").channel, Channel::Rc);
        assert_eq!(policy.resolve_channel("release").channel, Channel::None);
    }

    #[test]
    fn test_glob_does_not_match_as_substring() {
        let policy = BranchPolicy::new(vec![rule("release/*", Channel::Rc)]);
        assert_eq!(
            policy.resolve_channel("my-release/1.x").channel,
            Channel::None
        );
    }

    #[test]
    fn test_first_declared_rule_wins() {
        // "release/next" matches both rules; the first declared one applies
        let policy = BranchPolicy::new(vec![
            rule("release/next", Channel::Beta),
            rule("release/*", Channel::Rc),
        ]);
        assert_eq!(policy.resolve_channel("release/next").channel, Channel::Beta);
        assert_eq!(policy.resolve_channel("release/1.x").channel, Channel::Rc);
    }

    #[test]
    fn test_first_declared_rule_wins_reversed_order() {
        let policy = BranchPolicy::new(vec![
            rule("release/*", Channel::Rc),
            rule("release/next", Channel::Beta),
        ]);
        assert_eq!(policy.resolve_channel("release/next").channel, Channel::Rc);
    }

    #[test]
    fn test_same_input_same_output() {
        let policy = BranchPolicy::new(vec![
            rule("main", Channel::Stable),
            rule("release/*", Channel::Rc),
        ]);
        let first = policy.resolve_channel("release/2.x");
        let second = policy.resolve_channel("release/2.x");
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_config_rejects_unknown_channel() {
        let rules = vec![crate::config::BranchRuleConfig {
            pattern: "main".to_string(),
            channel: "canary".to_string(),
            tag_pattern: "v{version}".to_string(),
        }];
        assert!(BranchPolicy::from_config(&rules).is_err());
    }
}
