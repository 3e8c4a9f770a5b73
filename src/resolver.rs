//! Version resolver - decides whether a release is warranted and which
//! version it gets
//!
//! The resolver only reads history; it never mutates state. Forecast vs
//! commit mode is purely about whether the caller proceeds to the
//! publisher afterwards.

use crate::domain::{Channel, CommitRecord, PreRelease, ReleaseType, Version};
use crate::engine::{ClassifiedCommit, CommitImpact, PolicyEngine};
use crate::policy::BranchPolicy;

/// Output of one resolution, consumed read-only by the dispatcher and
/// publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub would_release: bool,
    pub release_type: ReleaseType,
    pub channel: Channel,
    pub next_version: Version,
    pub git_tag: String,
    pub release_notes: String,
}

impl ResolutionResult {
    /// A resolution that warrants no release
    ///
    /// Holds the invariant that `would_release == false` implies
    /// `release_type == None` and empty tag/notes.
    fn skip(channel: Channel) -> Self {
        ResolutionResult {
            would_release: false,
            release_type: ReleaseType::None,
            channel,
            next_version: Version::new(0, 0, 0),
            git_tag: String::new(),
            release_notes: String::new(),
        }
    }
}

/// Inputs to one resolution
#[derive(Debug, Clone)]
pub struct ResolveInput<'a> {
    /// Commits since the last release on the resolved channel, oldest first
    pub history: &'a [CommitRecord],
    /// The branch the run was triggered on
    pub branch: &'a str,
    /// Last released stable version, if any
    pub last_stable: Option<&'a Version>,
    /// Last released version on the resolved channel, if any
    pub last_on_channel: Option<&'a Version>,
}

/// Computes the next version, channel and whether a release is warranted
pub struct VersionResolver<'a, E: PolicyEngine> {
    engine: &'a E,
}

impl<'a, E: PolicyEngine> VersionResolver<'a, E> {
    /// Create a resolver backed by the given policy engine
    pub fn new(engine: &'a E) -> Self {
        VersionResolver { engine }
    }

    /// Resolve the release decision for a branch and its unreleased history
    pub fn resolve(&self, input: ResolveInput<'_>, policy: &BranchPolicy) -> ResolutionResult {
        let decision = policy.resolve_channel(input.branch);

        // Unmatched branches never release; no commit scan needed
        if decision.channel == Channel::None {
            return ResolutionResult::skip(Channel::None);
        }

        if input.history.is_empty() {
            return ResolutionResult::skip(decision.channel);
        }

        let classified: Vec<ClassifiedCommit> = input
            .history
            .iter()
            .map(|record| ClassifiedCommit {
                record: record.clone(),
                impact: self.engine.classify(&record.message),
            })
            .collect();

        let release_type = aggregate_release_type(&classified);
        if release_type == ReleaseType::None {
            return ResolutionResult::skip(decision.channel);
        }

        let base = input
            .last_stable
            .map(|last| last.bump(release_type))
            .unwrap_or_else(|| Version::new(0, 1, 0));

        let next_version = match decision.channel.prerelease_label() {
            None => base,
            Some(label) => {
                // Channel-scoped counter: same base version increments it,
                // a new base version restarts it at 1
                let pre = match input.last_on_channel {
                    Some(prev) if prev.same_base(&base) => match &prev.pre {
                        Some(counter) => counter.increment(),
                        None => PreRelease::first(label),
                    },
                    _ => PreRelease::first(label),
                };
                base.with_pre(pre)
            }
        };

        let git_tag = decision.tag_pattern.format(&next_version.to_string());
        let release_notes = self.engine.render(&next_version, &classified);

        ResolutionResult {
            would_release: true,
            release_type,
            channel: decision.channel,
            next_version,
            git_tag,
            release_notes,
        }
    }
}

/// Aggregate commit impacts to the highest severity found
///
/// Severity is a total order with no ties: a single breaking commit makes
/// the bump major regardless of how many feature/fix commits coexist.
fn aggregate_release_type(commits: &[ClassifiedCommit]) -> ReleaseType {
    let mut release_type = ReleaseType::None;

    for commit in commits {
        match commit.impact {
            // Breaking is the maximum; nothing can raise it further
            CommitImpact::Breaking => return ReleaseType::Major,
            CommitImpact::Feature => release_type = ReleaseType::Minor,
            CommitImpact::Fix => {
                if release_type != ReleaseType::Minor {
                    release_type = ReleaseType::Patch;
                }
            }
            CommitImpact::Other => {}
        }
    }

    release_type
}
