//! Release publisher - turns a resolution plus artifacts into a persisted
//! release
//!
//! Publish runs four steps in order: create the tag, create the release
//! record, attach artifacts, commit the changelog entry back to the source
//! branch. A tag that already exists is a conflict, not a retry: re-running
//! the first three steps would duplicate the release. A failure at the
//! changelog step after the first three succeeded is a degraded success,
//! never retried automatically.

use crate::dispatch::BuildArtifact;
use crate::error::{Result, SemrelError};
use crate::resolver::ResolutionResult;
use crate::store::{ReleaseRecord, ReleaseStore};

/// Result of a publish attempt that created a release
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// All four steps succeeded
    Published(ReleaseRecord),
    /// Tag, release and artifacts exist but the changelog commit failed;
    /// the pending entry must be committed manually
    Degraded {
        record: ReleaseRecord,
        pending: String,
    },
}

impl PublishOutcome {
    /// The release record, present in both outcomes
    pub fn record(&self) -> &ReleaseRecord {
        match self {
            PublishOutcome::Published(record) => record,
            PublishOutcome::Degraded { record, .. } => record,
        }
    }

    /// True when the changelog commit is still pending
    pub fn is_degraded(&self) -> bool {
        matches!(self, PublishOutcome::Degraded { .. })
    }
}

/// Creates tags, release records and the changelog commit through a store
pub struct ReleasePublisher<'a, S: ReleaseStore> {
    store: &'a S,
}

impl<'a, S: ReleaseStore> ReleasePublisher<'a, S> {
    /// Create a publisher over the given store
    pub fn new(store: &'a S) -> Self {
        ReleasePublisher { store }
    }

    /// Publish a resolved release with its collected artifacts
    ///
    /// Only valid when the resolution warrants a release and the dispatch
    /// succeeded; callers enforce that gate.
    pub fn publish(
        &self,
        branch: &str,
        resolution: &ResolutionResult,
        artifacts: &[BuildArtifact],
    ) -> Result<PublishOutcome> {
        let tag = &resolution.git_tag;

        // Idempotence gate: an existing tag means this release already
        // happened (or partially happened); never create a duplicate
        if self.store.tag_exists(tag)? {
            return Err(SemrelError::PublishConflict { tag: tag.clone() });
        }

        // Steps 1-3: nothing before the tag exists needs cleanup on failure
        self.store.create_tag(branch, tag)?;
        self.store.create_release(tag, &resolution.release_notes)?;
        self.store.attach_artifacts(tag, artifacts)?;

        let record = self
            .store
            .find_release(tag)?
            .ok_or_else(|| SemrelError::store(format!("Release vanished after create: {}", tag)))?;

        // Step 4: the release already exists at this point, so a changelog
        // failure downgrades to a degraded success instead of failing
        let entry = changelog_entry(tag, &resolution.release_notes);
        match self.store.commit_changelog(branch, &entry) {
            Ok(()) => Ok(PublishOutcome::Published(record)),
            Err(e) => Ok(PublishOutcome::Degraded {
                record,
                pending: format!("changelog commit failed: {}", e),
            }),
        }
    }
}

/// Changelog entry appended for one release
pub fn changelog_entry(tag: &str, notes: &str) -> String {
    format!("\n<!-- {} -->\n{}\n", tag, notes)
}
