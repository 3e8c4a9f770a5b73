//! Release store abstraction layer
//!
//! This module provides a trait-based abstraction over the persistent
//! side effects of a release: tag creation, release records, artifact
//! attachment and the changelog commit. The concrete implementations
//! include:
//!
//! - [git::GitStore]: a real implementation backed by the `git2` crate
//! - [mock::MockStore]: an in-memory implementation for testing
//!
//! Pipeline code depends on the [ReleaseStore] trait rather than a
//! concrete implementation, so the publisher and orchestrator can be
//! exercised without a repository on disk.

pub mod git;
pub mod mock;

pub use git::GitStore;
pub use mock::MockStore;

use crate::dispatch::BuildArtifact;
use crate::domain::CommitRecord;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Persisted output of one publish, never updated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub tag: String,
    /// Attached artifacts in dispatch order
    pub artifacts: Vec<BuildArtifact>,
    pub notes: String,
    /// Publication time in unix seconds
    pub published_at: i64,
}

/// Persistent VCS/release side effects behind the pipeline
///
/// The store is the only owner of persistent shared state (tags, release
/// records, the changelog); nothing else in the pipeline mutates anything
/// that outlives a run. It is used from the orchestrator's single thread
/// of control; only the build backend crosses threads.
pub trait ReleaseStore {
    /// Commits on a branch since a tag, oldest first
    ///
    /// `since_tag = None` returns the branch's full history. The tag commit
    /// itself is excluded.
    fn history_since(&self, branch: &str, since_tag: Option<&str>) -> Result<Vec<CommitRecord>>;

    /// All tag names in the store
    fn list_tags(&self) -> Result<Vec<String>>;

    /// True when a tag with this name already exists
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// Create a tag at the head of a branch
    fn create_tag(&self, branch: &str, tag: &str) -> Result<()>;

    /// Create a release record for an existing tag with the notes as body
    fn create_release(&self, tag: &str, notes: &str) -> Result<()>;

    /// Attach artifacts to an existing release record
    fn attach_artifacts(&self, tag: &str, artifacts: &[BuildArtifact]) -> Result<()>;

    /// Append an entry to the changelog document and commit it back to the
    /// source branch
    fn commit_changelog(&self, branch: &str, entry: &str) -> Result<()>;

    /// Look up a release record by tag
    fn find_release(&self, tag: &str) -> Result<Option<ReleaseRecord>>;
}
