use crate::dispatch::BuildArtifact;
use crate::domain::CommitRecord;
use crate::error::{Result, SemrelError};
use crate::store::{ReleaseRecord, ReleaseStore};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    history: Vec<CommitRecord>,
    tags: Vec<String>,
    releases: HashMap<String, ReleaseRecord>,
    changelog: String,
    changelog_commits: u32,
    fail_create_release: bool,
    fail_changelog: bool,
}

/// In-memory release store for testing without a repository on disk
///
/// Setup methods seed history and pre-existing tags; `fail_*` switches
/// inject failures at specific publish steps.
pub struct MockStore {
    state: Mutex<MockState>,
}

impl MockStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        MockStore {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Seed the unreleased history returned by [ReleaseStore::history_since]
    pub fn set_history(&self, commits: Vec<CommitRecord>) {
        self.state.lock().unwrap().history = commits;
    }

    /// Add a pre-existing tag
    pub fn add_tag(&self, tag: impl Into<String>) {
        self.state.lock().unwrap().tags.push(tag.into());
    }

    /// Make the next create_release call fail
    pub fn fail_create_release(&self) {
        self.state.lock().unwrap().fail_create_release = true;
    }

    /// Make changelog commits fail
    pub fn fail_changelog(&self) {
        self.state.lock().unwrap().fail_changelog = true;
    }

    /// Current changelog contents
    pub fn changelog(&self) -> String {
        self.state.lock().unwrap().changelog.clone()
    }

    /// Number of changelog commits made
    pub fn changelog_commits(&self) -> u32 {
        self.state.lock().unwrap().changelog_commits
    }

    /// Number of release records created
    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().releases.len()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseStore for MockStore {
    fn history_since(&self, _branch: &str, _since_tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        Ok(self.state.lock().unwrap().history.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().tags.clone())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().tags.iter().any(|t| t == tag))
    }

    fn create_tag(&self, _branch: &str, tag: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.tags.iter().any(|t| t == tag) {
            return Err(SemrelError::store(format!("Tag already exists: {}", tag)));
        }
        state.tags.push(tag.to_string());
        Ok(())
    }

    fn create_release(&self, tag: &str, notes: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create_release {
            return Err(SemrelError::store("simulated release creation failure"));
        }
        if state.releases.contains_key(tag) {
            return Err(SemrelError::store(format!(
                "Release already exists: {}",
                tag
            )));
        }
        state.releases.insert(
            tag.to_string(),
            ReleaseRecord {
                tag: tag.to_string(),
                artifacts: Vec::new(),
                notes: notes.to_string(),
                published_at: 0,
            },
        );
        Ok(())
    }

    fn attach_artifacts(&self, tag: &str, artifacts: &[BuildArtifact]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let release = state
            .releases
            .get_mut(tag)
            .ok_or_else(|| SemrelError::store(format!("No release for tag: {}", tag)))?;
        release.artifacts = artifacts.to_vec();
        Ok(())
    }

    fn commit_changelog(&self, _branch: &str, entry: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_changelog {
            return Err(SemrelError::store("simulated changelog commit failure"));
        }
        state.changelog.push_str(entry);
        state.changelog_commits += 1;
        Ok(())
    }

    fn find_release(&self, tag: &str) -> Result<Option<ReleaseRecord>> {
        Ok(self.state.lock().unwrap().releases.get(tag).cloned())
    }
}
