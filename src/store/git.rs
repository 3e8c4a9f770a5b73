use crate::dispatch::BuildArtifact;
use crate::domain::CommitRecord;
use crate::error::{Result, SemrelError};
use crate::store::{ReleaseRecord, ReleaseStore};
use git2::{Oid, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const CHANGELOG_FILE: &str = "CHANGELOG.md";
const RELEASE_DIR: &str = ".semrel/releases";

/// Release store backed by a local git repository
///
/// Tags and the changelog commit go through `git2`; release records are
/// persisted as TOML manifests under `.semrel/releases/` in the workdir.
pub struct GitStore {
    repo: Repository,
    workdir: PathBuf,
}

impl GitStore {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| SemrelError::store("Repository has no working directory"))?
            .to_path_buf();

        Ok(GitStore { repo, workdir })
    }

    /// Name of the currently checked-out branch
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| SemrelError::store("HEAD is not on a branch"))
    }

    fn branch_head_oid(&self, branch: &str) -> Result<Oid> {
        let branch = self
            .repo
            .find_branch(branch, git2::BranchType::Local)
            .map_err(|e| SemrelError::store(format!("Cannot find branch '{}': {}", branch, e)))?;

        branch
            .get()
            .target()
            .ok_or_else(|| SemrelError::store("Branch has no target"))
    }

    fn tag_oid(&self, tag: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference
                    .peel(git2::ObjectType::Commit)
                    .map_err(|e| SemrelError::store(format!("Cannot peel tag: {}", e)))?
                    .id();
                Ok(Some(oid))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(SemrelError::store(format!(
                "Cannot find tag '{}': {}",
                tag, e
            ))),
        }
    }

    fn release_manifest_path(&self, tag: &str) -> PathBuf {
        self.workdir.join(RELEASE_DIR).join(format!("{}.toml", tag))
    }

    fn signature(&self) -> Result<git2::Signature<'_>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => git2::Signature::now("semrel", "semrel@localhost").map_err(Into::into),
        }
    }
}

impl ReleaseStore for GitStore {
    fn history_since(&self, branch: &str, since_tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        let head_oid = self.branch_head_oid(branch)?;
        let stop_oid = match since_tag {
            Some(tag) => self.tag_oid(tag)?,
            None => None,
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head_oid)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            if Some(oid) == stop_oid {
                break;
            }

            let commit = self.repo.find_commit(oid)?;
            let message = commit.message().unwrap_or("(empty message)").to_string();
            let author = commit.author().name().unwrap_or("unknown").to_string();
            let id = oid.to_string()[..7].to_string();

            commits.push(CommitRecord::new(id, message, author, commit.time().seconds()));
        }

        commits.reverse();
        Ok(commits)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.tag_oid(tag)?.is_some())
    }

    fn create_tag(&self, branch: &str, tag: &str) -> Result<()> {
        let oid = self.branch_head_oid(branch)?;
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| SemrelError::store(format!("Cannot find object: {}", e)))?;

        self.repo
            .tag_lightweight(tag, &object, false)
            .map_err(|e| SemrelError::store(format!("Cannot create tag: {}", e)))?;

        Ok(())
    }

    fn create_release(&self, tag: &str, notes: &str) -> Result<()> {
        let path = self.release_manifest_path(tag);
        if path.exists() {
            return Err(SemrelError::store(format!(
                "Release already exists: {}",
                tag
            )));
        }

        let published_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let record = ReleaseRecord {
            tag: tag.to_string(),
            artifacts: Vec::new(),
            notes: notes.to_string(),
            published_at,
        };

        let manifest =
            toml::to_string_pretty(&record).map_err(|e| SemrelError::store(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, manifest)?;
        Ok(())
    }

    fn attach_artifacts(&self, tag: &str, artifacts: &[BuildArtifact]) -> Result<()> {
        let path = self.release_manifest_path(tag);
        let mut record = self
            .find_release(tag)?
            .ok_or_else(|| SemrelError::store(format!("No release for tag: {}", tag)))?;

        record.artifacts = artifacts.to_vec();
        let manifest =
            toml::to_string_pretty(&record).map_err(|e| SemrelError::store(e.to_string()))?;
        fs::write(&path, manifest)?;
        Ok(())
    }

    fn commit_changelog(&self, branch: &str, entry: &str) -> Result<()> {
        let changelog_path = self.workdir.join(CHANGELOG_FILE);
        let mut contents = if changelog_path.exists() {
            fs::read_to_string(&changelog_path)?
        } else {
            String::new()
        };
        contents.push_str(entry);
        fs::write(&changelog_path, contents)?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new(CHANGELOG_FILE))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_oid = self.branch_head_oid(branch)?;
        let parent = self.repo.find_commit(parent_oid)?;
        let signature = self.signature()?;

        self.repo.commit(
            Some(&format!("refs/heads/{}", branch)),
            &signature,
            &signature,
            "chore: update changelog",
            &tree,
            &[&parent],
        )?;

        Ok(())
    }

    fn find_release(&self, tag: &str) -> Result<Option<ReleaseRecord>> {
        let path = self.release_manifest_path(tag);
        if !path.exists() {
            return Ok(None);
        }

        let manifest = fs::read_to_string(&path)?;
        let record: ReleaseRecord =
            toml::from_str(&manifest).map_err(|e| SemrelError::store(e.to_string()))?;
        Ok(Some(record))
    }
}
