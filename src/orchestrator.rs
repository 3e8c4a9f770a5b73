//! Pipeline orchestrator - sequences Resolver, Dispatcher and Publisher
//!
//! Stage outputs are passed forward by value; no stage reaches back into
//! an earlier one and no stage proceeds on a failed predecessor. Nothing
//! persistent is mutated before the Publishing stage, so a run abandoned
//! earlier leaves no trace. Two concurrent runs against the same
//! (repository, channel) are not safe: the last-released-version read and
//! the tag-creation write form a check-then-act sequence that needs an
//! external run-level lock.

use crate::boundary::BoundaryWarning;
use crate::config::{Config, HooksConfig};
use crate::dispatch::{BuildBackend, BuildDispatcher, BuildTarget, DispatchOutcome};
use crate::domain::{Channel, TagPattern, Version};
use crate::engine::PolicyEngine;
use crate::error::Result;
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::policy::BranchPolicy;
use crate::publish::{PublishOutcome, ReleasePublisher};
use crate::resolver::{ResolutionResult, ResolveInput, VersionResolver};
use crate::store::{ReleaseRecord, ReleaseStore};

/// Terminal and intermediate states of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resolving,
    /// Terminal after Resolving: no release warranted, or forecast mode;
    /// the report carries the forecast only
    Skipped,
    Dispatching,
    /// Terminal: a target build failed, publish never attempted
    Failed,
    Publishing,
    /// Terminal: full success
    Done,
    /// Terminal: release exists, changelog commit pending
    DegradedDone,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Resolving => "resolving",
            RunState::Skipped => "skipped",
            RunState::Dispatching => "dispatching",
            RunState::Failed => "failed",
            RunState::Publishing => "publishing",
            RunState::Done => "done",
            RunState::DegradedDone => "degraded-done",
        };
        write!(f, "{}", name)
    }
}

/// One run request: branch plus forecast/commit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub branch: String,
    /// Forecast mode stops after resolving and mutates nothing
    pub forecast: bool,
}

/// Everything one run produced, scoped to that run and discarded after it
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: RunState,
    pub branch: String,
    pub resolution: ResolutionResult,
    pub dispatch: DispatchOutcome,
    pub release: Option<ReleaseRecord>,
    /// Reason for a degraded finish, if any
    pub degraded: Option<String>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Sequences the pipeline stages over a store, backend and policy engine
pub struct Orchestrator<'a, S, B, E>
where
    S: ReleaseStore,
    B: BuildBackend,
    E: PolicyEngine,
{
    store: &'a S,
    backend: &'a B,
    engine: &'a E,
    policy: BranchPolicy,
    targets: Vec<BuildTarget>,
    project: String,
    hooks: HooksConfig,
}

impl<'a, S, B, E> Orchestrator<'a, S, B, E>
where
    S: ReleaseStore,
    B: BuildBackend,
    E: PolicyEngine,
{
    /// Create an orchestrator from a validated configuration
    pub fn new(config: &Config, store: &'a S, backend: &'a B, engine: &'a E) -> Result<Self> {
        Ok(Orchestrator {
            store,
            backend,
            engine,
            policy: BranchPolicy::from_config(&config.branches)?,
            targets: BuildTarget::from_config(&config.targets),
            project: config.project.name.clone(),
            hooks: config.hooks.clone(),
        })
    }

    /// Run the pipeline for one request
    pub fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let mut warnings = Vec::new();

        // Resolving
        let decision = self.policy.resolve_channel(&request.branch);
        let resolution = if decision.channel == Channel::None {
            warnings.push(BoundaryWarning::UnmatchedBranch {
                branch: request.branch.clone(),
            });
            VersionResolver::new(self.engine).resolve(
                ResolveInput {
                    history: &[],
                    branch: &request.branch,
                    last_stable: None,
                    last_on_channel: None,
                },
                &self.policy,
            )
        } else {
            let tags = self.store.list_tags()?;
            let released = ReleasedVersions::scan(
                &tags,
                &decision.tag_pattern,
                decision.channel,
                &mut warnings,
            );

            let history = self
                .store
                .history_since(&request.branch, released.channel_tag())?;

            if history.is_empty() {
                if let Some(tag) = released.channel_tag() {
                    warnings.push(BoundaryWarning::NoNewCommits {
                        latest_tag: tag.to_string(),
                    });
                }
            }

            VersionResolver::new(self.engine).resolve(
                ResolveInput {
                    history: &history,
                    branch: &request.branch,
                    last_stable: released.stable(),
                    last_on_channel: released.on_channel(),
                },
                &self.policy,
            )
        };

        if !resolution.would_release || request.forecast {
            return Ok(RunReport {
                state: RunState::Skipped,
                branch: request.branch.clone(),
                resolution,
                dispatch: DispatchOutcome::default(),
                release: None,
                degraded: None,
                warnings,
            });
        }

        // Dispatching
        self.run_hook(HookType::PreDispatch, request, &resolution, None)?;
        let dispatcher = BuildDispatcher::new(&self.project, self.backend);
        let dispatch = dispatcher.dispatch(&resolution, &self.targets);

        if !dispatch.succeeded() {
            // Successful artifacts are retained for diagnostics, but the
            // publisher stage is never reached
            return Ok(RunReport {
                state: RunState::Failed,
                branch: request.branch.clone(),
                resolution,
                dispatch,
                release: None,
                degraded: None,
                warnings,
            });
        }

        // Publishing
        self.run_hook(
            HookType::PrePublish,
            request,
            &resolution,
            Some(dispatch.artifacts.len()),
        )?;
        let publisher = ReleasePublisher::new(self.store);
        let outcome = publisher.publish(&request.branch, &resolution, &dispatch.artifacts)?;

        if let Some(script) = self.hooks.post_publish.clone() {
            let context = self.hook_context(
                HookType::PostPublish,
                request,
                &resolution,
                Some(dispatch.artifacts.len()),
            );
            // The release already exists; a post-hook failure is a warning
            if let Err(e) = HookExecutor::execute(&script, &context) {
                warnings.push(BoundaryWarning::HookFailed {
                    hook: HookType::PostPublish.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        let (state, release, degraded) = match outcome {
            PublishOutcome::Published(record) => (RunState::Done, record, None),
            PublishOutcome::Degraded { record, pending } => {
                (RunState::DegradedDone, record, Some(pending))
            }
        };

        Ok(RunReport {
            state,
            branch: request.branch.clone(),
            resolution,
            dispatch,
            release: Some(release),
            degraded,
            warnings,
        })
    }

    fn run_hook(
        &self,
        hook_type: HookType,
        request: &RunRequest,
        resolution: &ResolutionResult,
        artifact_count: Option<usize>,
    ) -> Result<()> {
        let script = match hook_type {
            HookType::PreDispatch => &self.hooks.pre_dispatch,
            HookType::PrePublish => &self.hooks.pre_publish,
            HookType::PostPublish => &self.hooks.post_publish,
        };

        if let Some(script) = script {
            let context = self.hook_context(hook_type, request, resolution, artifact_count);
            HookExecutor::execute(script, &context)?;
        }
        Ok(())
    }

    fn hook_context(
        &self,
        hook_type: HookType,
        request: &RunRequest,
        resolution: &ResolutionResult,
        artifact_count: Option<usize>,
    ) -> HookContext {
        HookContext {
            hook_type,
            branch: request.branch.clone(),
            tag: resolution.git_tag.clone(),
            version: resolution.next_version.to_string(),
            channel: resolution.channel.to_string(),
            release_type: resolution.release_type.to_string(),
            artifact_count,
        }
    }
}

/// Last released versions found in the store's tags
struct ReleasedVersions {
    stable: Option<(Version, String)>,
    on_channel: Option<(Version, String)>,
}

impl ReleasedVersions {
    /// Scan tags matching the channel's tag pattern
    ///
    /// Tags matching the pattern but carrying an unparsable version are
    /// reported as warnings and skipped, so resolution restarts from the
    /// initial version rather than failing the run.
    fn scan(
        tags: &[String],
        pattern: &TagPattern,
        channel: Channel,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Self {
        let mut stable: Option<(Version, String)> = None;
        let mut on_channel: Option<(Version, String)> = None;

        for tag in tags {
            let Some(version_part) = pattern.extract(tag) else {
                continue;
            };

            let version = match Version::parse(&version_part) {
                Ok(version) => version,
                Err(e) => {
                    warnings.push(BoundaryWarning::UnparsableTag {
                        tag: tag.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if version.pre.is_none() {
                replace_if_newer(&mut stable, version.clone(), tag);
            }

            let belongs_to_channel = match channel.prerelease_label() {
                None => version.pre.is_none(),
                Some(label) => version.pre.as_ref().is_some_and(|p| p.label == label),
            };
            if belongs_to_channel {
                replace_if_newer(&mut on_channel, version, tag);
            }
        }

        ReleasedVersions { stable, on_channel }
    }

    fn stable(&self) -> Option<&Version> {
        self.stable.as_ref().map(|(v, _)| v)
    }

    fn on_channel(&self) -> Option<&Version> {
        self.on_channel.as_ref().map(|(v, _)| v)
    }

    /// Tag of the channel's last release, the boundary for history scans
    fn channel_tag(&self) -> Option<&str> {
        self.on_channel.as_ref().map(|(_, t)| t.as_str())
    }
}

fn replace_if_newer(slot: &mut Option<(Version, String)>, version: Version, tag: &str) {
    let newer = match slot {
        None => true,
        Some((current, _)) => {
            let base = version.base_cmp(current);
            if base != std::cmp::Ordering::Equal {
                base == std::cmp::Ordering::Greater
            } else {
                let current_iter = current.pre.as_ref().map(|p| p.iteration).unwrap_or(0);
                let new_iter = version.pre.as_ref().map(|p| p.iteration).unwrap_or(0);
                new_iter > current_iter
            }
        }
    };

    if newer {
        *slot = Some((version, tag.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatch::BuildArtifact;
    use crate::engine::ConventionalEngine;
    use crate::error::SemrelError;
    use crate::store::MockStore;

    struct FakeBackend {
        fail_targets: Vec<String>,
    }

    impl BuildBackend for FakeBackend {
        fn build(&self, target: &BuildTarget, version: &Version) -> Result<Vec<u8>> {
            if self.fail_targets.contains(&target.identity()) {
                return Err(SemrelError::build(target.identity(), "boom"));
            }
            Ok(format!("bin-{}", version).into_bytes())
        }
    }

    fn config_with_targets() -> Config {
        let toml_str = r#"
            [project]
            name = "app"

            [[targets]]
            os = "linux"
            arch = "x86_64"
            ext = "tar.gz"

            [[targets]]
            os = "macos"
            arch = "aarch64"
            ext = "tar.gz"

            [[targets]]
            os = "windows"
            arch = "x86_64"
            ext = "zip"
        "#;
        toml::from_str(toml_str).unwrap()
    }

    fn seeded_store(messages: &[&str], tags: &[&str]) -> MockStore {
        let store = MockStore::new();
        store.set_history(
            messages
                .iter()
                .enumerate()
                .map(|(i, m)| crate::domain::CommitRecord::new(format!("c{:04}", i), *m, "dev", i as i64))
                .collect(),
        );
        for tag in tags {
            store.add_tag(*tag);
        }
        store
    }

    fn run(
        store: &MockStore,
        backend: &FakeBackend,
        branch: &str,
        forecast: bool,
    ) -> Result<RunReport> {
        let engine = ConventionalEngine::default();
        let config = config_with_targets();
        let orchestrator = Orchestrator::new(&config, store, backend, &engine).unwrap();
        orchestrator.run(&RunRequest {
            branch: branch.to_string(),
            forecast,
        })
    }

    #[test]
    fn test_full_pipeline_done() {
        let store = seeded_store(&["fix: x", "feat: y"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        assert_eq!(report.state, RunState::Done);
        assert_eq!(report.resolution.next_version, Version::new(1, 3, 0));
        assert_eq!(report.dispatch.artifacts.len(), 3);

        let release = report.release.unwrap();
        assert_eq!(release.tag, "v1.3.0");
        assert_eq!(release.artifacts.len(), 3);
        assert_eq!(store.changelog_commits(), 1);
    }

    #[test]
    fn test_skipped_when_no_release_warranted() {
        let store = seeded_store(&["docs: update"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        assert_eq!(report.state, RunState::Skipped);
        assert!(!report.resolution.would_release);
        assert!(report.dispatch.artifacts.is_empty());
        assert_eq!(store.release_count(), 0);
    }

    #[test]
    fn test_forecast_mutates_nothing() {
        let store = seeded_store(&["feat: y"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", true).unwrap();
        assert_eq!(report.state, RunState::Skipped);
        assert!(report.resolution.would_release);
        assert_eq!(report.resolution.next_version, Version::new(1, 3, 0));
        assert_eq!(store.release_count(), 0);
        assert_eq!(store.changelog_commits(), 0);
        assert!(!store.tag_exists("v1.3.0").unwrap());
    }

    #[test]
    fn test_target_failure_skips_publisher() {
        let store = seeded_store(&["feat: y"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec!["macos-aarch64".to_string()],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        assert_eq!(report.state, RunState::Failed);
        assert_eq!(report.dispatch.artifacts.len(), 2);
        assert_eq!(report.dispatch.failures.len(), 1);
        assert!(report.release.is_none());
        assert_eq!(store.release_count(), 0, "publisher never invoked");
        assert!(!store.tag_exists("v1.3.0").unwrap());
    }

    #[test]
    fn test_degraded_done_on_changelog_failure() {
        let store = seeded_store(&["feat: y"], &["v1.2.0"]);
        store.fail_changelog();
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        assert_eq!(report.state, RunState::DegradedDone);
        assert!(report.degraded.is_some());
        // Release exists and is queryable
        assert!(store.find_release("v1.3.0").unwrap().is_some());
    }

    #[test]
    fn test_unmatched_branch_is_skipped_with_warning() {
        let store = seeded_store(&["feat!: z"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "feature/x", false).unwrap();
        assert_eq!(report.state, RunState::Skipped);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::UnmatchedBranch { .. })));
    }

    #[test]
    fn test_rerun_after_done_is_conflict() {
        let store = seeded_store(&["feat: y"], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let first = run(&store, &backend, "main", false).unwrap();
        assert_eq!(first.state, RunState::Done);

        // The mock history is static, so a rerun recomputes the same
        // resolution and must hit the idempotence gate
        let store2 = seeded_store(&["feat: y"], &["v1.2.0", "v1.3.0"]);
        let err = run(&store2, &backend, "main", false).unwrap_err();
        assert!(err.is_publish_conflict());
    }

    #[test]
    fn test_released_versions_scan() {
        let mut warnings = Vec::new();
        let tags = vec![
            "v1.0.0".to_string(),
            "v1.2.0".to_string(),
            "v1.3.0-rc.1".to_string(),
            "v1.3.0-rc.2".to_string(),
            "unrelated-tag".to_string(),
        ];

        let released = ReleasedVersions::scan(
            &tags,
            &TagPattern::default(),
            Channel::Rc,
            &mut warnings,
        );

        assert_eq!(released.stable().unwrap(), &Version::new(1, 2, 0));
        assert_eq!(
            released.on_channel().unwrap().to_string(),
            "1.3.0-rc.2"
        );
        assert_eq!(released.channel_tag(), Some("v1.3.0-rc.2"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_released_versions_scan_warns_on_unparsable() {
        let mut warnings = Vec::new();
        // Matches the tag pattern but the pre-release part is not a valid
        // channel counter
        let tags = vec!["v1.0.0".to_string(), "v1.2.3-rc.x".to_string()];

        let released = ReleasedVersions::scan(
            &tags,
            &TagPattern::default(),
            Channel::Stable,
            &mut warnings,
        );

        assert_eq!(released.stable().unwrap(), &Version::new(1, 0, 0));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            BoundaryWarning::UnparsableTag { .. }
        ));
    }

    #[test]
    fn test_no_new_commits_warning() {
        let store = seeded_store(&[], &["v1.2.0"]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        assert_eq!(report.state, RunState::Skipped);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::NoNewCommits { .. })));
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Done.to_string(), "done");
        assert_eq!(RunState::DegradedDone.to_string(), "degraded-done");
    }

    #[test]
    fn test_release_artifacts_ordered_by_target_declaration() {
        let store = seeded_store(&["feat: y"], &[]);
        let backend = FakeBackend {
            fail_targets: vec![],
        };

        let report = run(&store, &backend, "main", false).unwrap();
        let targets: Vec<&str> = report
            .release
            .as_ref()
            .unwrap()
            .artifacts
            .iter()
            .map(|a: &BuildArtifact| a.target.as_str())
            .collect();
        assert_eq!(targets, vec!["linux-x86_64", "macos-aarch64", "windows-x86_64"]);
    }
}
