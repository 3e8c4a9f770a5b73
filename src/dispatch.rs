//! Build dispatcher - fans out independent platform builds
//!
//! Each target is an independent unit of work with no shared mutable
//! state, so targets run in parallel. One target's failure does not abort
//! its siblings; the dispatcher collects successful artifacts alongside
//! per-target failures, and any failure marks the overall dispatch as
//! failed so the publisher stage is skipped.

use crate::config::TargetConfig;
use crate::domain::Version;
use crate::error::{Result, SemrelError};
use crate::resolver::ResolutionResult;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::process::Command;

/// One (platform, architecture) pair plus target-specific options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub os: String,
    pub arch: String,
    pub ext: String,
    /// Shell command the command backend runs for this target
    pub command: Option<String>,
    /// Target-specific metadata forwarded to the build backend
    pub options: HashMap<String, String>,
}

impl BuildTarget {
    /// Stable identity used in artifact names and failure reports
    pub fn identity(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// Build targets from configuration
    pub fn from_config(targets: &[TargetConfig]) -> Vec<BuildTarget> {
        targets
            .iter()
            .map(|t| BuildTarget {
                os: t.os.clone(),
                arch: t.arch.clone(),
                ext: t.ext.clone(),
                command: t.command.clone(),
                options: t.options.clone(),
            })
            .collect()
    }
}

/// Output of one target build, immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildArtifact {
    /// Deterministic artifact name: {name}-{version}-{os}-{arch}.{ext}
    pub file_name: String,
    /// Co-located checksum file name ({file_name}.sha256)
    pub checksum_file_name: String,
    /// SHA-256 digest of the artifact contents, hex encoded
    pub checksum: String,
    /// Identity of the target that produced the artifact
    pub target: String,
    /// Artifact size in bytes
    pub size: u64,
}

/// One failed target, retained for diagnostics while siblings continue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    pub target: String,
    pub reason: String,
}

/// Collected result of one dispatch
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Artifacts in target declaration order
    pub artifacts: Vec<BuildArtifact>,
    pub failures: Vec<TargetFailure>,
}

impl DispatchOutcome {
    /// True when every target built successfully
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Opaque build backend invoked once per target
///
/// Could be a compiler toolchain, a container build or a packaging step;
/// the dispatcher only injects the resolved version and target options and
/// takes the produced bytes back.
pub trait BuildBackend: Send + Sync {
    /// Build one target at the given version, returning the artifact bytes
    fn build(&self, target: &BuildTarget, version: &Version) -> Result<Vec<u8>>;
}

/// Fans out builds and collects artifacts
pub struct BuildDispatcher<'a, B: BuildBackend> {
    backend: &'a B,
    project: &'a str,
}

impl<'a, B: BuildBackend> BuildDispatcher<'a, B> {
    /// Create a dispatcher for a project name and backend
    pub fn new(project: &'a str, backend: &'a B) -> Self {
        BuildDispatcher { backend, project }
    }

    /// Build all targets for a resolution
    ///
    /// No-op returning an empty outcome when the resolution warrants no
    /// release. Targets run in parallel; the outcome is only returned once
    /// every target is terminal.
    pub fn dispatch(
        &self,
        resolution: &ResolutionResult,
        targets: &[BuildTarget],
    ) -> DispatchOutcome {
        if !resolution.would_release {
            return DispatchOutcome::default();
        }

        let version = &resolution.next_version;

        let results: Vec<std::result::Result<BuildArtifact, TargetFailure>> = targets
            .par_iter()
            .map(|target| {
                self.backend
                    .build(target, version)
                    .map(|bytes| self.artifact_for(target, version, &bytes))
                    .map_err(|e| TargetFailure {
                        target: target.identity(),
                        reason: e.to_string(),
                    })
            })
            .collect();

        let mut outcome = DispatchOutcome::default();
        for result in results {
            match result {
                Ok(artifact) => outcome.artifacts.push(artifact),
                Err(failure) => outcome.failures.push(failure),
            }
        }
        outcome
    }

    fn artifact_for(&self, target: &BuildTarget, version: &Version, bytes: &[u8]) -> BuildArtifact {
        let file_name = artifact_file_name(self.project, version, target);
        let checksum = hex_digest(bytes);

        BuildArtifact {
            checksum_file_name: format!("{}.sha256", file_name),
            file_name,
            checksum,
            target: target.identity(),
            size: bytes.len() as u64,
        }
    }
}

/// Deterministic, collision-free artifact name for a target
pub fn artifact_file_name(project: &str, version: &Version, target: &BuildTarget) -> String {
    let base = format!("{}-{}-{}-{}", project, version, target.os, target.arch);
    if target.ext.is_empty() {
        base
    } else {
        format!("{}.{}", base, target.ext)
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Build backend that shells out to a per-target build command
///
/// The command receives the resolved version and target identity through
/// SEMREL_* environment variables and must write the artifact to the path
/// given in SEMREL_OUTPUT.
pub struct CommandBackend {
    output_dir: std::path::PathBuf,
}

impl CommandBackend {
    /// Create a backend writing artifacts below the given directory
    pub fn new(output_dir: impl Into<std::path::PathBuf>) -> Self {
        CommandBackend {
            output_dir: output_dir.into(),
        }
    }
}

impl BuildBackend for CommandBackend {
    fn build(&self, target: &BuildTarget, version: &Version) -> Result<Vec<u8>> {
        let command = target.command.as_deref().ok_or_else(|| {
            SemrelError::build(target.identity(), "No build command configured for target")
        })?;

        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self
            .output_dir
            .join(format!("{}-{}.out", target.identity(), version));

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .env("SEMREL_VERSION", version.to_string())
            .env("SEMREL_TARGET_OS", &target.os)
            .env("SEMREL_TARGET_ARCH", &target.arch)
            .env("SEMREL_OUTPUT", &output_path);

        for (key, value) in &target.options {
            cmd.env(format!("SEMREL_OPT_{}", key.to_uppercase()), value);
        }

        let output = cmd
            .output()
            .map_err(|e| SemrelError::build(target.identity(), e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SemrelError::build(
                target.identity(),
                format!(
                    "Build command exited with {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        std::fs::read(&output_path).map_err(|e| {
            SemrelError::build(
                target.identity(),
                format!("Build command produced no artifact: {}", e),
            )
        })
    }
}
