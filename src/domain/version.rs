use crate::domain::prerelease::PreRelease;
use crate::error::{Result, SemrelError};
use std::fmt;

/// Semantic version representation with optional pre-release suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre: Option<PreRelease>,
}

impl Version {
    /// Create a new stable version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Attach a pre-release suffix to this version
    pub fn with_pre(mut self, pre: PreRelease) -> Self {
        self.pre = Some(pre);
        self
    }

    /// Parse a version from a string (e.g. "v1.2.3", "1.2.3-rc.1")
    pub fn parse(s: &str) -> Result<Self> {
        let clean = s.trim_start_matches('v').trim_start_matches('V');

        let (base, pre) = match clean.split_once('-') {
            Some((base, suffix)) => (base, Some(PreRelease::parse(suffix)?)),
            None => (clean, None),
        };

        let parts: Vec<&str> = base.split('.').collect();
        if parts.len() != 3 {
            return Err(SemrelError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                s
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| SemrelError::version(format!("Invalid major version: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| SemrelError::version(format!("Invalid minor version: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| SemrelError::version(format!("Invalid patch version: {}", parts[2])))?;

        Ok(Version {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Bump the base version according to the release type
    ///
    /// The pre-release suffix is dropped; the caller re-attaches a channel
    /// counter when releasing on a pre-release channel.
    pub fn bump(&self, release_type: ReleaseType) -> Self {
        match release_type {
            ReleaseType::Major => Version::new(self.major + 1, 0, 0),
            ReleaseType::Minor => Version::new(self.major, self.minor + 1, 0),
            ReleaseType::Patch => Version::new(self.major, self.minor, self.patch + 1),
            ReleaseType::None => Version::new(self.major, self.minor, self.patch),
        }
    }

    /// True when two versions share the same major.minor.patch base
    pub fn same_base(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    /// Base version ordering, ignoring the pre-release suffix
    pub fn base_cmp(&self, other: &Version) -> std::cmp::Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Release impact decided from the commit history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    None,
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
            ReleaseType::None => write!(f, "none"),
        }
    }
}
