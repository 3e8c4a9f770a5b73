//! Pre-release counter handling for channel-scoped versions
//!
//! A pre-release suffix like "rc.2" carries the channel label and an
//! iteration number that counts independently of the stable version line.

use crate::error::{Result, SemrelError};
use std::fmt;
use std::str::FromStr;

/// Channel-scoped pre-release suffix ("rc.1", "beta.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// The channel label (e.g. "rc", "beta")
    pub label: String,
    /// Iteration number within the current base version
    pub iteration: u32,
}

impl PreRelease {
    /// Create the first pre-release iteration for a label
    pub fn first(label: impl Into<String>) -> Self {
        PreRelease {
            label: label.into(),
            iteration: 1,
        }
    }

    /// Parse a pre-release suffix from a string
    ///
    /// Accepts "rc.2" style, or a bare label ("rc") which is treated as
    /// iteration 1.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Next iteration on the same base version
    pub fn increment(&self) -> Self {
        PreRelease {
            label: self.label.clone(),
            iteration: self.iteration + 1,
        }
    }
}

impl FromStr for PreRelease {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SemrelError::version("Empty pre-release identifier"));
        }

        let (label, iteration) = match s.split_once('.') {
            Some((label, number)) => {
                let iteration = number.parse::<u32>().map_err(|_| {
                    SemrelError::version(format!("Invalid pre-release iteration: '{}'", number))
                })?;
                (label, iteration)
            }
            None => (s, 1),
        };

        if label.is_empty() || !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(SemrelError::version(format!(
                "Invalid pre-release label: '{}'",
                label
            )));
        }

        Ok(PreRelease {
            label: label.to_string(),
            iteration,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_iteration() {
        let pr = PreRelease::parse("rc.2").unwrap();
        assert_eq!(pr.label, "rc");
        assert_eq!(pr.iteration, 2);
    }

    #[test]
    fn test_parse_bare_label() {
        let pr = PreRelease::parse("beta").unwrap();
        assert_eq!(pr.label, "beta");
        assert_eq!(pr.iteration, 1);
    }

    #[test]
    fn test_parse_empty() {
        assert!(PreRelease::parse("").is_err());
    }

    #[test]
    fn test_parse_invalid_iteration() {
        assert!(PreRelease::parse("rc.abc").is_err());
    }

    #[test]
    fn test_parse_invalid_label() {
        assert!(PreRelease::parse("rc!.1").is_err());
        assert!(PreRelease::parse(".1").is_err());
    }

    #[test]
    fn test_first() {
        let pr = PreRelease::first("rc");
        assert_eq!(pr.to_string(), "rc.1");
    }

    #[test]
    fn test_increment() {
        let pr = PreRelease::parse("rc.1").unwrap();
        assert_eq!(pr.increment().to_string(), "rc.2");
    }

    #[test]
    fn test_increment_high_number() {
        let pr = PreRelease::parse("beta.99").unwrap();
        assert_eq!(pr.increment().iteration, 100);
    }

    #[test]
    fn test_display() {
        let pr = PreRelease::parse("beta.3").unwrap();
        assert_eq!(pr.to_string(), "beta.3");
    }
}
