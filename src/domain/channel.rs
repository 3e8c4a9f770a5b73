use crate::error::{Result, SemrelError};
use std::fmt;
use std::str::FromStr;

/// Named release track with its own version counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Stable releases (no pre-release suffix)
    Stable,
    /// Release candidates ("-rc.N" suffix)
    Rc,
    /// Beta releases ("-beta.N" suffix)
    Beta,
    /// No release is ever attempted on this branch
    None,
}

impl Channel {
    /// The pre-release label for this channel, if any
    pub fn prerelease_label(&self) -> Option<&'static str> {
        match self {
            Channel::Stable | Channel::None => None,
            Channel::Rc => Some("rc"),
            Channel::Beta => Some("beta"),
        }
    }
}

impl FromStr for Channel {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stable" => Ok(Channel::Stable),
            "rc" => Ok(Channel::Rc),
            "beta" => Ok(Channel::Beta),
            "none" => Ok(Channel::None),
            other => Err(SemrelError::config(format!(
                "Unknown release channel: '{}' (expected stable, rc, beta or none)",
                other
            ))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "stable"),
            Channel::Rc => write!(f, "rc"),
            Channel::Beta => write!(f, "beta"),
            Channel::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_str() {
        assert_eq!("stable".parse::<Channel>().unwrap(), Channel::Stable);
        assert_eq!("rc".parse::<Channel>().unwrap(), Channel::Rc);
        assert_eq!("Beta".parse::<Channel>().unwrap(), Channel::Beta);
        assert!("nightly".parse::<Channel>().is_err());
    }

    #[test]
    fn test_prerelease_label() {
        assert_eq!(Channel::Stable.prerelease_label(), None);
        assert_eq!(Channel::Rc.prerelease_label(), Some("rc"));
        assert_eq!(Channel::Beta.prerelease_label(), Some("beta"));
        assert_eq!(Channel::None.prerelease_label(), None);
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(Channel::Stable.to_string(), "stable");
        assert_eq!(Channel::None.to_string(), "none");
    }
}
