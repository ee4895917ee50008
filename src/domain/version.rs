use crate::error::{ChangesetError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a manifest version string (e.g., "1.2.3" -> Version(1,2,3))
    ///
    /// Accepts `major.minor`, `major.minor.patch` and `major.minor.patch.revision`
    /// with an optional `v` prefix. A missing patch is 0 and a revision is dropped.
    /// Components equal to `u32::MAX` are rejected since they cannot be raised.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let clean = trimmed.trim_start_matches('v').trim_start_matches('V');

        let parts: Vec<&str> = clean.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(ChangesetError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                trimmed
            )));
        }

        let component = |name: &str, value: &str| match value.parse::<u32>() {
            Ok(u32::MAX) => Err(ChangesetError::version(format!(
                "{} version '{}' is too large to raise",
                name, value
            ))),
            Ok(number) => Ok(number),
            Err(_) => Err(ChangesetError::version(format!(
                "Invalid {} version: '{}'",
                name, value
            ))),
        };

        let major = component("major", parts[0])?;
        let minor = component("minor", parts[1])?;
        let patch = match parts.get(2) {
            Some(value) => component("patch", value)?,
            None => 0,
        };
        if let Some(revision) = parts.get(3) {
            component("revision", revision)?;
        }

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Bump version according to bump level; components saturate at `u32::MAX`
    pub fn bump(&self, level: BumpLevel) -> Self {
        match level {
            BumpLevel::None => *self,
            BumpLevel::Major => Version {
                major: self.major.saturating_add(1),
                minor: 0,
                patch: 0,
            },
            BumpLevel::Minor => Version {
                major: self.major,
                minor: self.minor.saturating_add(1),
                patch: 0,
            },
            BumpLevel::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.saturating_add(1),
            },
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ChangesetError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Magnitude of a version change, ordered by severity.
///
/// `None` is only produced internally; changeset authors pick one of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BumpLevel {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    /// Parse an authored bump token, case-insensitively
    pub fn parse_authored(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "patch" => Some(BumpLevel::Patch),
            "minor" => Some(BumpLevel::Minor),
            "major" => Some(BumpLevel::Major),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BumpLevel::None => "None",
            BumpLevel::Patch => "Patch",
            BumpLevel::Minor => "Minor",
            BumpLevel::Major => "Major",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
