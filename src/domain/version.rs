use crate::error::{ReleaseError, Result};
use std::fmt;

/// Semantic version representation.
///
/// Ordering is lexicographic on (major, minor, patch), which is what the derived
/// `Ord` gives for this field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a recorded version string leniently.
    ///
    /// Accepts an optional `v`/`V` prefix. Each dotted component contributes its
    /// leading digits; missing or unparseable components become 0 and anything
    /// past the third component is ignored. Fails only when no component holds
    /// a number at all.
    pub fn parse(input: &str) -> Result<Self> {
        let clean = input.trim().trim_start_matches(['v', 'V']);

        let mut parts = [None, None, None];
        for (slot, component) in parts.iter_mut().zip(clean.split('.')) {
            *slot = leading_number(component);
        }

        if parts.iter().all(Option::is_none) {
            return Err(ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                input
            )));
        }

        let [major, minor, patch] = parts.map(|part| part.unwrap_or(0));
        Ok(Version::new(major, minor, patch))
    }

    /// Parse a version out of a tag name.
    ///
    /// Tags are tried as strict semver first (so pre-release and build suffixes
    /// are understood), then with the lenient rules of [`Version::parse`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let clean = tag.trim().trim_start_matches(['v', 'V']);
        match semver::Version::parse(clean) {
            Ok(v) => Some(Version::new(v.major, v.minor, v.patch)),
            Err(_) => Version::parse(clean).ok(),
        }
    }

    /// Apply a bump to this version.
    ///
    /// Fails when the bumped component is already at `u64::MAX`.
    pub fn increment(&self, bump: VersionBump) -> Result<Self> {
        let next = match bump {
            VersionBump::Major => self
                .major
                .checked_add(1)
                .map(|major| Version::new(major, 0, 0)),
            VersionBump::Minor => self
                .minor
                .checked_add(1)
                .map(|minor| Version::new(self.major, minor, 0)),
            VersionBump::Patch => self
                .patch
                .checked_add(1)
                .map(|patch| Version::new(self.major, self.minor, patch)),
        };
        next.ok_or_else(|| {
            ReleaseError::version(format!("cannot apply a {} bump to {}", bump, self))
        })
    }
}

fn leading_number(component: &str) -> Option<u64> {
    let digits: String = component
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Severity of a release derived from commit history.
///
/// "No release needed" is `Option::<VersionBump>::None`, so a version can never
/// be incremented by nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// True when `candidate` may be published after `last_tag`.
pub fn validate_monotonic(candidate: &Version, last_tag: Option<&Version>) -> bool {
    match last_tag {
        Some(last) => candidate > last,
        None => true,
    }
}
