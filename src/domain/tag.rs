use super::version::Version;

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Semantic version encoded in the tag name, if any
    pub fn version(&self) -> Option<Version> {
        Version::from_tag(&self.name)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The last released point: the newest tag and the one before it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseRange {
    pub latest: Option<Tag>,
    pub previous: Option<Tag>,
}

impl ReleaseRange {
    /// Build from tag names already sorted newest-first
    pub fn from_newest_first(tags: &[String]) -> Self {
        ReleaseRange {
            latest: tags.first().map(Tag::new),
            previous: tags.get(1).map(Tag::new),
        }
    }
}

/// Tag naming prefix (e.g. "v" -> "v1.2.3")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub prefix: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPattern {
            prefix: prefix.into(),
        }
    }

    /// Format a version according to the pattern
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }
}
