use regex::Regex;
use std::sync::OnceLock;

/// Header grammar: `type(scope): subject`, scope optional.
const HEADER_PATTERN: &str = r"^([A-Za-z0-9_]+)(?:\(([^)]+)\))?:\s*(.+)$";

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(HEADER_PATTERN).expect("header pattern is valid"))
}

/// A conventional commit header broken into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub r#type: String,
    pub scope: Option<String>,
    pub subject: String,
}

impl CommitRecord {
    /// Parse one commit header line.
    ///
    /// Lines that do not follow `type(scope): subject` return `None`; callers
    /// drop them without treating it as an error. Matching is case-sensitive
    /// and nothing is trimmed except the whitespace after the colon.
    pub fn parse(line: &str) -> Option<Self> {
        let captures = header_regex().captures(line)?;

        Some(CommitRecord {
            r#type: captures.get(1)?.as_str().to_string(),
            scope: captures.get(2).map(|m| m.as_str().to_string()),
            subject: captures.get(3)?.as_str().to_string(),
        })
    }

    /// Parse every header, silently skipping the unconventional ones
    pub fn parse_all<'a, I>(lines: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().filter_map(CommitRecord::parse).collect()
    }
}
