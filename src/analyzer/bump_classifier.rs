use crate::config::VersionConfig;
use crate::domain::VersionBump;
use regex::Regex;

/// Decides the release severity for a set of raw commit blocks
pub struct BumpClassifier {
    breaking_change_indicators: Vec<String>,
    minor: Option<Regex>,
    patch: Option<Regex>,
}

impl BumpClassifier {
    /// Create a classifier from the version configuration
    pub fn new(config: &VersionConfig) -> Self {
        BumpClassifier {
            breaking_change_indicators: config.breaking_change_indicators.clone(),
            minor: type_header_regex(&config.minor_types),
            patch: type_header_regex(&config.patch_types),
        }
    }

    /// Classify the full text of each commit (header line plus body).
    ///
    /// Strict waterfall, first match wins:
    /// any breaking marker anywhere → major, else any minor-type header → minor,
    /// else any patch-type header → patch, else `None`.
    pub fn classify<S: AsRef<str>>(&self, blocks: &[S]) -> Option<VersionBump> {
        let blocks: Vec<&str> = blocks.iter().map(AsRef::as_ref).collect();

        if blocks.iter().any(|block| self.is_breaking(block)) {
            return Some(VersionBump::Major);
        }
        if headers_match(&self.minor, &blocks) {
            return Some(VersionBump::Minor);
        }
        if headers_match(&self.patch, &blocks) {
            return Some(VersionBump::Patch);
        }
        None
    }

    fn is_breaking(&self, block: &str) -> bool {
        self.breaking_change_indicators
            .iter()
            .any(|marker| !marker.is_empty() && block.contains(marker.as_str()))
    }
}

/// `^(feat|...)(\(scope\))?:` over the given types
fn type_header_regex(types: &[String]) -> Option<Regex> {
    if types.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = types.iter().map(|t| regex::escape(t)).collect();
    Regex::new(&format!(r"^(?:{})(?:\([^)]+\))?:", alternatives.join("|"))).ok()
}

fn headers_match(re: &Option<Regex>, blocks: &[&str]) -> bool {
    match re {
        Some(re) => blocks
            .iter()
            .any(|block| re.is_match(block.lines().next().unwrap_or(""))),
        None => false,
    }
}
