use crate::config::{ChangelogConfig, SectionType};
use crate::domain::CommitRecord;
use regex::{Captures, Regex};
use std::fmt::Write;
use std::sync::OnceLock;

/// `#123` at the start of a subject or after whitespace or `(`.
/// `[#123]` is left alone so existing markdown links are not wrapped again.
const REFERENCE_PATTERN: &str = r"(^|[\s(])#(\d+)\b";

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

/// Heading data for one release section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: String,
    pub date: String,
    pub compare_url: Option<String>,
}

/// Commit subjects bucketed by configured type, in configuration order.
///
/// Each bucket keeps the order commits were supplied in. Types that are not
/// configured never get a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedCommits {
    groups: Vec<(SectionType, Vec<String>)>,
}

impl GroupedCommits {
    /// Group parsed commits by the configured section types
    pub fn group(types: &[SectionType], commits: &[CommitRecord]) -> Self {
        let groups = types
            .iter()
            .map(|section| {
                let subjects = commits
                    .iter()
                    .filter(|c| c.r#type == section.r#type && !c.subject.is_empty())
                    .map(|c| c.subject.clone())
                    .collect();
                (section.clone(), subjects)
            })
            .collect();

        GroupedCommits { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SectionType, &[String])> {
        self.groups
            .iter()
            .map(|(section, subjects)| (section, subjects.as_slice()))
    }

    /// True when every group is empty
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, subjects)| subjects.is_empty())
    }
}

/// A rendered release section and the notes body inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    /// Version heading plus body, ending in a single newline
    pub section: String,
    /// Body only, for use as published release notes
    pub notes: String,
}

/// Renders markdown changelog sections
pub struct ChangelogRenderer {
    repo_url: Option<String>,
    fallback: String,
}

impl ChangelogRenderer {
    pub fn new(config: &ChangelogConfig, repo_url: Option<String>) -> Self {
        ChangelogRenderer {
            repo_url: repo_url.map(|url| url.trim_end_matches('/').to_string()),
            fallback: config.fallback.clone(),
        }
    }

    /// Compare link between two tags, when the repository URL is known
    pub fn compare_url(&self, from_tag: &str, to_tag: &str) -> Option<String> {
        self.repo_url
            .as_ref()
            .map(|url| format!("{}/compare/{}...{}", url, from_tag, to_tag))
    }

    /// Render one release section.
    ///
    /// Output depends only on the arguments; empty groups are skipped and a
    /// fully empty release renders the fallback bullet.
    pub fn render(&self, info: &ReleaseInfo, grouped: &GroupedCommits) -> RenderedSection {
        let heading = match &info.compare_url {
            Some(url) => format!("### [{}]({}) ({})\n", info.version, url, info.date),
            None => format!("### {} ({})\n", info.version, info.date),
        };

        let mut notes = String::new();
        if grouped.is_empty() {
            let _ = writeln!(notes, "- {}", self.fallback);
        } else {
            for (section, subjects) in grouped.iter().filter(|(_, s)| !s.is_empty()) {
                if !notes.is_empty() {
                    notes.push('\n');
                }
                let _ = writeln!(notes, "#### {}\n", section.title);
                for subject in subjects {
                    let _ = writeln!(notes, "- {}", self.link_references(subject));
                }
            }
        }

        RenderedSection {
            section: format!("{}\n{}", heading, notes),
            notes,
        }
    }

    /// Turn `#N` references into pull request links
    pub fn link_references(&self, subject: &str) -> String {
        match &self.repo_url {
            Some(url) => reference_regex()
                .replace_all(subject, |caps: &Captures| {
                    format!("{}[#{}]({}/pull/{})", &caps[1], &caps[2], url, &caps[2])
                })
                .into_owned(),
            None => subject.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://github.com/acme/site";

    fn renderer() -> ChangelogRenderer {
        ChangelogRenderer::new(&ChangelogConfig::default(), Some(REPO.to_string()))
    }

    fn records(lines: &[&str]) -> Vec<CommitRecord> {
        CommitRecord::parse_all(lines.iter().copied())
    }

    fn info(compare_url: Option<&str>) -> ReleaseInfo {
        ReleaseInfo {
            version: "0.2.0".to_string(),
            date: "2026-10-19".to_string(),
            compare_url: compare_url.map(str::to_string),
        }
    }

    #[test]
    fn test_group_keeps_configured_types_in_order() {
        let config = ChangelogConfig::default();
        let grouped = GroupedCommits::group(
            &config.types,
            &records(&["fix: b", "docs: ignored", "feat: a", "feat(ui): c"]),
        );

        let groups: Vec<(&str, &[String])> = grouped
            .iter()
            .map(|(section, subjects)| (section.title.as_str(), subjects))
            .collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Features");
        assert_eq!(groups[0].1, ["a", "c"]);
        assert_eq!(groups[1].0, "Bug Fixes");
        assert_eq!(groups[1].1, ["b"]);
    }

    #[test]
    fn test_render_full_section() {
        let config = ChangelogConfig::default();
        let grouped = GroupedCommits::group(
            &config.types,
            &records(&["feat: add search bar", "fix: correct 404 link (#7)"]),
        );
        let rendered = renderer().render(
            &info(Some("https://github.com/acme/site/compare/v0.1.0...v0.2.0")),
            &grouped,
        );

        let expected = "### [0.2.0](https://github.com/acme/site/compare/v0.1.0...v0.2.0) (2026-10-19)\n\
\n\
#### Features\n\
\n\
- add search bar\n\
\n\
#### Bug Fixes\n\
\n\
- correct 404 link ([#7](https://github.com/acme/site/pull/7))\n";
        assert_eq!(rendered.section, expected);
        assert!(rendered.notes.starts_with("#### Features\n"));
        assert!(!rendered.notes.contains("### [0.2.0]"));
    }

    #[test]
    fn test_render_heading_without_compare_url() {
        let config = ChangelogConfig::default();
        let grouped = GroupedCommits::group(&config.types, &records(&["fix: typo"]));
        let rendered = renderer().render(&info(None), &grouped);

        assert!(rendered.section.starts_with("### 0.2.0 (2026-10-19)\n\n#### Bug Fixes\n"));
        assert!(!rendered.section.contains("#### Features"));
    }

    #[test]
    fn test_render_fallback_when_empty() {
        let config = ChangelogConfig::default();
        let grouped = GroupedCommits::group(&config.types, &records(&["docs: readme"]));
        let rendered = renderer().render(&info(None), &grouped);

        assert_eq!(
            rendered.section,
            "### 0.2.0 (2026-10-19)\n\n- no significant changes\n"
        );
        assert_eq!(rendered.notes, "- no significant changes\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = ChangelogConfig::default();
        let grouped = GroupedCommits::group(
            &config.types,
            &records(&["feat: a (#1)", "fix: b #2", "fix: c"]),
        );
        let renderer = renderer();
        let first = renderer.render(&info(None), &grouped);
        let second = renderer.render(&info(None), &grouped);
        assert_eq!(first, second);
    }

    #[test]
    fn test_link_references() {
        let renderer = renderer();
        assert!(renderer
            .link_references("fix crash (#42)")
            .ends_with("([#42](https://github.com/acme/site/pull/42))"));
        assert_eq!(
            renderer.link_references("#3 and #4"),
            "[#3](https://github.com/acme/site/pull/3) and [#4](https://github.com/acme/site/pull/4)"
        );
        assert_eq!(renderer.link_references("issue#5 stays"), "issue#5 stays");
        assert_eq!(renderer.link_references("no refs"), "no refs");
    }

    #[test]
    fn test_link_references_leaves_existing_links() {
        let renderer = renderer();
        let linked = "fix crash ([#7](https://github.com/acme/site/pull/7))";
        assert_eq!(renderer.link_references(linked), linked);
        assert_eq!(
            renderer.link_references("see [#7] and #8"),
            "see [#7] and [#8](https://github.com/acme/site/pull/8)"
        );
    }

    #[test]
    fn test_link_references_without_repo() {
        let renderer = ChangelogRenderer::new(&ChangelogConfig::default(), None);
        assert_eq!(renderer.link_references("fix (#42)"), "fix (#42)");
        assert_eq!(renderer.compare_url("v1.0.0", "v1.1.0"), None);
    }

    #[test]
    fn test_compare_url_trims_trailing_slash() {
        let renderer =
            ChangelogRenderer::new(&ChangelogConfig::default(), Some(format!("{}/", REPO)));
        assert_eq!(
            renderer.compare_url("v1.0.0", "v1.1.0").as_deref(),
            Some("https://github.com/acme/site/compare/v1.0.0...v1.1.0")
        );
    }
}
