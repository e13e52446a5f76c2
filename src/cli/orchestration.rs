//! Release workflow orchestration
//!
//! Planning reads history, the version record and the current changelog, and
//! produces every output in memory. Nothing is written until [`persist`] runs,
//! so a failure anywhere in planning leaves both files untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analyzer::BumpClassifier;
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogRenderer, GroupedCommits, ReleaseInfo, RenderedSection};
use crate::config::{Config, NoBumpPolicy};
use crate::domain::{validate_monotonic, CommitRecord, Tag, TagPattern, Version, VersionBump};
use crate::error::{ReleaseError, Result};
use crate::git::{self, CommitInfo, Repository};
use crate::manifest::VersionRecord;

/// Environment variable naming the automation output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// What a run should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// Bump the version record and add a changelog section
    Release,
    /// Bump the version record only
    Bump,
}

/// Options for one workflow run
///
/// Mirrors the CLI flags in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOptions {
    /// Directory config-relative paths are resolved against
    pub root: PathBuf,
    /// Release date shown in the section heading
    pub date: String,
    /// Policy when no commit qualifies for a bump
    pub on_no_bump: NoBumpPolicy,
}

impl WorkflowOptions {
    pub fn new(root: impl Into<PathBuf>, date: impl Into<String>, config: &Config) -> Self {
        WorkflowOptions {
            root: root.into(),
            date: date.into(),
            on_no_bump: config.version.on_no_bump,
        }
    }
}

/// New content for a file, not yet written
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub content: String,
}

/// Everything a release will write, computed up front
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub bump: Option<VersionBump>,
    pub current_version: Version,
    pub next_version: Version,
    /// Tag name the release is expected to be published under
    pub tag: String,
    pub changelog_path: PathBuf,
    pub section: Option<RenderedSection>,
    pub changelog: Option<FileUpdate>,
    pub manifest: Option<FileUpdate>,
}

/// Result of planning: the plan, or `None` when there is nothing to release
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Human readable revision range that was analysed
    pub range: String,
    pub commits: Vec<CommitInfo>,
    pub warnings: Vec<BoundaryWarning>,
    pub plan: Option<ReleasePlan>,
}

impl WorkflowResult {
    fn nothing(range: String, commits: Vec<CommitInfo>, warnings: Vec<BoundaryWarning>) -> Self {
        WorkflowResult {
            range,
            commits,
            warnings,
            plan: None,
        }
    }
}

/// Plan a release from the commits since the latest tag.
///
/// 1. Load the version record (fatal if missing or unparseable)
/// 2. Collect commits in `latest_tag..HEAD`, or all of `HEAD` without tags
/// 3. Classify the bump and apply the no-bump policy
/// 4. Derive the next version and check it against the latest tag
/// 5. Render and merge the changelog section (release mode)
pub fn plan_release<R: Repository>(
    repo: &R,
    config: &Config,
    options: &WorkflowOptions,
    mode: ReleaseMode,
) -> Result<WorkflowResult> {
    let record = VersionRecord::load(&options.root.join(&config.version.file))?;
    let release_range = repo.release_range()?;
    let latest = release_range.latest;

    let mut warnings = Vec::new();
    if latest.is_none() {
        warnings.push(BoundaryWarning::NoTags);
    }

    let from = latest.as_ref().map(|t| t.name.as_str());
    let commits = repo.commits_in_range(from, "HEAD")?;
    let range = match from {
        Some(tag) => format!("{}..HEAD", tag),
        None => "HEAD".to_string(),
    };

    if commits.is_empty() {
        warnings.push(BoundaryWarning::NoNewCommits {
            since: latest.map(|t| t.name),
        });
        return Ok(WorkflowResult::nothing(range, commits, warnings));
    }

    let blocks: Vec<&str> = commits.iter().map(CommitInfo::block).collect();
    let bump = match BumpClassifier::new(&config.version).classify(&blocks) {
        Some(bump) => bump,
        None => {
            warnings.push(BoundaryWarning::NoQualifyingCommits {
                commit_count: commits.len(),
            });
            match options.on_no_bump {
                NoBumpPolicy::Skip => return Ok(WorkflowResult::nothing(range, commits, warnings)),
                NoBumpPolicy::Patch => VersionBump::Patch,
            }
        }
    };

    let current_version = record.version();
    let next_version = current_version.increment(bump)?;
    ensure_monotonic(&next_version, latest.as_ref(), &mut warnings)?;

    let tag = TagPattern::new(&config.tags.prefix).format(&next_version);
    let changelog_path = options.root.join(&config.changelog.path);

    let manifest = FileUpdate {
        path: record.path().to_path_buf(),
        content: record.with_version(&next_version)?,
    };

    let (section, changelog) = match mode {
        ReleaseMode::Bump => (None, None),
        ReleaseMode::Release => {
            let renderer = renderer_for(repo, config, &mut warnings)?;
            let info = ReleaseInfo {
                version: next_version.to_string(),
                date: options.date.clone(),
                compare_url: latest
                    .as_ref()
                    .and_then(|t| renderer.compare_url(&t.name, &tag)),
            };
            let section = render_commits(&renderer, config, &info, &commits, &mut warnings);
            let changelog = merge_into_file(&changelog_path, &section.section, config)?;
            (Some(section), Some(changelog))
        }
    };

    Ok(WorkflowResult {
        range,
        commits,
        warnings,
        plan: Some(ReleasePlan {
            bump: Some(bump),
            current_version,
            next_version,
            tag,
            changelog_path,
            section,
            changelog,
            manifest: Some(manifest),
        }),
    })
}

/// Plan the changelog section for the latest existing tag.
///
/// Covers `previous_tag..latest_tag` (or all of `latest_tag` when it is the
/// only tag). The version record must already hold the latest tag's version.
pub fn plan_changelog<R: Repository>(
    repo: &R,
    config: &Config,
    options: &WorkflowOptions,
) -> Result<WorkflowResult> {
    let record = VersionRecord::load(&options.root.join(&config.version.file))?;
    let release_range = repo.release_range()?;

    let latest = match release_range.latest {
        Some(tag) => tag,
        None => {
            return Ok(WorkflowResult::nothing(
                String::new(),
                Vec::new(),
                vec![BoundaryWarning::NoTags],
            ))
        }
    };
    let previous = release_range.previous;

    let recorded = record.version();
    if latest.version() != Some(recorded) {
        return Err(ReleaseError::TagMismatch {
            recorded: recorded.to_string(),
            tag: latest.name,
        });
    }

    let from = previous.as_ref().map(|t| t.name.as_str());
    let commits = repo.commits_in_range(from, &latest.name)?;
    let range = match from {
        Some(prev) => format!("{}..{}", prev, latest.name),
        None => latest.name.clone(),
    };

    let mut warnings = Vec::new();
    if commits.is_empty() {
        warnings.push(BoundaryWarning::NoNewCommits {
            since: previous.map(|t| t.name),
        });
        return Ok(WorkflowResult::nothing(range, commits, warnings));
    }

    let renderer = renderer_for(repo, config, &mut warnings)?;
    let info = ReleaseInfo {
        version: recorded.to_string(),
        date: options.date.clone(),
        compare_url: previous
            .as_ref()
            .and_then(|p| renderer.compare_url(&p.name, &latest.name)),
    };
    let section = render_commits(&renderer, config, &info, &commits, &mut warnings);
    let changelog_path = options.root.join(&config.changelog.path);
    let changelog = merge_into_file(&changelog_path, &section.section, config)?;

    Ok(WorkflowResult {
        range,
        commits,
        warnings,
        plan: Some(ReleasePlan {
            bump: None,
            current_version: recorded,
            next_version: recorded,
            tag: latest.name,
            changelog_path,
            section: Some(section),
            changelog: Some(changelog),
            manifest: None,
        }),
    })
}

/// Write a planned release: changelog first, then the version record, then notes.
pub fn persist(plan: &ReleasePlan, notes_path: Option<&Path>) -> Result<()> {
    if let Some(changelog) = &plan.changelog {
        write_file(changelog)?;
    }
    if let Some(manifest) = &plan.manifest {
        write_file(manifest)?;
    }
    if let (Some(path), Some(section)) = (notes_path, &plan.section) {
        fs::write(path, &section.notes).map_err(|e| ReleaseError::file("write", path, e))?;
    }
    Ok(())
}

/// Path of the automation output file, when running under CI
pub fn automation_output_path() -> Option<PathBuf> {
    std::env::var_os(GITHUB_OUTPUT_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Append `new_version=<x.y.z>` to the automation output file.
pub fn emit_next_version(path: &Path, version: &Version) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ReleaseError::file("open", path, e))?;
    writeln!(file, "new_version={}", version).map_err(|e| ReleaseError::file("write", path, e))?;
    Ok(())
}

fn ensure_monotonic(
    candidate: &Version,
    latest: Option<&Tag>,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<()> {
    let Some(tag) = latest else {
        return Ok(());
    };
    match tag.version() {
        Some(last) if !validate_monotonic(candidate, Some(&last)) => {
            Err(ReleaseError::NonMonotonic {
                candidate: candidate.to_string(),
                last_tag: tag.name.clone(),
            })
        }
        Some(_) => Ok(()),
        None => {
            warnings.push(BoundaryWarning::UnparsableTag {
                tag: tag.name.clone(),
            });
            Ok(())
        }
    }
}

fn renderer_for<R: Repository>(
    repo: &R,
    config: &Config,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<ChangelogRenderer> {
    let url = match &config.repository.url {
        Some(url) => Some(url.clone()),
        None => repo
            .remote_url(&config.repository.remote)?
            .and_then(|remote| git::web_url_from_remote(&remote)),
    };
    if url.is_none() {
        warnings.push(BoundaryWarning::NoRepositoryUrl {
            remote: config.repository.remote.clone(),
        });
    }
    Ok(ChangelogRenderer::new(&config.changelog, url))
}

fn render_commits(
    renderer: &ChangelogRenderer,
    config: &Config,
    info: &ReleaseInfo,
    commits: &[CommitInfo],
    warnings: &mut Vec<BoundaryWarning>,
) -> RenderedSection {
    let records = CommitRecord::parse_all(commits.iter().map(CommitInfo::header));
    let skipped = commits.len() - records.len();
    if skipped > 0 {
        warnings.push(BoundaryWarning::SkippedCommits { count: skipped });
    }

    let grouped = GroupedCommits::group(&config.changelog.types, &records);
    renderer.render(info, &grouped)
}

fn merge_into_file(path: &Path, section: &str, config: &Config) -> Result<FileUpdate> {
    let existing = if path.exists() {
        Some(fs::read_to_string(path).map_err(|e| ReleaseError::file("read", path, e))?)
    } else {
        None
    };
    let content = changelog::merge(existing.as_deref(), section, &config.changelog.marker)?;

    Ok(FileUpdate {
        path: path.to_path_buf(),
        content,
    })
}

fn write_file(update: &FileUpdate) -> Result<()> {
    if let Some(parent) = update.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReleaseError::file("create", parent, e))?;
    }
    fs::write(&update.path, &update.content)
        .map_err(|e| ReleaseError::file("write", &update.path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use tempfile::TempDir;

    fn workspace(version: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            format!("{{\n  \"name\": \"site\",\n  \"version\": \"{}\"\n}}\n", version),
        )
        .unwrap();
        dir
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.repository.url = Some("https://github.com/acme/site".to_string());
        config
    }

    fn options(dir: &TempDir, config: &Config) -> WorkflowOptions {
        WorkflowOptions::new(dir.path(), "2026-10-19", config)
    }

    #[test]
    fn test_plan_release_without_tags() {
        let dir = workspace("0.1.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: add search bar")
            .commit("fix: correct 404 link (#7)");

        let result =
            plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release).unwrap();
        let plan = result.plan.unwrap();

        assert_eq!(plan.bump, Some(VersionBump::Minor));
        assert_eq!(plan.next_version, Version::new(0, 2, 0));
        assert_eq!(plan.tag, "v0.2.0");
        assert!(result.warnings.contains(&BoundaryWarning::NoTags));

        let changelog = plan.changelog.unwrap().content;
        assert!(changelog.starts_with("## Changelog\n\n### 0.2.0 (2026-10-19)\n"));
        assert!(changelog.contains("#### Features\n\n- add search bar\n"));
        assert!(changelog.contains("([#7](https://github.com/acme/site/pull/7))"));

        let manifest = plan.manifest.unwrap().content;
        assert!(manifest.contains("\"version\": \"0.2.0\""));
        // nothing written yet
        assert!(!dir.path().join("CHANGELOG.md").exists());
    }

    #[test]
    fn test_plan_release_since_latest_tag() {
        let dir = workspace("1.0.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: old").tag("v1.0.0").commit("fix: only this");

        let result =
            plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release).unwrap();
        let plan = result.plan.unwrap();

        assert_eq!(plan.next_version, Version::new(1, 0, 1));
        assert_eq!(result.range, "v1.0.0..HEAD");
        let section = plan.section.unwrap().section;
        assert!(section.starts_with(
            "### [1.0.1](https://github.com/acme/site/compare/v1.0.0...v1.0.1) (2026-10-19)"
        ));
        assert!(!section.contains("old"));
    }

    #[test]
    fn test_plan_release_nothing_new() {
        let dir = workspace("1.0.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: old").tag("v1.0.0");

        let result =
            plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release).unwrap();
        assert!(result.plan.is_none());
        assert!(matches!(
            result.warnings.last(),
            Some(BoundaryWarning::NoNewCommits { .. })
        ));
    }

    #[test]
    fn test_no_bump_policy() {
        let dir = workspace("1.0.0");
        let mut config = config();
        let mut repo = MockRepository::new();
        repo.commit("docs: readme");

        let skip =
            plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Bump).unwrap();
        assert!(skip.plan.is_none());

        config.version.on_no_bump = NoBumpPolicy::Patch;
        let patch =
            plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Bump).unwrap();
        assert_eq!(patch.plan.unwrap().next_version, Version::new(1, 0, 1));
    }

    #[test]
    fn test_non_monotonic_is_fatal() {
        let dir = workspace("0.9.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: a").tag("v1.0.0").commit("fix: b");

        let err = plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::NonMonotonic { .. }));
        assert!(!dir.path().join("CHANGELOG.md").exists());
    }

    #[test]
    fn test_missing_version_record_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: a");

        let err = plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest(_)));
    }

    #[test]
    fn test_bump_mode_skips_changelog() {
        let dir = workspace("0.1.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("fix: a");

        let plan = plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Bump)
            .unwrap()
            .plan
            .unwrap();
        assert!(plan.changelog.is_none());
        assert!(plan.section.is_none());
        assert!(plan.manifest.is_some());
    }

    #[test]
    fn test_plan_changelog_for_latest_tag() {
        let dir = workspace("0.2.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: first")
            .tag("v0.1.0")
            .commit("feat: second")
            .commit("chore: tidy")
            .tag("v0.2.0")
            .commit("fix: unreleased");

        let result = plan_changelog(&repo, &config, &options(&dir, &config)).unwrap();
        let plan = result.plan.unwrap();
        let section = plan.section.unwrap().section;

        assert_eq!(result.range, "v0.1.0..v0.2.0");
        assert!(section.contains("compare/v0.1.0...v0.2.0"));
        assert!(section.contains("- second"));
        assert!(!section.contains("first"));
        assert!(!section.contains("unreleased"));
        assert!(plan.manifest.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_plan_changelog_version_mismatch() {
        let dir = workspace("0.1.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: first").tag("v0.2.0");

        let err = plan_changelog(&repo, &config, &options(&dir, &config)).unwrap_err();
        assert!(matches!(err, ReleaseError::TagMismatch { .. }));
    }

    #[test]
    fn test_plan_changelog_without_tags() {
        let dir = workspace("0.1.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: first");

        let result = plan_changelog(&repo, &config, &options(&dir, &config)).unwrap();
        assert!(result.plan.is_none());
        assert_eq!(result.warnings, vec![BoundaryWarning::NoTags]);
    }

    #[test]
    fn test_persist_writes_both_files() {
        let dir = workspace("0.1.0");
        let config = config();
        let mut repo = MockRepository::new();
        repo.commit("feat: add search bar");

        let plan = plan_release(&repo, &config, &options(&dir, &config), ReleaseMode::Release)
            .unwrap()
            .plan
            .unwrap();
        let notes = dir.path().join("notes.md");
        persist(&plan, Some(&notes)).unwrap();

        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(changelog.contains("- add search bar"));
        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("\"version\": \"0.2.0\""));
        assert_eq!(
            fs::read_to_string(notes).unwrap(),
            "#### Features\n\n- add search bar\n"
        );
    }

    #[test]
    fn test_emit_next_version_appends() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        fs::write(&out, "existing=1\n").unwrap();

        emit_next_version(&out, &Version::new(0, 2, 0)).unwrap();

        assert_eq!(
            fs::read_to_string(out).unwrap(),
            "existing=1\nnew_version=0.2.0\n"
        );
    }
}
