use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains repository identity, tag naming, version derivation rules and changelog layout.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Where links in the changelog point.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// Web URL of the repository, e.g. `https://github.com/owner/repo`.
    /// Derived from `remote` when unset.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            url: None,
            remote: default_remote(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_tag_prefix")]
    pub prefix: String,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            prefix: default_tag_prefix(),
        }
    }
}

/// What to do when commits exist but none of them asks for a bump.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoBumpPolicy {
    /// Finish without releasing
    #[default]
    Skip,
    /// Release a patch version anyway
    Patch,
}

/// Configuration for version derivation.
///
/// Defines the version record location, the commit types that drive each bump,
/// and the markers that force a major release.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VersionConfig {
    #[serde(default = "default_version_file")]
    pub file: PathBuf,

    #[serde(default)]
    pub on_no_bump: NoBumpPolicy,

    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string()]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec!["BREAKING CHANGE".to_string(), "BREAKING CHANGES".to_string()]
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            file: default_version_file(),
            on_no_bump: NoBumpPolicy::default(),
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
        }
    }
}

/// A commit type that gets its own group in the changelog
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SectionType {
    #[serde(rename = "type")]
    pub r#type: String,
    pub title: String,
}

impl SectionType {
    pub fn new(r#type: impl Into<String>, title: impl Into<String>) -> Self {
        SectionType {
            r#type: r#type.into(),
            title: title.into(),
        }
    }
}

/// Configuration for changelog rendering and merging.
///
/// `types` is ordered; groups render in this order and commit types not listed are left out.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,

    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_fallback")]
    pub fallback: String,

    #[serde(default = "default_section_types")]
    pub types: Vec<SectionType>,
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_marker() -> String {
    "## Changelog".to_string()
}

fn default_fallback() -> String {
    "no significant changes".to_string()
}

fn default_section_types() -> Vec<SectionType> {
    vec![
        SectionType::new("feat", "Features"),
        SectionType::new("fix", "Bug Fixes"),
    ]
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            marker: default_marker(),
            fallback: default_fallback(),
            types: default_section_types(),
        }
    }
}

impl Config {
    /// Reject configurations the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.changelog.marker.trim().is_empty() {
            return Err(ReleaseError::config("changelog.marker must not be empty"));
        }
        if self.changelog.types.is_empty() {
            return Err(ReleaseError::config(
                "changelog.types must list at least one commit type",
            ));
        }
        if let Some(dup) = self
            .changelog
            .types
            .iter()
            .enumerate()
            .find(|(i, t)| self.changelog.types[..*i].iter().any(|o| o.r#type == t.r#type))
        {
            return Err(ReleaseError::config(format!(
                "changelog.types lists '{}' more than once",
                dup.1.r#type
            )));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Some(PathBuf::from(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|p| p.exists())
    };

    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| ReleaseError::file("read", &path, e))?;
            parse_config(&content)
                .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parse configuration text
pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}
