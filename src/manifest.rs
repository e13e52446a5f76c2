//! The persisted version record.
//!
//! Supports `package.json` (top-level `"version"`) and `Cargo.toml`
//! (`[package].version`, or `[workspace.package].version` when the package has
//! no version of its own or inherits it). Only the version value is rewritten;
//! everything else keeps its shape.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    PackageJson,
    CargoToml,
}

impl ManifestFormat {
    /// Pick the format from the file name; anything ending in `.toml` is treated as Cargo-style
    pub fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ManifestFormat::PackageJson),
            Some("toml") => Ok(ManifestFormat::CargoToml),
            _ => Err(ReleaseError::manifest(format!(
                "unsupported version file '{}': expected a .json or .toml file",
                path.display()
            ))),
        }
    }
}

/// Table a Cargo manifest keeps its version in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionTable {
    Package,
    /// `[workspace.package]`, either directly or through `version.workspace = true`
    WorkspacePackage,
}

impl VersionTable {
    fn get(self, doc: &DocumentMut) -> Option<&Item> {
        match self {
            VersionTable::Package => doc.get("package"),
            VersionTable::WorkspacePackage => doc.get("workspace").and_then(|w| w.get("package")),
        }
    }

    fn get_mut(self, doc: &mut DocumentMut) -> Option<&mut Item> {
        match self {
            VersionTable::Package => doc.get_mut("package"),
            VersionTable::WorkspacePackage => doc
                .get_mut("workspace")
                .and_then(|w| w.get_mut("package")),
        }
    }
}

/// A version record loaded into memory
#[derive(Debug, Clone)]
pub struct VersionRecord {
    path: PathBuf,
    format: ManifestFormat,
    content: String,
    version: Version,
    /// Where a Cargo manifest's version was read from; writes go back there
    table: Option<VersionTable>,
}

impl VersionRecord {
    /// Read and parse the version record at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let format = ManifestFormat::detect(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            ReleaseError::manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_content(path, format, content)
    }

    /// Parse a version record from text already in memory
    pub fn from_content(path: &Path, format: ManifestFormat, content: String) -> Result<Self> {
        let (raw, table) = match format {
            ManifestFormat::PackageJson => (json_version(&content)?, None),
            ManifestFormat::CargoToml => {
                let (raw, table) = toml_version(&content)?;
                (raw, Some(table))
            }
        };
        let version = Version::parse(&raw).map_err(|_| {
            ReleaseError::manifest(format!(
                "{}: version '{}' is not a semantic version",
                path.display(),
                raw
            ))
        })?;

        Ok(VersionRecord {
            path: path.to_path_buf(),
            format,
            content,
            version,
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// File content with only the version field replaced
    pub fn with_version(&self, version: &Version) -> Result<String> {
        match self.format {
            ManifestFormat::PackageJson => {
                let mut value: serde_json::Value = serde_json::from_str(&self.content)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert(
                        "version".to_string(),
                        serde_json::Value::String(version.to_string()),
                    );
                }
                Ok(serde_json::to_string_pretty(&value)? + "\n")
            }
            ManifestFormat::CargoToml => {
                let mut doc = self.content.parse::<DocumentMut>()?;
                let table = self.table.unwrap_or(VersionTable::Package);
                let item = table
                    .get_mut(&mut doc)
                    .and_then(|t| t.get_mut("version"))
                    .ok_or_else(|| {
                        ReleaseError::manifest(format!(
                            "{} has no version to update",
                            self.path.display()
                        ))
                    })?;
                replace_keeping_decor(item, version.to_string());
                Ok(doc.to_string())
            }
        }
    }
}

fn json_version(content: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    match value.get("version") {
        Some(serde_json::Value::String(v)) => Ok(v.clone()),
        Some(other) => Err(ReleaseError::manifest(format!(
            "\"version\" must be a string, found {}",
            other
        ))),
        None => Err(ReleaseError::manifest("missing \"version\" field")),
    }
}

/// Read the version from `[package]`, following `version.workspace = true`,
/// or from `[workspace.package]` when there is no package version.
fn toml_version(content: &str) -> Result<(String, VersionTable)> {
    let doc = content.parse::<DocumentMut>()?;

    let table = match VersionTable::Package.get(&doc).and_then(|p| p.get("version")) {
        Some(item) if inherits_workspace(item) => VersionTable::WorkspacePackage,
        Some(_) => VersionTable::Package,
        None => VersionTable::WorkspacePackage,
    };
    let item = table
        .get(&doc)
        .and_then(|t| t.get("version"))
        .ok_or_else(|| ReleaseError::manifest("missing package version"))?;

    let raw = item
        .as_str()
        .ok_or_else(|| ReleaseError::manifest("package version must be a string"))?;
    Ok((raw.to_string(), table))
}

/// `version.workspace = true` or `version = { workspace = true }`
fn inherits_workspace(item: &Item) -> bool {
    item.as_table_like()
        .and_then(|t| t.get("workspace"))
        .and_then(Item::as_bool)
        .unwrap_or(false)
}

/// Swap the value but keep the spacing and trailing comment around it
fn replace_keeping_decor(item: &mut Item, new: String) {
    let mut value = Value::from(new);
    if let Some(old) = item.as_value() {
        *value.decor_mut() = old.decor().clone();
    }
    *item = Item::Value(value);
}
