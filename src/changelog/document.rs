//! In-memory model of a persisted changelog file.
//!
//! The document is an ordered list of blocks. Text that was already on disk is
//! kept as opaque [`Block::Text`] so it round-trips byte for byte; new release
//! sections are inserted as [`Block::Section`] right after the marker.

use crate::error::{ReleaseError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Existing text, rendered verbatim
    Text(String),
    /// The top-level marker heading line, line ending included
    Marker(String),
    /// A rendered release section, preceded by a blank line when rendered
    Section(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    marker: String,
    blocks: Vec<Block>,
}

impl ChangelogDocument {
    /// An empty document with no marker yet
    pub fn new(marker: impl Into<String>) -> Self {
        ChangelogDocument {
            marker: marker.into(),
            blocks: Vec::new(),
        }
    }

    /// Split existing text around the marker line.
    ///
    /// A document may hold at most one marker; more than one is rejected
    /// rather than guessing where new sections belong.
    pub fn parse(text: &str, marker: &str) -> Result<Self> {
        let mut doc = ChangelogDocument::new(marker);

        let mut offset = 0;
        let mut found: Option<(usize, usize)> = None;
        for line in text.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            if line.trim_end() != marker {
                continue;
            }
            if found.is_some() {
                return Err(ReleaseError::changelog(format!(
                    "document contains more than one '{}' heading",
                    marker
                )));
            }
            found = Some((start, offset));
        }

        match found {
            Some((start, end)) => {
                if start > 0 {
                    doc.blocks.push(Block::Text(text[..start].to_string()));
                }
                doc.blocks.push(Block::Marker(text[start..end].to_string()));
                if end < text.len() {
                    doc.blocks.push(Block::Text(text[end..].to_string()));
                }
            }
            None if !text.is_empty() => doc.blocks.push(Block::Text(text.to_string())),
            None => {}
        }

        Ok(doc)
    }

    /// Insert a section directly after the marker.
    ///
    /// Without a marker, a fresh marker and the section are placed in front of
    /// whatever text the document already has.
    pub fn insert_section(&mut self, section: impl Into<String>) {
        let section = Block::Section(section.into());

        match self.blocks.iter().position(|b| matches!(b, Block::Marker(_))) {
            Some(index) => self.blocks.insert(index + 1, section),
            None => {
                let had_content = !self.blocks.is_empty();
                let mut head = vec![Block::Marker(format!("{}\n", self.marker)), section];
                if had_content {
                    head.push(Block::Text("\n".to_string()));
                }
                self.blocks.splice(0..0, head);
            }
        }
    }

    /// Serialize back to file content
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Marker(line) => {
                    out.push_str(line);
                    // a marker on the last line without a newline
                    if !line.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Block::Section(section) => {
                    out.push('\n');
                    out.push_str(section);
                }
            }
        }
        out
    }
}

/// Merge a rendered section into an existing changelog, or start a new one.
///
/// Does not de-duplicate: merging the same section twice inserts it twice.
pub fn merge(existing: Option<&str>, section: &str, marker: &str) -> Result<String> {
    let mut doc = match existing {
        Some(text) => ChangelogDocument::parse(text, marker)?,
        None => ChangelogDocument::new(marker),
    };
    doc.insert_section(section);
    Ok(doc.render())
}
