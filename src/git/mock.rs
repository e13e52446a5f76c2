use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;

/// Linear in-memory history for testing without actual git operations
pub struct MockRepository {
    /// Oldest first
    commits: Vec<CommitInfo>,
    /// Tag name -> index into `commits`, in creation order
    tags: Vec<(String, usize)>,
    remotes: HashMap<String, String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            remotes: HashMap::new(),
        }
    }

    /// Append a commit on top of the current head
    pub fn commit(&mut self, message: impl Into<String>) -> &mut Self {
        let hash = format!("{:040x}", self.commits.len() + 1);
        self.commits.push(CommitInfo::new(hash, message));
        self
    }

    /// Tag the current head. Later tags count as newer.
    pub fn tag(&mut self, name: impl Into<String>) -> &mut Self {
        let head = self.commits.len().saturating_sub(1);
        self.tags.push((name.into(), head));
        self
    }

    /// Register a remote URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.remotes.insert(name.into(), url.into());
        self
    }

    /// Index of the commit a revision names; `None` for an empty history
    fn resolve(&self, revision: &str) -> Result<Option<usize>> {
        if revision == "HEAD" {
            return Ok(self.commits.len().checked_sub(1));
        }
        if let Some((_, index)) = self.tags.iter().find(|(name, _)| name == revision) {
            return Ok(Some(*index));
        }
        if let Some(index) = self.commits.iter().position(|c| c.hash == revision) {
            return Ok(Some(index));
        }
        Err(ReleaseError::Git(git2::Error::from_str(&format!(
            "revspec '{}' not found",
            revision
        ))))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tags_newest_first(&self) -> Result<Vec<String>> {
        Ok(self.tags.iter().rev().map(|(name, _)| name.clone()).collect())
    }

    fn commits_in_range(&self, from: Option<&str>, to: &str) -> Result<Vec<CommitInfo>> {
        let end = match self.resolve(to)? {
            Some(index) => index + 1,
            None => return Ok(Vec::new()),
        };
        let start = match from {
            Some(from) => self.resolve(from)?.map_or(0, |index| index + 1),
            None => 0,
        };

        Ok(self.commits[start.min(end)..end].iter().rev().cloned().collect())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }
}
