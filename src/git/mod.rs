//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the history reads the
//! release pipeline needs, so the pipeline can run against a real repository
//! or an in-memory one in tests.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A scripted history for testing
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! let tags = repo.tags_newest_first()?;
//! let commits = repo.commits_in_range(tags.first().map(String::as_str), "HEAD")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::ReleaseRange;
use crate::error::Result;

/// One commit as read from history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message: header line, then the body
    pub message: String,
}

impl CommitInfo {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        CommitInfo {
            hash: hash.into(),
            message: message.into(),
        }
    }

    /// First line of the message
    pub fn header(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Message without trailing whitespace, as fed to bump classification
    pub fn block(&self) -> &str {
        self.message.trim_end()
    }
}

/// Read access to release history.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// underlying errors (like `git2::Error`) to [crate::error::ReleaseError].
pub trait Repository {
    /// All tag names, newest first by creation time
    fn tags_newest_first(&self) -> Result<Vec<String>>;

    /// Commits reachable from `to` but not from `from`, newest first.
    ///
    /// `from = None` means everything reachable from `to`.
    /// Both are revision names such as a tag or `HEAD`.
    fn commits_in_range(&self, from: Option<&str>, to: &str) -> Result<Vec<CommitInfo>>;

    /// URL of a configured remote, if it exists
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// The latest tag and the one before it
    fn release_range(&self) -> Result<ReleaseRange> {
        Ok(ReleaseRange::from_newest_first(&self.tags_newest_first()?))
    }
}

/// Turn a remote URL into the repository's web URL.
///
/// `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git` and
/// `https://host/owner/repo.git` all map to `https://host/owner/repo`.
pub fn web_url_from_remote(remote: &str) -> Option<String> {
    let remote = remote.trim();
    let (host, path) = if let Some(rest) = remote
        .strip_prefix("https://")
        .or_else(|| remote.strip_prefix("http://"))
        .or_else(|| remote.strip_prefix("ssh://"))
        .or_else(|| remote.strip_prefix("git://"))
    {
        rest.split_once('/')?
    } else {
        remote.split_once(':')?
    };

    let host = host.rsplit('@').next()?;
    let host = host.split(':').next()?;
    let path = path.trim_end_matches('/').trim_end_matches(".git");

    if host.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!("https://{}/{}", host, path))
}
