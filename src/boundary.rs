use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// They are reported to the user and never stop the run on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The repository has no release tags yet
    NoTags,
    /// No commits between the last tag and the target revision
    NoNewCommits { since: Option<String> },
    /// Commits exist but none of them asks for a version bump
    NoQualifyingCommits { commit_count: usize },
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String },
    /// Commit headers that do not follow the conventional format
    SkippedCommits { count: usize },
    /// No repository URL configured or derivable; links are left out
    NoRepositoryUrl { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoTags => write!(f, "No release tags found in the repository"),
            BoundaryWarning::NoNewCommits { since } => match since {
                Some(tag) => write!(f, "No new commits since tag '{}'", tag),
                None => write!(f, "No commits found"),
            },
            BoundaryWarning::NoQualifyingCommits { commit_count } => write!(
                f,
                "None of the {} commit(s) requires a version bump",
                commit_count
            ),
            BoundaryWarning::UnparsableTag { tag } => write!(
                f,
                "Cannot parse tag '{}' as a version; skipping the monotonicity check",
                tag
            ),
            BoundaryWarning::SkippedCommits { count } => write!(
                f,
                "Skipped {} commit(s) that are not conventional commits",
                count
            ),
            BoundaryWarning::NoRepositoryUrl { remote } => write!(
                f,
                "No repository URL configured and remote '{}' gave none; links are omitted",
                remote
            ),
        }
    }
}
