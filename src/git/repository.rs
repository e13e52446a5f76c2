use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Sort};
use std::cmp::Reverse;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Creation time of a tag: tagger time for annotated tags, commit time otherwise
    fn tag_time(&self, name: &str) -> Result<i64> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
        let object = reference.peel(ObjectType::Any)?;

        if let Ok(tag) = reference.peel_to_tag() {
            if let Some(tagger) = tag.tagger() {
                return Ok(tagger.when().seconds());
            }
        }

        let commit = object.peel_to_commit().map_err(|e| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "tag '{}' does not point at a commit: {}",
                name, e
            )))
        })?;
        Ok(commit.time().seconds())
    }

    fn resolve_commit(&self, revision: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(revision)?;
        Ok(object.peel_to_commit()?.id())
    }
}

impl super::Repository for Git2Repository {
    fn tags_newest_first(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let time = self.tag_time(name)?;
            tags.push((time, Version::from_tag(name), name.to_string()));
        }

        tags.sort_by_key(|(time, version, _)| Reverse((*time, *version)));
        Ok(tags.into_iter().map(|(_, _, name)| name).collect())
    }

    fn commits_in_range(&self, from: Option<&str>, to: &str) -> Result<Vec<CommitInfo>> {
        if to == "HEAD" && self.repo.head().is_err_and(|e| e.code() == ErrorCode::UnbornBranch) {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.resolve_commit(to)?)?;
        if let Some(from) = from {
            revwalk.hide(self.resolve_commit(from)?)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message,
            });
        }

        Ok(commits)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
