//! Commit history operations

use std::path::Path;

use chrono::{TimeZone, Utc};
use git2::{Oid, Sort};
use tracing::{debug, info, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;

impl GitRepo {
    /// Commits reachable from HEAD but not from `since`, newest first
    pub fn commits_since_oid(&self, since: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;
        if let Some(since) = since {
            revwalk.hide(since)?;
        }

        let mut commits = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(commit_to_info(&commit));
        }

        Ok(commits)
    }

    /// Commits since a tag, or the whole history when there is no tag yet
    #[instrument(skip(self))]
    pub fn commits_since_tag(&self, tag_name: Option<&str>) -> Result<Vec<CommitInfo>> {
        let since = match tag_name {
            Some(name) => {
                let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
                Some(reference.peel_to_commit()?.id())
            }
            None => None,
        };

        let commits = self.commits_since_oid(since)?;
        debug!(count = commits.len(), "collected commits");
        Ok(commits)
    }

    /// Stage `paths` (relative to the repository root) and commit them on HEAD
    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub fn commit_files(&self, paths: &[&Path], message: &str) -> Result<CommitInfo> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let sig = self.repo.signature()?;
        let parent = self.head_commit()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;
        let commit = self.repo.find_commit(oid)?;

        info!(hash = %oid, "created commit");
        Ok(commit_to_info(&commit))
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let author = commit.author();

    let message = commit.summary().unwrap_or("(no message)").to_string();

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(
        commit.id().to_string(),
        message,
        author.name().unwrap_or("Unknown"),
        timestamp,
    )
    .with_body(commit.body().unwrap_or_default())
}
