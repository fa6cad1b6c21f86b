//! Tag operations

use tracing::{debug, info, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;
use herald_core::error::GitError;

impl GitRepo {
    /// Get all tags
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(commit) = self.repo.find_commit(oid) {
                tags.push(TagInfo::new(&name, commit.id().to_string()));
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag
                let mut tag_info = TagInfo::new(&name, tag.target_id().to_string());
                if let Some(msg) = tag.message() {
                    tag_info = tag_info.with_message(msg);
                }
                tags.push(tag_info);
            }

            true
        })?;

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Find the highest release tag
    ///
    /// Only tags named `{prefix}{version}` whose version `parse` accepts are
    /// considered.
    #[instrument(skip(self, parse))]
    pub fn find_latest_tag<V, F>(&self, prefix: &str, parse: F) -> Result<Option<(TagInfo, V)>>
    where
        V: PartialOrd,
        F: Fn(&str) -> Option<V>,
    {
        let mut latest: Option<(TagInfo, V)> = None;

        for tag in self.tags()? {
            let Some(version) = tag.version_str(prefix).and_then(&parse) else {
                continue;
            };

            let is_newer = latest
                .as_ref()
                .map_or(true, |(_, current)| version > *current);
            if is_newer {
                latest = Some((tag, version));
            }
        }

        debug!(latest = ?latest.as_ref().map(|(t, _)| &t.name), "found latest tag");
        Ok(latest)
    }

    /// Find a specific tag by name
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        let tag_ref = format!("refs/tags/{}", name);

        match self.repo.find_reference(&tag_ref) {
            Ok(reference) => {
                let target = reference.peel_to_commit()?;
                Ok(Some(TagInfo::new(name, target.id().to_string())))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Create an annotated tag on HEAD
    #[instrument(skip(self, message))]
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        if self.find_tag(name)?.is_some() {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.head_commit()?;
        let sig = self.repo.signature()?;
        self.repo.tag(name, head.as_object(), &sig, message, false)?;

        info!(name, "created tag");
        Ok(TagInfo::new(name, head.id().to_string()).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo_with_tags(tags: &[&str]) -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.config().unwrap().set_str("user.name", "Test").unwrap();
        repo.config()
            .unwrap()
            .set_str("user.email", "test@example.com")
            .unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("file.txt"), "content").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let commit = repo.find_commit(oid).unwrap();
        for tag in tags {
            repo.tag_lightweight(tag, commit.as_object(), false).unwrap();
        }

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    fn parse_triple(s: &str) -> Option<(u64, u64, u64)> {
        let mut parts = s.split('.').map(|p| p.parse().ok());
        Some((parts.next()??, parts.next()??, parts.next()??))
    }

    #[test]
    fn test_list_tags() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let tags = repo.tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
    }

    #[test]
    fn test_find_tag() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        assert!(repo.find_tag("v1.0.0").unwrap().is_some());
        assert!(repo.find_tag("v2.0.0").unwrap().is_none());
    }

    #[test]
    fn test_find_latest_tag_orders_by_version() {
        let (_temp, repo) =
            setup_repo_with_tags(&["v1.2.0", "v1.10.0", "v1.9.3", "nightly", "release-9.0.0"]);

        let (tag, version) = repo.find_latest_tag("v", parse_triple).unwrap().unwrap();
        assert_eq!(tag.name, "v1.10.0");
        assert_eq!(version, (1, 10, 0));
    }

    #[test]
    fn test_find_latest_tag_none() {
        let (_temp, repo) = setup_repo_with_tags(&["nightly"]);
        assert!(repo.find_latest_tag("v", parse_triple).unwrap().is_none());
    }

    #[test]
    fn test_create_tag() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let tag = repo.create_tag("v2.0.0", "Release 2.0.0").unwrap();
        assert_eq!(tag.name, "v2.0.0");
        assert!(repo.find_tag("v2.0.0").unwrap().is_some());
    }

    #[test]
    fn test_tag_already_exists() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let result = repo.create_tag("v1.0.0", "again");
        assert!(matches!(result, Err(GitError::TagExists(_))));
    }
}
