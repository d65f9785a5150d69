//! Tag sources
//!
//! The validator only needs a list of tag names. Production reads them from a
//! Git repository; tests and piped input use a literal list.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, warn};

use crate::error::Result;

/// Anything that can list the tags to validate
pub trait TagSource {
    fn list_tags(&self) -> Result<Vec<String>>;
}

/// Tags of a local Git repository
#[derive(Debug, Clone)]
pub struct GitTagSource {
    path: PathBuf,
}

impl GitTagSource {
    /// Source for the repository containing `path` (searched upwards)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TagSource for GitTagSource {
    /// Tag names sorted byte-wise, the same order `git tag --list` prints
    fn list_tags(&self) -> Result<Vec<String>> {
        let repo = Repository::discover(&self.path)?;
        let names = repo.tag_names(None)?;

        let mut tags: Vec<String> = names.iter().flatten().map(String::from).collect();
        tags.sort();

        if tags.is_empty() {
            warn!(path = %self.path.display(), "repository has no tags");
        } else {
            debug!(count = tags.len(), "listed repository tags");
        }

        Ok(tags)
    }
}

/// A fixed list of tags
#[derive(Debug, Clone, Default)]
pub struct StaticTagSource {
    tags: Vec<String>,
}

impl StaticTagSource {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }

    /// Parse whitespace-delimited output such as that of `git tag --list`
    pub fn from_listing(listing: &str) -> Self {
        Self {
            tags: listing.split_whitespace().map(String::from).collect(),
        }
    }
}

impl TagSource for StaticTagSource {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::tempdir;

    #[test]
    fn test_from_listing() {
        let source = StaticTagSource::from_listing("0.0.0\n0.0.1 0.1.0\r\n\n0.1.1\n");
        assert_eq!(
            source.list_tags().unwrap(),
            vec!["0.0.0", "0.0.1", "0.1.0", "0.1.1"]
        );
    }

    #[test]
    fn test_literal_list() {
        let source = StaticTagSource::new(vec!["1.0.0".to_string(), "0.0.0".to_string()]);
        assert_eq!(source.list_tags().unwrap(), vec!["1.0.0", "0.0.0"]);
        assert!(StaticTagSource::default().list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_listing_keeps_order_and_duplicates() {
        let source = StaticTagSource::from_listing("1.0.0 0.0.0 1.0.0");
        assert_eq!(source.list_tags().unwrap(), vec!["1.0.0", "0.0.0", "1.0.0"]);
    }

    #[test]
    fn test_git_source_lists_sorted_tags() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let sig = Signature::now("Tagger", "tagger@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit_id = repo
            .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
        let commit = repo.find_object(commit_id, None).unwrap();

        for name in ["0.1.0", "0.0.1", "0.0.0"] {
            repo.tag_lightweight(name, &commit, false).unwrap();
        }

        let tags = GitTagSource::new(dir.path()).list_tags().unwrap();
        assert_eq!(tags, vec!["0.0.0", "0.0.1", "0.1.0"]);
    }

    #[test]
    fn test_git_source_without_repository() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(GitTagSource::new(missing).list_tags().is_err());
    }
}
