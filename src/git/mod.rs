//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of git
//! operations git-parts needs, with a real implementation backed by `git2`
//! and a mock implementation for testing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use git_parts::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_parts::Result<()> {
//! for commit in repo.history()? {
//!     println!("{} {}", commit.short_hash, commit.subject);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::PathBuf;

/// Commit information read from the history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub oid: Oid,
    /// First seven hex digits of the commit id
    pub short_hash: String,
    /// First line of the commit message
    pub subject: String,
}

impl CommitInfo {
    pub fn new(oid: Oid, subject: impl Into<String>) -> Self {
        let hash = oid.to_string();
        CommitInfo {
            oid,
            short_hash: hash[..7].to_string(),
            subject: subject.into(),
        }
    }
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]; implementations map
/// `git2::Error` and friends to the matching [crate::error::GitPartsError]
/// variants.
pub trait Repository {
    /// Commits reachable from HEAD, newest first.
    ///
    /// An unborn HEAD (no commits yet) yields an empty list.
    fn history(&self) -> Result<Vec<CommitInfo>>;

    /// Commit a local branch points at, `None` if the branch doesn't exist.
    fn resolve_branch(&self, name: &str) -> Result<Option<Oid>>;

    /// First parent of a commit, `None` for a root commit.
    fn parent_of(&self, oid: Oid) -> Result<Option<Oid>>;

    /// Creates the local branch at `oid`, overwriting it if it exists.
    fn force_branch(&self, name: &str, oid: Oid) -> Result<()>;

    /// Force-pushes a local branch to the branch of the same name on `remote`.
    fn force_push_branch(&self, remote: &str, name: &str) -> Result<()>;

    /// Checks out the tree of `oid` and detaches HEAD at it.
    ///
    /// Fails instead of overwriting local modifications.
    fn checkout_detached(&self, oid: Oid) -> Result<()>;

    /// Root of the working tree.
    fn workdir(&self) -> Result<PathBuf>;
}
