use crate::error::{GitPartsError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Mock repository for testing without actual git operations
///
/// Holds a linear history (oldest first) and records every branch update,
/// push and checkout so tests can assert on the sequence of operations.
pub struct MockRepository {
    /// Linear history, oldest first
    commits: Vec<CommitInfo>,
    branches: RefCell<HashMap<String, Oid>>,
    pushes: RefCell<Vec<(String, String)>>,
    checkouts: RefCell<Vec<Oid>>,
    failing_pushes: HashSet<String>,
    failing_checkouts: HashSet<Oid>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            branches: RefCell::new(HashMap::new()),
            pushes: RefCell::new(Vec::new()),
            checkouts: RefCell::new(Vec::new()),
            failing_pushes: HashSet::new(),
            failing_checkouts: HashSet::new(),
        }
    }

    /// Builds a linear history from subjects given oldest first.
    ///
    /// Commit `n` (zero-based) gets the OID made of bytes `n + 1`.
    pub fn with_subjects(subjects: &[&str]) -> Self {
        let mut repo = MockRepository::new();
        for subject in subjects {
            repo.add_commit(subject);
        }
        repo
    }

    /// Appends a commit on top of the history and returns its OID
    pub fn add_commit(&mut self, subject: &str) -> Oid {
        let byte = u8::try_from(self.commits.len() + 1).unwrap_or(u8::MAX);
        let oid = Oid::from_bytes(&[byte; 20]).unwrap_or_else(|_| Oid::zero());
        self.commits.push(CommitInfo::new(oid, subject));
        oid
    }

    /// OID of the `index`-th commit, oldest first
    pub fn oid(&self, index: usize) -> Oid {
        self.commits[index].oid
    }

    /// Set a local branch
    pub fn set_branch(&self, name: impl Into<String>, oid: Oid) {
        self.branches.borrow_mut().insert(name.into(), oid);
    }

    /// Makes every push of `branch` fail
    pub fn fail_push(&mut self, branch: impl Into<String>) {
        self.failing_pushes.insert(branch.into());
    }

    /// Makes checking out `oid` fail
    pub fn fail_checkout(&mut self, oid: Oid) {
        self.failing_checkouts.insert(oid);
    }

    pub fn branch(&self, name: &str) -> Option<Oid> {
        self.branches.borrow().get(name).copied()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.borrow().len()
    }

    /// `(remote, branch)` pairs in push order
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.borrow().clone()
    }

    /// Checked out commits in order
    pub fn checkouts(&self) -> Vec<Oid> {
        self.checkouts.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn history(&self) -> Result<Vec<CommitInfo>> {
        Ok(self.commits.iter().rev().cloned().collect())
    }

    fn resolve_branch(&self, name: &str) -> Result<Option<Oid>> {
        Ok(self.branch(name))
    }

    fn parent_of(&self, oid: Oid) -> Result<Option<Oid>> {
        let index = self
            .commits
            .iter()
            .position(|c| c.oid == oid)
            .ok_or_else(|| GitPartsError::Git(git2::Error::from_str("commit not found")))?;

        Ok(index.checked_sub(1).map(|parent| self.commits[parent].oid))
    }

    fn force_branch(&self, name: &str, oid: Oid) -> Result<()> {
        self.set_branch(name, oid);
        Ok(())
    }

    fn force_push_branch(&self, remote: &str, name: &str) -> Result<()> {
        if self.failing_pushes.contains(name) {
            return Err(GitPartsError::remote(format!(
                "Failed to push '{}' to '{}'",
                name, remote
            )));
        }

        self.pushes
            .borrow_mut()
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }

    fn checkout_detached(&self, oid: Oid) -> Result<()> {
        if self.failing_checkouts.contains(&oid) {
            return Err(GitPartsError::checkout(format!("{}: conflict", oid)));
        }

        self.checkouts.borrow_mut().push(oid);
        Ok(())
    }

    fn workdir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_history_is_newest_first() {
        let repo = MockRepository::with_subjects(&["first", "second", "third"]);
        let subjects: Vec<String> = repo
            .history()
            .unwrap()
            .into_iter()
            .map(|c| c.subject)
            .collect();

        assert_eq!(subjects, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_mock_parent_of() {
        let repo = MockRepository::with_subjects(&["first", "second"]);

        assert_eq!(repo.parent_of(repo.oid(1)).unwrap(), Some(repo.oid(0)));
        assert_eq!(repo.parent_of(repo.oid(0)).unwrap(), None);
    }

    #[test]
    fn test_mock_records_operations() {
        let repo = MockRepository::with_subjects(&["first"]);
        let oid = repo.oid(0);

        repo.force_branch("part-first", oid).unwrap();
        repo.force_push_branch("origin", "part-first").unwrap();
        repo.checkout_detached(oid).unwrap();

        assert_eq!(repo.resolve_branch("part-first").unwrap(), Some(oid));
        assert_eq!(
            repo.pushes(),
            vec![("origin".to_string(), "part-first".to_string())]
        );
        assert_eq!(repo.checkouts(), vec![oid]);
    }

    #[test]
    fn test_mock_injected_failures() {
        let mut repo = MockRepository::with_subjects(&["first"]);
        let oid = repo.oid(0);
        repo.fail_push("part-first");
        repo.fail_checkout(oid);

        assert!(repo.force_push_branch("origin", "part-first").is_err());
        assert!(repo.checkout_detached(oid).is_err());
        assert!(repo.pushes().is_empty());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.history().unwrap().is_empty());
    }
}
