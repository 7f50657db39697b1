//! Commit checker: build-verify every step of the history.
//!
//! Commits are visited oldest first, skipping the very first one (usually an
//! empty scaffold). Each is checked out with HEAD detached and the
//! verification command runs in the working tree. The first failing
//! checkout or command stops the run and leaves the tree at that commit.

use std::path::Path;
use std::process::Command;

use crate::config::CheckConfig;
use crate::error::{GitPartsError, Result};
use crate::git::{CommitInfo, Repository};
use crate::ui;

/// Runs the verification step for one checked-out commit.
pub trait Verifier {
    /// `Ok(())` when the commit passes.
    fn verify(&self, workdir: &Path, commit: &CommitInfo) -> Result<()>;
}

/// Verifier that runs an external program in the working tree
///
/// The child inherits stdin, stdout and stderr, so build output streams
/// straight to the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandVerifier {
    program: String,
    args: Vec<String>,
}

impl CommandVerifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandVerifier {
            program: program.into(),
            args,
        }
    }

    /// Builds a verifier from `[program, args...]`.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| GitPartsError::config("check command must not be empty"))?;

        if program.trim().is_empty() {
            return Err(GitPartsError::config("check command must not be empty"));
        }

        Ok(CommandVerifier::new(program.clone(), args.to_vec()))
    }

    /// Command line as typed in a shell, for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Verifier for CommandVerifier {
    fn verify(&self, workdir: &Path, commit: &CommitInfo) -> Result<()> {
        tracing::debug!(command = %self.display(), commit = %commit.short_hash, "running check");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workdir)
            .status()
            .map_err(|e| {
                GitPartsError::command(format!("Failed to run '{}': {}", self.display(), e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(GitPartsError::CheckFailed {
                commit: commit.short_hash.clone(),
                subject: commit.subject.clone(),
                code: status.code(),
            })
        }
    }
}

/// Settings of a check run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOptions {
    /// Leave out the oldest commit
    pub skip_first: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions { skip_first: true }
    }
}

impl From<&CheckConfig> for CheckOptions {
    fn from(config: &CheckConfig) -> Self {
        CheckOptions {
            skip_first: config.skip_first,
        }
    }
}

/// Outcome of a successful check run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckReport {
    /// Commits that were checked out and verified, in visiting order
    pub visited: Vec<CommitInfo>,
    /// Commits reachable from HEAD when the run started
    pub total_commits: usize,
}

impl CheckReport {
    /// Last visited commit, where HEAD is left detached
    pub fn last(&self) -> Option<&CommitInfo> {
        self.visited.last()
    }
}

/// Commits to visit, oldest first.
pub fn commits_to_check<R: Repository>(
    repo: &R,
    options: &CheckOptions,
) -> Result<(Vec<CommitInfo>, usize)> {
    let mut commits = repo.history()?;
    let total = commits.len();
    commits.reverse();

    if options.skip_first && !commits.is_empty() {
        commits.remove(0);
    }

    Ok((commits, total))
}

/// Checks out and verifies every commit after the oldest one.
///
/// The commit list is read once up front, so moving HEAD during the run does
/// not change what gets visited.
///
/// # Returns
/// * `Ok(CheckReport)` - Every commit passed
/// * `Err` - The first checkout or verification failure; later commits are not visited
pub fn run_check<R: Repository, V: Verifier>(
    repo: &R,
    verifier: &V,
    options: &CheckOptions,
) -> Result<CheckReport> {
    let (commits, total_commits) = commits_to_check(repo, options)?;
    let workdir = repo.workdir()?;
    let mut report = CheckReport {
        visited: Vec::with_capacity(commits.len()),
        total_commits,
    };

    let count = commits.len();
    for (index, commit) in commits.into_iter().enumerate() {
        ui::display_check_progress(index + 1, count, &commit);

        repo.checkout_detached(commit.oid)?;
        tracing::debug!(commit = %commit.short_hash, "checked out");

        verifier.verify(&workdir, &commit)?;
        tracing::info!(commit = %commit.short_hash, "check passed");

        report.visited.push(commit);
    }

    Ok(report)
}
