use std::fmt;

/// Warnings that occur at the edges of a repository's history.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// HEAD has no commits yet
    EmptyHistory,
    /// History is too short for anything to be checked
    NothingToCheck { total_commits: usize },
    /// Branches were created locally but not pushed
    PushSkipped { remote: String },
    /// The checker left HEAD detached at the last visited commit
    DetachedHead { commit_hash: String },
}

fn short_hash(hash: &str) -> &str {
    if hash.len() > 7 {
        &hash[..7]
    } else {
        hash
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::EmptyHistory => write!(f, "No commits found on HEAD"),
            BoundaryWarning::NothingToCheck { total_commits } => write!(
                f,
                "Nothing to check: history has {} commit(s)",
                total_commits
            ),
            BoundaryWarning::PushSkipped { remote } => write!(
                f,
                "Branches were created locally only; nothing was pushed to '{}'",
                remote
            ),
            BoundaryWarning::DetachedHead { commit_hash } => write!(
                f,
                "HEAD is left detached at {}",
                short_hash(commit_hash)
            ),
        }
    }
}
