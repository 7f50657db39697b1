use thiserror::Error;

/// Unified error type for git-parts operations
#[derive(Error, Debug)]
pub enum GitPartsError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid branch name: {0}")]
    BranchName(String),

    #[error("Branch name collision: {0}")]
    Collision(String),

    #[error("Marker error: {0}")]
    Marker(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Checkout failed: {0}")]
    Checkout(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("Check failed at commit {commit} ({subject}): {}", describe_exit(.code))]
    CheckFailed {
        commit: String,
        subject: String,
        code: Option<i32>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("command exited with code {}", code),
        None => "command terminated by signal".to_string(),
    }
}

/// Convenience type alias for Results in git-parts
pub type Result<T> = std::result::Result<T, GitPartsError>;

impl GitPartsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitPartsError::Config(msg.into())
    }

    /// Create a branch-name error with context
    pub fn branch_name(msg: impl Into<String>) -> Self {
        GitPartsError::BranchName(msg.into())
    }

    pub fn collision(msg: impl Into<String>) -> Self {
        GitPartsError::Collision(msg.into())
    }

    pub fn marker(msg: impl Into<String>) -> Self {
        GitPartsError::Marker(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitPartsError::Remote(msg.into())
    }

    pub fn checkout(msg: impl Into<String>) -> Self {
        GitPartsError::Checkout(msg.into())
    }

    pub fn command(msg: impl Into<String>) -> Self {
        GitPartsError::Command(msg.into())
    }

    /// Process exit code the binary should use for this error.
    ///
    /// A failed verification command propagates its own exit code; everything
    /// else (including a command killed by a signal) exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitPartsError::CheckFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
