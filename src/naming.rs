//! Branch names derived from commit subjects.
//!
//! A tutorial commit subject looks like `1.1: Create a window`. Its first
//! whitespace-delimited token with colons removed (`1.1`) becomes the part
//! label, and the branch is the configured prefix followed by that label
//! (`part-1.1`).

use crate::error::{GitPartsError, Result};

/// Returns the part label of a commit subject.
///
/// Only literal `:` characters are removed; `None` when the subject has no
/// token or the token is made only of colons.
pub fn subject_token(subject: &str) -> Option<String> {
    let token: String = subject
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != ':')
        .collect();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Derives the branch name for a commit subject and checks that git accepts it.
pub fn branch_name(prefix: &str, subject: &str) -> Result<String> {
    let token = subject_token(subject).ok_or_else(|| {
        GitPartsError::branch_name(format!("no part label in subject '{}'", subject))
    })?;

    let name = format!("{}{}", prefix, token);
    validate_branch_name(&name)?;
    Ok(name)
}

/// Name of the `i`-th start marker, e.g. `part-3.0`.
pub fn marker_name(prefix: &str, index: u32) -> String {
    format!("{}{}.0", prefix, index)
}

/// Name of the branch a start marker is placed one commit before, e.g. `part-3.1`.
pub fn marker_anchor(prefix: &str, index: u32) -> String {
    format!("{}{}.1", prefix, index)
}

/// Fails unless `refs/heads/<name>` is a legal reference name.
pub fn validate_branch_name(name: &str) -> Result<()> {
    if git2::Reference::is_valid_name(&format!("refs/heads/{}", name)) {
        Ok(())
    } else {
        Err(GitPartsError::branch_name(format!(
            "'{}' is not a valid ref name",
            name
        )))
    }
}
