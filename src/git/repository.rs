use crate::error::{GitPartsError, Result};
use crate::git::CommitInfo;
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};

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

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

/// Builds remote callbacks that authenticate through SSH keys in `~/.ssh`,
/// the SSH agent, or git's default credential helpers, and turn any rejected
/// ref update into an error.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();

    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }

            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn history(&self) -> Result<Vec<CommitInfo>> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let subject = commit.summary().unwrap_or_default().to_string();
            commits.push(CommitInfo::new(oid, subject));
        }

        Ok(commits)
    }

    fn resolve_branch(&self, name: &str) -> Result<Option<Oid>> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(branch) => {
                let commit = branch.into_reference().peel_to_commit()?;
                Ok(Some(commit.id()))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parent_of(&self, oid: Oid) -> Result<Option<Oid>> {
        let commit = self.repo.find_commit(oid)?;
        if commit.parent_count() == 0 {
            return Ok(None);
        }

        Ok(Some(commit.parent_id(0)?))
    }

    fn force_branch(&self, name: &str, oid: Oid) -> Result<()> {
        let commit = self.repo.find_commit(oid)?;
        self.repo
            .branch(name, &commit, true)
            .map_err(|e| match e.code() {
                ErrorCode::InvalidSpec => GitPartsError::branch_name(format!(
                    "Cannot create branch '{}': {}",
                    name, e
                )),
                _ => GitPartsError::Git(e),
            })?;

        Ok(())
    }

    fn force_push_branch(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|_| GitPartsError::remote(format!("No remote named '{}' found", remote)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        let refspec = format!("+refs/heads/{0}:refs/heads/{0}", name);

        match remote_handle.push(&[refspec.as_str()], Some(&mut push_options)) {
            Ok(()) => Ok(()),
            Err(e) if e.class() == git2::ErrorClass::Net => Err(GitPartsError::remote(format!(
                "Network error pushing '{}' to '{}': {}",
                name, remote, e
            ))),
            Err(e) => Err(GitPartsError::remote(format!(
                "Failed to push '{}' to '{}': {}",
                name, remote, e
            ))),
        }
    }

    fn checkout_detached(&self, oid: Oid) -> Result<()> {
        let commit = self.repo.find_commit(oid)?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();

        self.repo
            .checkout_tree(commit.as_object(), Some(&mut checkout))
            .map_err(|e| GitPartsError::checkout(format!("{}: {}", oid, e)))?;
        self.repo.set_head_detached(oid)?;

        Ok(())
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitPartsError::checkout("repository has no working tree"))
    }
}
