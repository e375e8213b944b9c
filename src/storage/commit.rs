//! Snapshotting the data directory after a save
//!
//! Every successful store save hands a message to a [`Committer`]. The git
//! implementation stages the whole data directory and commits when anything
//! changed. A failing commit never fails the save; the status is returned so
//! the caller can surface it as a warning.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};

/// Outcome of a commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    /// A new snapshot was recorded
    Committed,
    /// Nothing changed, or committing is disabled
    Clean,
    /// The snapshot could not be recorded
    Failed(String),
}

impl CommitStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Text for a user-facing warning, if the commit failed
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Failed(reason) => Some(format!("Changes saved but not committed: {}", reason)),
            _ => None,
        }
    }
}

/// Records a snapshot of the data directory
pub trait Committer {
    fn commit(&self, message: &str) -> CommitStatus;
}

/// Committer that does nothing (auto-commit disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCommitter;

impl Committer for NoopCommitter {
    fn commit(&self, _message: &str) -> CommitStatus {
        CommitStatus::Clean
    }
}

/// Commits the data directory with the `git` executable
#[derive(Debug, Clone)]
pub struct GitCommitter {
    repo_dir: PathBuf,
}

impl GitCommitter {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Initialize a repository in the data directory if there is none
    pub fn ensure_repository(&self) -> LedgerResult<()> {
        std::fs::create_dir_all(&self.repo_dir)?;

        if self.is_repository() {
            return Ok(());
        }

        info!(dir = %self.repo_dir.display(), "Creating git repository");
        self.git(&["init", "--quiet"])
            .map_err(|e| LedgerError::Storage(format!("git init failed: {}", e)))?;
        Ok(())
    }

    fn is_repository(&self) -> bool {
        self.repo_dir.join(".git").exists()
    }

    fn git(&self, args: &[&str]) -> Result<Output, String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| format!("could not run git: {}", e))?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

impl Committer for GitCommitter {
    fn commit(&self, message: &str) -> CommitStatus {
        if let Err(e) = self.ensure_repository() {
            return CommitStatus::Failed(e.to_string());
        }

        if let Err(e) = self.git(&["add", "--all", "."]) {
            return CommitStatus::Failed(format!("git add failed: {}", e));
        }

        match self.git(&["status", "--porcelain"]) {
            Ok(output) if output.stdout.is_empty() => {
                debug!("Working tree clean, nothing to commit");
                return CommitStatus::Clean;
            }
            Ok(_) => {}
            Err(e) => return CommitStatus::Failed(format!("git status failed: {}", e)),
        }

        match self.git(&["commit", "--quiet", "-m", message]) {
            Ok(_) => {
                info!(commit_message = message, "Committed changes");
                CommitStatus::Committed
            }
            Err(e) => CommitStatus::Failed(format!("git commit failed: {}", e)),
        }
    }
}

/// Committer that remembers every message, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingCommitter {
    messages: std::cell::RefCell<Vec<String>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingCommitter {
    pub(crate) fn failing() -> Self {
        Self {
            messages: Default::default(),
            fail: true,
        }
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

#[cfg(test)]
impl Committer for RecordingCommitter {
    fn commit(&self, message: &str) -> CommitStatus {
        self.messages.borrow_mut().push(message.to_string());
        if self.fail {
            CommitStatus::Failed("disk on fire".into())
        } else {
            CommitStatus::Committed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_noop_is_clean() {
        assert_eq!(NoopCommitter.commit("anything"), CommitStatus::Clean);
    }

    #[test]
    fn test_status_warning() {
        assert!(CommitStatus::Committed.warning().is_none());
        assert!(CommitStatus::Clean.warning().is_none());

        let failed = CommitStatus::Failed("boom".into());
        assert!(failed.is_failed());
        assert!(failed.warning().unwrap().contains("boom"));
    }

    #[test]
    fn test_new_does_not_touch_disk() {
        let temp_dir = TempDir::new().unwrap();
        let repo_dir = temp_dir.path().join("data");
        let committer = GitCommitter::new(&repo_dir);

        assert_eq!(committer.repo_dir(), repo_dir.as_path());
        assert!(!repo_dir.exists());
    }

    #[test]
    fn test_commit_fails_softly_when_repository_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("data");
        std::fs::write(&not_a_dir, "plain file").unwrap();

        let status = GitCommitter::new(&not_a_dir).commit("msg");
        assert!(status.is_failed());
    }

    #[test]
    fn test_recording_committer() {
        let committer = RecordingCommitter::default();
        assert_eq!(committer.commit("first"), CommitStatus::Committed);
        assert_eq!(committer.messages(), vec!["first".to_string()]);

        let failing = RecordingCommitter::failing();
        assert!(failing.commit("second").is_failed());
    }
}
