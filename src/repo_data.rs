//! Commit data as seen by views: an ordered, possibly still-loading list per branch.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Unknown branch: {0}")]
    UnknownBranch(BranchId),
    #[error("Git command failed: {0}")]
    Git(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Value-comparable branch identifier: the canonical ref name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(String);

impl BranchId {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the `refs/heads/` or `refs/remotes/` prefix.
    pub fn short_name(&self) -> &str {
        self.0
            .strip_prefix("refs/heads/")
            .or_else(|| self.0.strip_prefix("refs/remotes/"))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub short_id: String,
    /// Author timestamp, already formatted for display.
    pub when: String,
    pub author: String,
    pub summary: String,
}

/// Point-in-time view of a branch's loading progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSetState {
    pub loading: bool,
    pub commit_count: usize,
}

/// Invoked once when loading for a branch finishes.
pub type OnCommitsLoaded = Box<dyn FnOnce(&BranchId) + Send + Sync + 'static>;

/// Source of commit data for views.
///
/// Implementations must never call `on_loaded` from inside `load_commits` on
/// the caller's thread; callers hold locks the callback will need.
pub trait RepoData: Send + Sync {
    /// Up to `max_count` commits starting at ordinal `start_index`.
    fn commits(
        &self,
        branch: &BranchId,
        start_index: usize,
        max_count: usize,
    ) -> Result<Box<dyn Iterator<Item = Commit> + '_>, RepoError>;

    /// Begin or continue loading `branch`, calling `on_loaded` once it completes.
    fn load_commits(&self, branch: &BranchId, on_loaded: OnCommitsLoaded)
    -> Result<(), RepoError>;

    fn commit_set_state(&self, branch: &BranchId) -> CommitSetState;
}
