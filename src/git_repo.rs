//! Commit data loaded from `git log` on background threads.

use parking_lot::RwLock;
use std::{
    collections::HashMap,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::Arc,
    thread,
};

use crate::repo_data::{BranchId, Commit, CommitSetState, OnCommitsLoaded, RepoData, RepoError};

/// Commits appended to the shared list at a time while loading.
const LOAD_BATCH_SIZE: usize = 256;

const LOG_FORMAT: &str = "--pretty=format:%H%x09%h%x09%ad%x09%an%x09%s";
const DATE_FORMAT: &str = "--date=format:%Y-%m-%d %H:%M";

#[derive(Default)]
struct CommitSet {
    commits: Vec<Commit>,
    loading: bool,
    pending: Vec<OnCommitsLoaded>,
}

/// [`RepoData`] backed by the `git` binary.
pub struct GitRepoData {
    repo_root: PathBuf,
    sets: Arc<RwLock<HashMap<BranchId, CommitSet>>>,
}

fn git_command(cwd: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_PAGER", "cat")
        .env("PAGER", "cat");
    cmd
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<String, RepoError> {
    let out = git_command(cwd).args(args).output()?;
    if !out.status.success() {
        return Err(RepoError::Git(
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

/// Top-level directory of the repository containing `path`.
pub fn repo_root(path: &Path) -> Result<PathBuf, RepoError> {
    let root = run_git(path, &["rev-parse", "--show-toplevel"])?;
    let root = root.trim();
    if root.is_empty() {
        return Err(RepoError::Git("not a git repository".to_string()));
    }
    Ok(PathBuf::from(root))
}

/// The ref HEAD points at, or `HEAD` itself when detached.
pub fn head_ref(repo_root: &Path) -> BranchId {
    run_git(repo_root, &["symbolic-ref", "-q", "HEAD"])
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(BranchId::new)
        .unwrap_or_else(|| BranchId::new("HEAD"))
}

/// Local and remote-tracking branches, locals first.
pub fn list_branches(repo_root: &Path) -> Result<Vec<BranchId>, RepoError> {
    let out = run_git(
        repo_root,
        &[
            "for-each-ref",
            "--format=%(refname)",
            "refs/heads",
            "refs/remotes",
        ],
    )?;
    Ok(parse_ref_list(&out))
}

fn parse_ref_list(text: &str) -> Vec<BranchId> {
    text.lines()
        .map(str::trim)
        // `origin/HEAD` is a symbolic alias of another remote branch.
        .filter(|l| !l.is_empty() && !l.ends_with("/HEAD"))
        .map(BranchId::new)
        .collect()
}

fn parse_log_line(line: &str) -> Option<Commit> {
    let mut it = line.splitn(5, '\t');
    let id = it.next()?.trim().to_string();
    if id.is_empty() {
        return None;
    }
    Some(Commit {
        id,
        short_id: it.next().unwrap_or("").trim().to_string(),
        when: it.next().unwrap_or("").trim().to_string(),
        author: it.next().unwrap_or("").trim().to_string(),
        summary: it.next().unwrap_or("").trim().to_string(),
    })
}

impl GitRepoData {
    pub fn new(repo_root: PathBuf) -> Self {
        Self {
            repo_root,
            sets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn verify_ref(&self, branch: &BranchId) -> Result<(), RepoError> {
        let rev = format!("{}^{{commit}}", branch.as_str());
        run_git(&self.repo_root, &["rev-parse", "--verify", "--quiet", &rev])
            .map(|_| ())
            .map_err(|_| RepoError::Git(format!("cannot read {}", branch)))
    }
}

impl RepoData for GitRepoData {
    fn commits(
        &self,
        branch: &BranchId,
        start_index: usize,
        max_count: usize,
    ) -> Result<Box<dyn Iterator<Item = Commit> + '_>, RepoError> {
        let sets = self.sets.read();
        let set = sets
            .get(branch)
            .ok_or_else(|| RepoError::UnknownBranch(branch.clone()))?;

        let end = start_index.saturating_add(max_count).min(set.commits.len());
        let start = start_index.min(end);
        Ok(Box::new(set.commits[start..end].to_vec().into_iter()))
    }

    fn load_commits(
        &self,
        branch: &BranchId,
        on_loaded: OnCommitsLoaded,
    ) -> Result<(), RepoError> {
        self.verify_ref(branch)?;

        let mut sets = self.sets.write();
        match sets.get(branch).map(|set| set.loading) {
            Some(true) => {
                if let Some(set) = sets.get_mut(branch) {
                    set.pending.push(on_loaded);
                }
            }
            Some(false) => {
                drop(sets);
                let branch = branch.clone();
                thread::spawn(move || on_loaded(&branch));
            }
            None => {
                sets.insert(
                    branch.clone(),
                    CommitSet {
                        commits: Vec::new(),
                        loading: true,
                        pending: vec![on_loaded],
                    },
                );
                drop(sets);

                let repo_root = self.repo_root.clone();
                let sets = Arc::clone(&self.sets);
                let branch = branch.clone();
                thread::spawn(move || load_branch(&repo_root, &sets, &branch));
            }
        }
        Ok(())
    }

    fn commit_set_state(&self, branch: &BranchId) -> CommitSetState {
        self.sets
            .read()
            .get(branch)
            .map(|set| CommitSetState {
                loading: set.loading,
                commit_count: set.commits.len(),
            })
            .unwrap_or_default()
    }
}

/// Stream `git log` into the shared set, then fire the pending callbacks.
fn load_branch(repo_root: &Path, sets: &RwLock<HashMap<BranchId, CommitSet>>, branch: &BranchId) {
    tracing::debug!(%branch, "loading commits");
    if let Err(e) = stream_log(repo_root, sets, branch) {
        tracing::error!(%branch, "loading commits failed: {e}");
    }

    let pending = {
        let mut sets = sets.write();
        match sets.get_mut(branch) {
            Some(set) => {
                set.loading = false;
                tracing::info!(%branch, commits = set.commits.len(), "commits loaded");
                std::mem::take(&mut set.pending)
            }
            None => Vec::new(),
        }
    };

    for on_loaded in pending {
        on_loaded(branch);
    }
}

fn stream_log(
    repo_root: &Path,
    sets: &RwLock<HashMap<BranchId, CommitSet>>,
    branch: &BranchId,
) -> Result<(), RepoError> {
    let mut child = git_command(repo_root)
        .args(["log", "--no-color", DATE_FORMAT, LOG_FORMAT, branch.as_str(), "--"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RepoError::Git("git log produced no output pipe".to_string()))?;

    let mut batch = Vec::with_capacity(LOAD_BATCH_SIZE);
    let flush = |batch: &mut Vec<Commit>| {
        if let Some(set) = sets.write().get_mut(branch) {
            set.commits.append(batch);
        }
    };

    for line in BufReader::new(stdout).lines() {
        let line = line?;
        if let Some(commit) = parse_log_line(&line) {
            batch.push(commit);
        }
        if batch.len() >= LOAD_BATCH_SIZE {
            flush(&mut batch);
        }
    }
    flush(&mut batch);

    let status = child.wait()?;
    if !status.success() {
        return Err(RepoError::Git(format!("git log exited with {status}")));
    }
    Ok(())
}
