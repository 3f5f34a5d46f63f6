//! Scrollable commit list for the selected branch.
//!
//! One lock guards all view state. Rendering, key handling, branch selection
//! and the loader's completion callback each hold it for their whole duration,
//! so at most one of them runs at a time.

mod actions;

use actions::{CommitAction, DEFAULT_KEY_BINDINGS};

use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::redraw::RedrawSender;
use crate::refresh_task::RefreshTask;
use crate::repo_data::{BranchId, Commit, OnCommitsLoaded, RepoData, RepoError};
use crate::scroll::ScrollState;
use crate::ui::{RenderError, RenderWindow};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("No scroll state for branch {0:?}")]
    NoScrollState(Option<BranchId>),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Default)]
pub(crate) struct CommitViewState {
    active_branch: Option<BranchId>,
    active: bool,
    scroll_states: HashMap<BranchId, ScrollState>,
    refresh_task: Option<RefreshTask>,
}

impl CommitViewState {
    fn active_scroll_mut(&mut self) -> Result<(&BranchId, &mut ScrollState), ViewError> {
        let Some(branch) = self.active_branch.as_ref() else {
            return Err(ViewError::NoScrollState(None));
        };
        match self.scroll_states.get_mut(branch) {
            Some(scroll) => Ok((branch, scroll)),
            None => Err(ViewError::NoScrollState(Some(branch.clone()))),
        }
    }
}

pub struct CommitView {
    repo: Arc<dyn RepoData>,
    redraw: RedrawSender,
    refresh_interval: Duration,
    runtime: Handle,
    handlers: HashMap<KeyCode, CommitAction>,
    state: Arc<Mutex<CommitViewState>>,
}

impl CommitView {
    /// Create the view. Must be called from within a Tokio runtime; refresh
    /// tasks are spawned on it.
    pub fn new(repo: Arc<dyn RepoData>, redraw: RedrawSender, refresh_interval: Duration) -> Self {
        Self {
            repo,
            redraw,
            refresh_interval,
            runtime: Handle::current(),
            handlers: DEFAULT_KEY_BINDINGS.iter().copied().collect(),
            state: Arc::new(Mutex::new(CommitViewState::default())),
        }
    }

    /// Write the visible commits of the active branch into `win`.
    pub fn render(&self, win: &mut dyn RenderWindow) -> Result<(), ViewError> {
        let mut guard = self.state.lock();
        let focused = guard.active;
        let (branch, scroll) = guard.active_scroll_mut()?;

        let rows = win.rows().saturating_sub(2);
        if rows > 0 {
            scroll.clamp_window(rows);

            let commits = self.repo.commits(branch, scroll.view_start_index, rows)?;
            for (row, commit) in (1..).zip(commits) {
                win.set_row(row, format_commit_row(&commit))?;
            }

            win.set_selected_row(scroll.selected_offset() + 1, focused)?;
        }

        win.draw_border();
        Ok(())
    }

    /// Switch to `branch`, kicking off loading and a refresh task while it runs.
    pub fn on_ref_select(&self, branch: BranchId) -> Result<(), ViewError> {
        tracing::debug!(%branch, "commit view loading commits for selected branch");
        let mut state = self.state.lock();

        if let Some(previous) = state.refresh_task.take() {
            previous.stop();
        }

        let refresh_task = RefreshTask::new(
            self.refresh_interval,
            self.redraw.clone(),
            self.runtime.clone(),
        );
        self.repo
            .load_commits(&branch, self.on_commits_loaded(refresh_task.clone()))?;

        if !state.scroll_states.contains_key(&branch) {
            state.scroll_states.insert(branch.clone(), ScrollState::new());
        }

        if self.repo.commit_set_state(&branch).loading {
            refresh_task.start();
        } else {
            refresh_task.stop();
        }

        state.active_branch = Some(branch);
        state.refresh_task = Some(refresh_task);
        Ok(())
    }

    pub fn on_active_change(&self, active: bool) {
        tracing::debug!(active, "commit view focus changed");
        self.state.lock().active = active;
    }

    /// Run the action bound to `key`, if any.
    pub fn handle(&self, key: KeyEvent) -> Result<(), ViewError> {
        let Some(action) = self.handlers.get(&key.code).copied() else {
            return Ok(());
        };

        tracing::debug!(?action, "commit view handling key");
        let mut state = self.state.lock();
        action.apply(&mut state, self.repo.as_ref(), &self.redraw)
    }

    pub fn active_branch(&self) -> Option<BranchId> {
        self.state.lock().active_branch.clone()
    }

    pub fn scroll_state(&self, branch: &BranchId) -> Option<ScrollState> {
        self.state.lock().scroll_states.get(branch).copied()
    }

    #[cfg(test)]
    fn refresh_task(&self) -> Option<RefreshTask> {
        self.state.lock().refresh_task.clone()
    }

    /// Completion callback stopping `refresh_task` under the view lock.
    fn on_commits_loaded(&self, refresh_task: RefreshTask) -> OnCommitsLoaded {
        let state = Arc::downgrade(&self.state);
        Box::new(move |branch| {
            tracing::debug!(%branch, "commits loaded");
            let state = state.upgrade();
            let _guard = state.as_ref().map(|s| s.lock());
            refresh_task.stop();
        })
    }
}

fn format_commit_row(commit: &Commit) -> String {
    format!(
        " {} {} {} {}",
        commit.short_id, commit.when, commit.author, commit.summary
    )
}
