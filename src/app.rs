use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::{path::PathBuf, sync::Arc};

use crate::commit_view::{CommitView, ViewError};
use crate::config::Config;
use crate::git_repo::{self, GitRepoData};
use crate::redraw::RedrawSender;
use crate::repo_data::{BranchId, RepoData};
use crate::theme::{self, Palette};
use crate::ui::{self, LineWindow};

pub struct App {
    pub commit_view: CommitView,
    repo: Arc<GitRepoData>,
    branches: Vec<BranchId>,
    branch_idx: usize,
    palette: Palette,
    status: Option<String>,
    /// Last render failure; cleared by the next successful render.
    render_error: Option<String>,
}

impl App {
    /// Must be called from within a Tokio runtime.
    pub fn new(repo_root: PathBuf, redraw: RedrawSender, config: &Config) -> Self {
        let repo = Arc::new(GitRepoData::new(repo_root.clone()));
        let commit_view = CommitView::new(repo.clone(), redraw, config.refresh_interval());

        let mut branches = git_repo::list_branches(&repo_root).unwrap_or_else(|e| {
            tracing::warn!("listing branches failed: {e}");
            Vec::new()
        });
        let head = git_repo::head_ref(&repo_root);
        let branch_idx = match branches.iter().position(|b| *b == head) {
            Some(idx) => idx,
            None => {
                branches.insert(0, head);
                0
            }
        };

        tracing::info!(
            repo = %repo_root.display(),
            branches = branches.len(),
            theme = config.theme.label(),
            "starting commit browser"
        );

        Self {
            commit_view,
            repo,
            branches,
            branch_idx,
            palette: theme::palette(config.theme),
            status: None,
            render_error: None,
        }
    }

    /// Select the branch HEAD was on at startup and focus the view.
    pub fn start(&mut self) {
        self.commit_view.on_active_change(true);
        self.select_branch(self.branch_idx);
    }

    pub fn cycle_branch(&mut self, delta: isize) {
        if self.branches.is_empty() {
            return;
        }
        let len = self.branches.len() as isize;
        let next = (self.branch_idx as isize + delta).rem_euclid(len) as usize;
        self.select_branch(next);
    }

    fn select_branch(&mut self, idx: usize) {
        let Some(branch) = self.branches.get(idx).cloned() else {
            return;
        };

        match self.commit_view.on_ref_select(branch.clone()) {
            Ok(()) => {
                self.branch_idx = idx;
                self.status = None;
            }
            Err(e) => {
                tracing::error!(%branch, "selecting branch failed: {e}");
                self.set_status(format!("{}: {e}", branch.short_name()));
            }
        }
    }

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = Some(msg.into());
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        let (list_area, status_area) = (chunks[0], chunks[1]);

        let mut win = LineWindow::new(list_area);
        let rendered = self.commit_view.render(&mut win);
        self.note_render_result(rendered);
        ui::draw_line_window(f, list_area, &win, self.title(), self.palette);

        let status = match self.status_message() {
            Some(msg) => Line::from(Span::styled(
                format!(" {msg}"),
                Style::default()
                    .fg(self.palette.accent_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            None => {
                let id = self.selected_commit_id().unwrap_or_default();
                Line::from(vec![
                    Span::styled(format!(" {id} "), Style::default().fg(self.palette.fg)),
                    Span::styled(
                        " j/k move  g/G first/last  [/] branch  q quit",
                        Style::default().fg(self.palette.muted_fg),
                    ),
                ])
            }
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().bg(self.palette.bg)),
            status_area,
        );
    }

    fn note_render_result(&mut self, result: Result<(), ViewError>) {
        match result {
            Ok(()) => self.render_error = None,
            Err(ViewError::NoScrollState(_)) => {
                tracing::debug!("no branch selected, skipping frame");
            }
            Err(e) => {
                tracing::warn!("rendering commits failed: {e}");
                self.render_error = Some(e.to_string());
            }
        }
    }

    fn status_message(&self) -> Option<&str> {
        self.status.as_deref().or(self.render_error.as_deref())
    }

    /// Full hash of the commit under the cursor.
    fn selected_commit_id(&self) -> Option<String> {
        let branch = self.commit_view.active_branch()?;
        let scroll = self.commit_view.scroll_state(&branch)?;
        let mut commits = self.repo.commits(&branch, scroll.active_index, 1).ok()?;
        commits.next().map(|c| c.id)
    }

    fn title(&self) -> Line<'static> {
        let Some(branch) = self.commit_view.active_branch() else {
            return Line::raw(" Commits ");
        };

        let state = self.repo.commit_set_state(&branch);
        let position = self
            .commit_view
            .scroll_state(&branch)
            .filter(|_| state.commit_count > 0)
            .map(|s| format!("{}/", s.active_index + 1))
            .unwrap_or_default();

        let mut spans = vec![Span::raw(format!(
            " {} ({}{}) ",
            branch.short_name(),
            position,
            state.commit_count
        ))];
        if state.loading {
            spans.push(Span::styled(
                "loading… ",
                Style::default().fg(self.palette.muted_fg),
            ));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo_data::RepoError;
    use crate::ui::RenderError;

    fn app() -> App {
        let (redraw, _rx) = RedrawSender::channel();
        App::new(PathBuf::from("/nonexistent"), redraw, &Config::default())
    }

    #[tokio::test]
    async fn test_render_error_clears_after_successful_render() {
        let mut app = app();

        app.note_render_result(Err(ViewError::Render(RenderError::RowOutOfBounds {
            row: 9,
            rows: 5,
        })));
        assert!(app.status_message().is_some());

        app.note_render_result(Ok(()));
        assert_eq!(app.status_message(), None);
    }

    #[tokio::test]
    async fn test_missing_state_is_not_shown() {
        let mut app = app();
        app.note_render_result(Err(ViewError::NoScrollState(None)));
        assert_eq!(app.status_message(), None);
    }

    #[tokio::test]
    async fn test_status_outlives_successful_render() {
        let mut app = app();
        app.set_status("no such branch");
        app.note_render_result(Err(ViewError::Repo(RepoError::Git("boom".to_string()))));
        app.note_render_result(Ok(()));
        assert_eq!(app.status_message(), Some("no such branch"));
    }

    #[tokio::test]
    async fn test_no_commit_selected_without_branch() {
        assert_eq!(app().selected_commit_id(), None);
    }
}
