//! Key bindings and the navigation actions they trigger.

use crossterm::event::KeyCode;

use super::{CommitViewState, ViewError};
use crate::redraw::RedrawSender;
use crate::repo_data::RepoData;
use crate::scroll::ScrollState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitAction {
    MoveUp,
    MoveDown,
    MoveToFirst,
    MoveToLast,
}

pub const DEFAULT_KEY_BINDINGS: &[(KeyCode, CommitAction)] = &[
    (KeyCode::Up, CommitAction::MoveUp),
    (KeyCode::Char('k'), CommitAction::MoveUp),
    (KeyCode::Down, CommitAction::MoveDown),
    (KeyCode::Char('j'), CommitAction::MoveDown),
    (KeyCode::Home, CommitAction::MoveToFirst),
    (KeyCode::Char('g'), CommitAction::MoveToFirst),
    (KeyCode::End, CommitAction::MoveToLast),
    (KeyCode::Char('G'), CommitAction::MoveToLast),
];

impl CommitAction {
    /// Apply to the active branch, requesting a redraw only if the selection moved.
    pub(super) fn apply(
        self,
        state: &mut CommitViewState,
        repo: &dyn RepoData,
        redraw: &RedrawSender,
    ) -> Result<(), ViewError> {
        let (branch, scroll) = state.active_scroll_mut()?;

        let moved = match self {
            CommitAction::MoveUp => move_up(scroll),
            CommitAction::MoveDown => {
                move_down(scroll, repo.commit_set_state(branch).commit_count)
            }
            CommitAction::MoveToFirst => move_to(scroll, 0),
            CommitAction::MoveToLast => {
                let count = repo.commit_set_state(branch).commit_count;
                count > 0 && move_to(scroll, count - 1)
            }
        };

        if moved {
            tracing::debug!(action = ?self, active_index = scroll.active_index, "moved commit selection");
            redraw.request();
        }
        Ok(())
    }
}

fn move_up(scroll: &mut ScrollState) -> bool {
    if scroll.active_index == 0 {
        return false;
    }
    scroll.active_index -= 1;
    true
}

fn move_down(scroll: &mut ScrollState, commit_count: usize) -> bool {
    if scroll.active_index + 1 >= commit_count {
        return false;
    }
    scroll.active_index += 1;
    true
}

fn move_to(scroll: &mut ScrollState, index: usize) -> bool {
    if scroll.active_index == index {
        return false;
    }
    scroll.active_index = index;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_up_stops_at_top() {
        let mut scroll = ScrollState::new();
        assert!(!move_up(&mut scroll));
        assert_eq!(scroll, ScrollState::new());
    }

    #[test]
    fn test_move_down_stops_at_last_commit() {
        let mut scroll = ScrollState {
            active_index: 3,
            view_start_index: 0,
        };
        assert!(!move_down(&mut scroll, 4));
        assert_eq!(scroll.active_index, 3);
        assert!(!move_down(&mut ScrollState::new(), 0));
    }

    #[test]
    fn test_bindings_are_unique() {
        for (i, (key, _)) in DEFAULT_KEY_BINDINGS.iter().enumerate() {
            assert!(
                DEFAULT_KEY_BINDINGS[i + 1..].iter().all(|(k, _)| k != key),
                "duplicate binding for {key:?}"
            );
        }
    }
}
