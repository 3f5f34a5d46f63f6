/// Per-branch selection and scroll position.
///
/// Indices are ordinal positions in the branch's full commit list. Navigation
/// only moves `active_index`; the window catches up in [`ScrollState::clamp_window`]
/// once per render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub active_index: usize,
    pub view_start_index: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the window the minimum distance needed to keep the selection visible.
    pub fn clamp_window(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }

        if self.view_start_index > self.active_index {
            self.view_start_index = self.active_index;
        } else {
            let row_diff = self.active_index - self.view_start_index;
            if row_diff >= rows {
                self.view_start_index += (row_diff - rows) + 1;
            }
        }
    }

    /// Row of the selection relative to the window, 0-based.
    pub fn selected_offset(&self) -> usize {
        self.active_index.saturating_sub(self.view_start_index)
    }
}
