//! Row-addressed render surface backed by a ratatui area.

use ratatui::layout::Rect;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Columns taken by the list highlight marker.
pub(crate) const HIGHLIGHT_SYMBOL: &str = "▎ ";
const HIGHLIGHT_WIDTH: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("row {row} is outside the drawable rows of a {rows}-row window")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// A surface views write rows into.
///
/// Rows are 1-based: row 0 and the last row belong to the frame.
pub trait RenderWindow {
    fn rows(&self) -> usize;
    fn set_row(&mut self, row: usize, text: String) -> Result<(), RenderError>;
    fn set_selected_row(&mut self, row: usize, focused: bool) -> Result<(), RenderError>;
    fn draw_border(&mut self);
}

/// Buffers one frame of rows for later drawing with [`super::draw_line_window`].
#[derive(Clone, Debug)]
pub struct LineWindow {
    rows: usize,
    width: usize,
    lines: Vec<String>,
    selected: Option<(usize, bool)>,
    border: bool,
}

impl LineWindow {
    pub fn new(area: Rect) -> Self {
        let rows = area.height as usize;
        Self {
            rows,
            width: (area.width as usize).saturating_sub(2 + HIGHLIGHT_WIDTH),
            lines: vec![String::new(); rows],
            selected: None,
            border: false,
        }
    }

    /// Text of the drawable rows, top to bottom.
    pub fn body(&self) -> &[String] {
        if self.rows < 2 {
            return &[];
        }
        &self.lines[1..self.rows - 1]
    }

    pub fn selected(&self) -> Option<(usize, bool)> {
        self.selected
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    fn check_row(&self, row: usize) -> Result<(), RenderError> {
        if row == 0 || row + 1 >= self.rows {
            return Err(RenderError::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

impl RenderWindow for LineWindow {
    fn rows(&self) -> usize {
        self.rows
    }

    fn set_row(&mut self, row: usize, text: String) -> Result<(), RenderError> {
        self.check_row(row)?;
        self.lines[row] = truncate_to_width(&text, self.width);
        Ok(())
    }

    fn set_selected_row(&mut self, row: usize, focused: bool) -> Result<(), RenderError> {
        self.check_row(row)?;
        self.selected = Some((row, focused));
        Ok(())
    }

    fn draw_border(&mut self) {
        self.border = true;
    }
}

pub fn truncate_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut wsum = 0usize;

    for ch in s.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if wsum + w > width {
            break;
        }
        out.push(ch);
        wsum += w;
    }

    out
}
