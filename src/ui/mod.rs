//! Drawing of buffered views onto the terminal frame.

mod window;

pub use window::{LineWindow, RenderError, RenderWindow};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::theme::Palette;

/// Draw a rendered [`LineWindow`] into `area`.
pub fn draw_line_window(
    f: &mut Frame,
    area: Rect,
    win: &LineWindow,
    title: Line<'_>,
    palette: Palette,
) {
    let focused = win.selected().map(|(_, focused)| focused).unwrap_or(false);

    let mut list = List::new(win.body().iter().map(|l| ListItem::new(l.as_str())))
        .style(Style::default().bg(palette.bg).fg(palette.fg))
        .highlight_symbol(window::HIGHLIGHT_SYMBOL);

    list = if focused {
        list.highlight_style(
            Style::default()
                .bg(palette.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        list.highlight_style(
            Style::default()
                .bg(palette.selection_inactive_bg)
                .fg(palette.muted_fg),
        )
    };

    if win.has_border() {
        let border_color = if focused {
            palette.accent_primary
        } else {
            palette.border_inactive
        };
        list = list.block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(ratatui::symbols::border::PLAIN)
                .border_style(Style::default().fg(border_color))
                .title(title),
        );
    }

    let mut state = ListState::default();
    state.select(win.selected().map(|(row, _)| row.saturating_sub(1)));
    f.render_stateful_widget(list, area, &mut state);
}
