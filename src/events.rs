//! Terminal event handling for the main loop.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::App;

/// Result of handling an event.
pub enum EventResult {
    /// Continue the event loop normally
    Continue,
    /// Should quit the application
    Quit,
}

pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::FocusGained => {
            app.commit_view.on_active_change(true);
            EventResult::Continue
        }
        Event::FocusLost => {
            app.commit_view.on_active_change(false);
            EventResult::Continue
        }
        // Resizes just need the redraw every loop iteration does anyway.
        _ => EventResult::Continue,
    }
}

/// Handle a key press event.
///
/// Returns `EventResult::Quit` if the application should exit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return EventResult::Quit;
        }
        KeyCode::Char(']') => app.cycle_branch(1),
        KeyCode::Char('[') => app.cycle_branch(-1),
        _ => {
            if let Err(e) = app.commit_view.handle(key) {
                tracing::warn!("key {:?} failed: {e}", key.code);
                app.set_status(e.to_string());
            }
        }
    }
    EventResult::Continue
}
