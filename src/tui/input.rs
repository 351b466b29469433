//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global bindings
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Esc => {
            app.input.clear();
            return;
        }
        _ => {}
    }

    // Scrollback (force-pinned again on the next arrival)
    match key.code {
        KeyCode::Up => {
            app.scroll.scroll_by(-1, app.max_scroll);
            return;
        }
        KeyCode::Down => {
            app.scroll.scroll_by(1, app.max_scroll);
            return;
        }
        KeyCode::PageUp => {
            app.scroll.scroll_by(-i32::from(app.viewport_height), app.max_scroll);
            return;
        }
        KeyCode::PageDown => {
            app.scroll.scroll_by(i32::from(app.viewport_height), app.max_scroll);
            return;
        }
        KeyCode::End => {
            app.scroll.snap_to_bottom(app.max_scroll);
            return;
        }
        _ => {}
    }

    // Input line
    if !app.config.supports_chat_input {
        return;
    }
    match key.code {
        KeyCode::Enter => {
            let text = app.input.trim().to_string();
            if !text.is_empty() {
                app.pending_send = Some(text);
                app.input.clear();
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}
