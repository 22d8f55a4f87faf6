use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};
use crate::util::unicode;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // A blocking notice swallows the key that dismisses it
    if app.notice.take().is_some() {
        return;
    }
    app.status = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Prompt => handle_prompt(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Char('h') => app.scroll_by(-1),
        KeyCode::Right | KeyCode::Char('l') => app.scroll_by(1),
        KeyCode::Char('H') | KeyCode::PageUp => app.scroll_page(false),
        KeyCode::Char('L') | KeyCode::PageDown => app.scroll_page(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_lane(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_lane(1),
        KeyCode::Char('t') | KeyCode::Home => app.center_pending = true,
        KeyCode::Char('a') => app.open_prompt(),
        KeyCode::Char('f') => app.finish_selected(),
        _ => {}
    }
}

fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => unicode::pop_grapheme(&mut app.input),
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}
