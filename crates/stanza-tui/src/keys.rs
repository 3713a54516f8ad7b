use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::{App, Mode};

/// Top-level key dispatch.
pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        // Any key dismisses the overlay.
        app.show_help = false;
        return;
    }
    match app.mode {
        Mode::Normal => handle_normal(app, code, modifiers),
        Mode::Search => handle_search(app, code),
    }
}

fn handle_normal(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),
        KeyCode::Tab => app.focus_next(),
        KeyCode::Char('h') | KeyCode::Left => app.focus_left(),
        KeyCode::Char('l') | KeyCode::Right => app.focus_right(),
        KeyCode::Enter => app.select(),

        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('R') => app.reset_filters(),

        KeyCode::Char('x') | KeyCode::Char(' ') => app.toggle_read(),
        KeyCode::Char(c @ '0'..='5') => app.set_rating(c as u8 - b'0'),

        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
}

fn handle_search(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.commit_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}
