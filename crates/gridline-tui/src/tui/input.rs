// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (focus, cursors).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Focus, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally by mutating
/// `ViewState` or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits, even while typing a query
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            return None;
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.previous();
            return None;
        }
        _ => {}
    }

    match view_state.focus {
        Focus::Search => handle_search_key(key_event, view_state),
        Focus::Results => handle_results_key(key_event, view_state),
        Focus::Comparison => handle_comparison_key(key_event, view_state),
    }
}

fn handle_search_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c)
            if !key_event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            view_state.query.push(c);
            Some(UserCommand::QueryChanged(view_state.query.clone()))
        }
        KeyCode::Backspace => {
            view_state.query.pop()?;
            Some(UserCommand::QueryChanged(view_state.query.clone()))
        }
        KeyCode::Esc => {
            if view_state.query.is_empty() {
                return None;
            }
            view_state.query.clear();
            Some(UserCommand::QueryChanged(String::new()))
        }
        KeyCode::Enter => Some(UserCommand::SubmitSearch),
        KeyCode::Down => {
            if !view_state.results.is_empty() {
                view_state.focus = Focus::Results;
            }
            None
        }
        _ => None,
    }
}

fn handle_results_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.results_cursor = view_state.results_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.results_cursor + 1 < view_state.results.len() {
                view_state.results_cursor += 1;
            }
            None
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            let player = view_state.highlighted_result()?.clone();
            // The orchestrator resets its side too; mirror it so the box
            // clears without waiting for the round trip.
            view_state.query.clear();
            view_state.results.clear();
            view_state.results_cursor = 0;
            view_state.focus = Focus::Search;
            Some(UserCommand::AddPlayer(player))
        }
        KeyCode::Esc => {
            view_state.focus = Focus::Search;
            None
        }
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

fn handle_comparison_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let columns = view_state.comparison.table.columns.len();
    let rows = view_state.comparison.table.rows.len();

    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.selected_column = view_state.selected_column.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if view_state.selected_column + 1 < columns {
                view_state.selected_column += 1;
            }
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.row_cursor = view_state.row_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.row_cursor + 1 < rows {
                view_state.row_cursor += 1;
            }
            None
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            let player_id = view_state.selected_player()?.id.clone();
            Some(UserCommand::RemovePlayer(player_id))
        }
        KeyCode::Esc => {
            view_state.focus = Focus::Search;
            None
        }
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
