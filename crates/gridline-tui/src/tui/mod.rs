// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app orchestrator knows
// about the search and the comparison. The orchestrator pushes `UiUpdate`
// messages over an mpsc channel; the TUI applies them to `ViewState` and
// re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use gridline_core::compare::NO_DATA;
use gridline_core::player::Player;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::protocol::{ComparisonSnapshot, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    Results,
    Comparison,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Comparison,
            Focus::Comparison => Focus::Search,
        }
    }

    pub fn previous(self) -> Focus {
        match self {
            Focus::Search => Focus::Comparison,
            Focus::Results => Focus::Search,
            Focus::Comparison => Focus::Results,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator
/// and locally by key handling (query text, cursors, focus).
pub struct ViewState {
    pub focus: Focus,
    /// Text in the search box. Edited locally; every edit is forwarded.
    pub query: String,
    pub results: Vec<Player>,
    pub results_cursor: usize,
    /// A search request is in flight.
    pub searching: bool,
    /// Inline error replacing the result list.
    pub search_error: Option<String>,
    pub comparison: ComparisonSnapshot,
    /// Highlighted player column in the comparison table.
    pub selected_column: usize,
    /// Highlighted stat row in the comparison table.
    pub row_cursor: usize,
    /// Latest notice and when it arrived.
    pub notice: Option<(String, DateTime<Local>)>,
    /// Placeholder for cells without data.
    pub no_data: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            focus: Focus::Search,
            query: String::new(),
            results: Vec::new(),
            results_cursor: 0,
            searching: false,
            search_error: None,
            comparison: ComparisonSnapshot::default(),
            selected_column: 0,
            row_cursor: 0,
            notice: None,
            no_data: NO_DATA.to_string(),
        }
    }
}

impl ViewState {
    pub fn with_placeholder(no_data: impl Into<String>) -> Self {
        ViewState {
            no_data: no_data.into(),
            ..ViewState::default()
        }
    }

    pub fn highlighted_result(&self) -> Option<&Player> {
        self.results.get(self.results_cursor)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.comparison
            .table
            .columns
            .get(self.selected_column)
            .map(|c| &c.player)
    }

    /// Keep cursors inside the current lists.
    fn clamp_cursors(&mut self) {
        self.results_cursor = clamp(self.results_cursor, self.results.len());
        self.selected_column = clamp(self.selected_column, self.comparison.table.columns.len());
        self.row_cursor = clamp(self.row_cursor, self.comparison.table.rows.len());
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

/// Apply a UI update to the view state.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::SearchStarted { .. } => {
            state.searching = true;
            state.search_error = None;
        }
        UiUpdate::SearchResults(players) => {
            state.searching = false;
            state.search_error = None;
            state.results = players;
            state.results_cursor = 0;
            if state.results.is_empty() && state.focus == Focus::Results {
                state.focus = Focus::Search;
            }
        }
        UiUpdate::SearchError(message) => {
            state.searching = false;
            state.results.clear();
            state.results_cursor = 0;
            state.search_error = Some(message);
            if state.focus == Focus::Results {
                state.focus = Focus::Search;
            }
        }
        UiUpdate::Comparison(snapshot) => {
            state.comparison = *snapshot;
        }
        UiUpdate::Notice(message) => {
            state.notice = Some((message, Local::now()));
        }
    }
    state.clamp_cursors();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full screen from the view state.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let AppLayout {
        status_bar,
        search_box,
        results,
        comparison,
        help_bar,
    } = build_layout(frame.area());

    widgets::status_bar::render(frame, status_bar, state);
    widgets::search_box::render(frame, search_box, state);
    widgets::results::render(frame, results, state);
    widgets::comparison::render(frame, comparison, state);
    widgets::help_bar::render(frame, help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits or the app closes the update channel.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    no_data: String,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal before the default hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::with_placeholder(no_data);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
