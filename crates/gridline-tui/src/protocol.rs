// Messages exchanged between the TUI, the app orchestrator and the network
// tasks it spawns.

use gridline_core::api::ApiError;
use gridline_core::compare::ComparisonTable;
use gridline_core::player::{Player, SearchCandidate};
use gridline_core::session::Phase;
use gridline_core::stats::{RawStatsPayload, StatRecord};

/// Commands from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// The search box text changed (every edit).
    QueryChanged(String),
    /// Search the current text now, skipping the debounce.
    SubmitSearch,
    AddPlayer(Player),
    RemovePlayer(String),
    Quit,
}

/// Results reported back by spawned network tasks.
#[derive(Debug)]
pub enum AppEvent {
    SearchCompleted {
        /// Matches `AppState::search_generation` only for the latest search.
        generation: u64,
        query: String,
        result: Result<Vec<SearchCandidate>, ApiError>,
    },
    StatsFetched {
        player_id: String,
        result: Result<RawStatsPayload, ApiError>,
    },
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    SearchStarted { query: String },
    SearchResults(Vec<Player>),
    /// Search failed; the result list should be emptied.
    SearchError(String),
    Comparison(Box<ComparisonSnapshot>),
    Notice(String),
}

/// Everything the comparison pane needs, rebuilt after every session change.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSnapshot {
    pub phase: Phase,
    pub table: ComparisonTable,
    /// Top records per column, parallel to `table.columns`.
    pub leaders: Vec<Vec<StatRecord>>,
}

impl Default for ComparisonSnapshot {
    fn default() -> Self {
        ComparisonSnapshot {
            phase: Phase::Idle,
            table: ComparisonTable::default(),
            leaders: Vec::new(),
        }
    }
}
