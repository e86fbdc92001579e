// Comparison session: the selection, per-player stats and derived rows,
// mutated only through `Session::apply`.
//
// `apply` is a reducer. It never performs I/O; anything that needs the
// network or the clock is returned as an `Effect` for the orchestrator to run.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info};

use crate::compare::{aggregate, build_table, AggregatedStatRow, ComparisonTable};
use crate::player::Player;
use crate::stats::StatRecord;

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected.
    Idle,
    /// At least one player selected.
    Comparing,
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AddPlayer(Player),
    RemovePlayer(String),
    SearchQueryChanged(String),
    /// Explicit submit of the current query (bypasses the debounce).
    SearchSubmitted,
    /// The search box was reset, e.g. after picking a result.
    SearchCleared,
    StatsLoaded {
        player_id: String,
        records: Vec<StatRecord>,
    },
    StatsLoadFailed {
        player_id: String,
    },
}

/// User-visible messages raised by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DuplicatePlayer { name: String },
    StatsUnavailable { name: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DuplicatePlayer { name } => write!(f, "{name} is already in the comparison"),
            Notice::StatsUnavailable { name } => write!(f, "Could not load stats for {name}"),
        }
    }
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStats { player_id: String },
    /// Start (or restart) the debounce timer for `query`.
    ScheduleSearch { query: String },
    /// Search immediately, cancelling any scheduled search.
    SearchNow { query: String },
    /// Drop any scheduled or in-flight search.
    CancelSearch,
    Notice(Notice),
}

/// Selection plus everything derived from it.
#[derive(Debug, Default)]
pub struct Session {
    selection: Vec<Player>,
    stats_by_id: HashMap<String, Vec<StatRecord>>,
    failed: HashSet<String>,
    rows: Vec<AggregatedStatRow>,
    query: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the effects it requests.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::AddPlayer(player) => self.add_player(player),
            SessionEvent::RemovePlayer(player_id) => {
                self.remove_player(&player_id);
                Vec::new()
            }
            SessionEvent::SearchQueryChanged(query) => {
                self.query = query.clone();
                vec![Effect::ScheduleSearch { query }]
            }
            SessionEvent::SearchSubmitted => vec![Effect::SearchNow {
                query: self.query.clone(),
            }],
            SessionEvent::SearchCleared => {
                self.query.clear();
                vec![Effect::CancelSearch]
            }
            SessionEvent::StatsLoaded { player_id, records } => {
                self.stats_loaded(player_id, records);
                Vec::new()
            }
            SessionEvent::StatsLoadFailed { player_id } => self.stats_failed(player_id),
        }
    }

    fn add_player(&mut self, player: Player) -> Vec<Effect> {
        if self.contains(&player.id) {
            info!("Rejected duplicate player {} ({})", player.name, player.id);
            return vec![Effect::Notice(Notice::DuplicatePlayer { name: player.name })];
        }

        info!("Added player {} ({})", player.name, player.id);
        let player_id = player.id.clone();
        self.failed.remove(&player_id);
        self.selection.push(player);
        self.recompute();
        vec![Effect::FetchStats { player_id }]
    }

    fn remove_player(&mut self, player_id: &str) {
        let before = self.selection.len();
        self.selection.retain(|p| p.id != player_id);
        if self.selection.len() == before {
            debug!("Remove for unknown player {player_id} ignored");
            return;
        }

        info!("Removed player {player_id}");
        self.stats_by_id.remove(player_id);
        self.failed.remove(player_id);
        self.recompute();
    }

    fn stats_loaded(&mut self, player_id: String, records: Vec<StatRecord>) {
        // A response for a player removed while the fetch was in flight.
        if !self.contains(&player_id) {
            debug!("Dropping stats for unselected player {player_id}");
            return;
        }

        debug!("Stats loaded for {player_id}: {} records", records.len());
        self.failed.remove(&player_id);
        self.stats_by_id.insert(player_id, records);
        self.recompute();
    }

    fn stats_failed(&mut self, player_id: String) -> Vec<Effect> {
        let Some(name) = self.player(&player_id).map(|p| p.name.clone()) else {
            debug!("Dropping failed fetch for unselected player {player_id}");
            return Vec::new();
        };

        // An empty list keeps the column present with placeholders.
        self.stats_by_id.insert(player_id.clone(), Vec::new());
        self.failed.insert(player_id);
        self.recompute();
        vec![Effect::Notice(Notice::StatsUnavailable { name })]
    }

    fn recompute(&mut self) {
        self.rows = aggregate(&self.selection, &self.stats_by_id);
    }

    pub fn phase(&self) -> Phase {
        if self.selection.is_empty() {
            Phase::Idle
        } else {
            Phase::Comparing
        }
    }

    pub fn selection(&self) -> &[Player] {
        &self.selection
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.selection.iter().any(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.selection.iter().find(|p| p.id == player_id)
    }

    pub fn rows(&self) -> &[AggregatedStatRow] {
        &self.rows
    }

    /// `None` while the player's fetch is still pending.
    pub fn stats_for(&self, player_id: &str) -> Option<&[StatRecord]> {
        self.stats_by_id.get(player_id).map(Vec::as_slice)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full render-ready table for the current state.
    pub fn table(&self) -> ComparisonTable {
        build_table(&self.selection, &self.stats_by_id, &self.failed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
