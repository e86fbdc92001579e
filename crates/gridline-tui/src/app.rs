// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI, the
// search debounce timer, and results reported by spawned network tasks. Owns
// the comparison `Session` and pushes UI updates to the TUI render loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gridline_core::api::PlayerSource;
use gridline_core::config::Config;
use gridline_core::player::{displayable, Player};
use gridline_core::session::{Effect, Session, SessionEvent};
use gridline_core::stats::{normalize, top_stats};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::protocol::{AppEvent, ComparisonSnapshot, UiUpdate, UserCommand};

/// Inline message shown in place of results when a search fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search players";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    /// Shared with spawned search and stats tasks.
    pub source: Arc<dyn PlayerSource>,
    pub debouncer: Debouncer,
    /// Identifies the latest issued search. Results carrying any other
    /// generation are discarded in `handle_app_event`.
    pub search_generation: u64,
    pub current_search_task: Option<JoinHandle<()>>,
    /// In-flight stats fetches keyed by player id.
    pub stats_tasks: HashMap<String, JoinHandle<()>>,
    /// Spawned tasks report back through clones of this sender.
    pub event_tx: mpsc::Sender<AppEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn PlayerSource>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let debouncer = Debouncer::new(Duration::from_millis(config.search.debounce_ms));
        AppState {
            config,
            session: Session::new(),
            source,
            debouncer,
            search_generation: 0,
            current_search_task: None,
            stats_tasks: HashMap::new(),
            event_tx,
        }
    }

    /// Abort the in-flight search, if any, and invalidate its generation so a
    /// result that was already queued is dropped too.
    pub fn cancel_search_task(&mut self) {
        self.search_generation += 1;
        if let Some(handle) = self.current_search_task.take() {
            handle.abort();
            debug!("Cancelled in-flight search");
        }
    }

    /// Start a search for `query` now.
    ///
    /// Queries shorter than `min_query_len` (after trimming) never reach the
    /// network; they only clear the result list. Returns `true` if a request
    /// was spawned.
    pub fn start_search(&mut self, query: String) -> bool {
        self.cancel_search_task();

        if query.trim().chars().count() < self.config.search.min_query_len {
            debug!("Query {query:?} too short, clearing results");
            return false;
        }

        let generation = self.search_generation;
        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();
        info!("Searching for {query:?} (generation {generation})");
        self.current_search_task = Some(tokio::spawn(async move {
            let result = source.search(&query).await;
            let _ = tx
                .send(AppEvent::SearchCompleted {
                    generation,
                    query,
                    result,
                })
                .await;
        }));
        true
    }

    /// Spawn a stats fetch for `player_id`, replacing any fetch already
    /// running for the same id.
    pub fn spawn_stats_fetch(&mut self, player_id: String) {
        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();
        let id = player_id.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_stats(&id).await;
            let _ = tx
                .send(AppEvent::StatsFetched {
                    player_id: id,
                    result,
                })
                .await;
        });
        if let Some(previous) = self.stats_tasks.insert(player_id, handle) {
            previous.abort();
        }
    }

    pub fn cancel_stats_fetch(&mut self, player_id: &str) {
        if let Some(handle) = self.stats_tasks.remove(player_id) {
            handle.abort();
            debug!("Cancelled stats fetch for {player_id}");
        }
    }

    pub fn cancel_all_tasks(&mut self) {
        self.debouncer.cancel();
        self.cancel_search_task();
        for (_, handle) in self.stats_tasks.drain() {
            handle.abort();
        }
    }

    /// Render-ready view of the session.
    pub fn snapshot(&self) -> ComparisonSnapshot {
        let table = self.session.table();
        let leaders = table
            .columns
            .iter()
            .map(|column| {
                self.session
                    .stats_for(&column.player.id)
                    .map(|stats| top_stats(stats, self.config.display.top_stats).to_vec())
                    .unwrap_or_default()
            })
            .collect();
        ComparisonSnapshot {
            phase: self.session.phase(),
            table,
            leaders,
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on the command channel, the app event channel and the debounce
/// timer using `tokio::select!`. Returns when the TUI sends `Quit` or drops
/// its command sender.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // AppState holds a sender, so this only closes if the state is torn down
    // elsewhere; stop polling rather than spin on a closed channel.
    let mut events_open = true;

    loop {
        let deadline = state.debouncer.deadline();

        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Network task results (only poll when channel is open) ---
            event = event_rx.recv(), if events_open => {
                match event {
                    Some(event) => {
                        handle_app_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("App event channel closed");
                        events_open = false;
                    }
                }
            }

            // --- Debounced search (armed only while a query is pending) ---
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(query) = state.debouncer.take_due(Instant::now()) {
                    run_search(&mut state, query, &ui_tx).await;
                }
            }
        }
    }

    // Cleanup
    state.cancel_all_tasks();
    info!("Application event loop exiting");
    Ok(())
}

/// Process a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::QueryChanged(query) => {
            let effects = state.session.apply(SessionEvent::SearchQueryChanged(query));
            execute_effects(state, effects, ui_tx).await;
        }
        UserCommand::SubmitSearch => {
            let effects = state.session.apply(SessionEvent::SearchSubmitted);
            execute_effects(state, effects, ui_tx).await;
        }
        UserCommand::AddPlayer(player) => {
            add_player(state, player, ui_tx).await;
        }
        UserCommand::RemovePlayer(player_id) => {
            state.cancel_stats_fetch(&player_id);
            let effects = state
                .session
                .apply(SessionEvent::RemovePlayer(player_id));
            execute_effects(state, effects, ui_tx).await;
            push_snapshot(state, ui_tx).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn add_player(state: &mut AppState, player: Player, ui_tx: &mpsc::Sender<UiUpdate>) {
    let effects = state.session.apply(SessionEvent::AddPlayer(player));
    execute_effects(state, effects, ui_tx).await;

    // Picking a result resets the search box, duplicate or not.
    let effects = state.session.apply(SessionEvent::SearchCleared);
    execute_effects(state, effects, ui_tx).await;
    let _ = ui_tx.send(UiUpdate::SearchResults(Vec::new())).await;

    push_snapshot(state, ui_tx).await;
}

/// Process a result reported by a spawned network task.
pub async fn handle_app_event(
    state: &mut AppState,
    event: AppEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        AppEvent::SearchCompleted {
            generation,
            query,
            result,
        } => {
            // Discard results from superseded searches.
            if generation != state.search_generation {
                debug!(
                    "Discarding stale search for {:?} (event gen: {}, current gen: {})",
                    query, generation, state.search_generation
                );
                return;
            }
            state.current_search_task = None;

            match result {
                Ok(candidates) => {
                    let players = displayable(candidates, state.config.search.display_limit);
                    info!("Search for {query:?} returned {} players", players.len());
                    let _ = ui_tx.send(UiUpdate::SearchResults(players)).await;
                }
                Err(e) => {
                    warn!("{e}");
                    let _ = ui_tx
                        .send(UiUpdate::SearchError(SEARCH_FAILED_MESSAGE.to_string()))
                        .await;
                }
            }
        }
        AppEvent::StatsFetched { player_id, result } => {
            state.stats_tasks.remove(&player_id);

            let event = match result {
                Ok(payload) => SessionEvent::StatsLoaded {
                    records: normalize(&payload),
                    player_id,
                },
                Err(e) => {
                    warn!("{e}");
                    SessionEvent::StatsLoadFailed { player_id }
                }
            };
            let effects = state.session.apply(event);
            execute_effects(state, effects, ui_tx).await;
            push_snapshot(state, ui_tx).await;
        }
    }
}

/// Carry out the side effects requested by the session.
async fn execute_effects(state: &mut AppState, effects: Vec<Effect>, ui_tx: &mpsc::Sender<UiUpdate>) {
    for effect in effects {
        match effect {
            Effect::FetchStats { player_id } => {
                state.spawn_stats_fetch(player_id);
            }
            Effect::ScheduleSearch { query } => {
                state.debouncer.schedule(query, Instant::now());
            }
            Effect::SearchNow { query } => {
                state.debouncer.cancel();
                run_search(state, query, ui_tx).await;
            }
            Effect::CancelSearch => {
                state.debouncer.cancel();
                state.cancel_search_task();
            }
            Effect::Notice(notice) => {
                info!("Notice: {notice}");
                let _ = ui_tx.send(UiUpdate::Notice(notice.to_string())).await;
            }
        }
    }
}

async fn run_search(state: &mut AppState, query: String, ui_tx: &mpsc::Sender<UiUpdate>) {
    let started = query.clone();
    if state.start_search(query) {
        let _ = ui_tx.send(UiUpdate::SearchStarted { query: started }).await;
    } else {
        let _ = ui_tx.send(UiUpdate::SearchResults(Vec::new())).await;
    }
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.snapshot();
    let _ = ui_tx.send(UiUpdate::Comparison(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
