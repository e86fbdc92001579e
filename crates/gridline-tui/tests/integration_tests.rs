// Integration tests for gridline.
//
// These drive the app orchestrator end-to-end through its channels, with a
// scripted `PlayerSource` standing in for ESPN and tokio's paused clock
// standing in for the user's typing speed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gridline_core::api::{ApiError, PlayerSource};
use gridline_core::compare::{CellValue, ColumnStatus};
use gridline_core::config::Config;
use gridline_core::player::{Player, SearchCandidate};
use gridline_core::session::Phase;
use gridline_core::stats::RawStatsPayload;
use gridline_tui::app::{self, AppState, SEARCH_FAILED_MESSAGE};
use gridline_tui::protocol::{ComparisonSnapshot, UiUpdate, UserCommand};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Scripted player source that records every call.
#[derive(Default)]
struct FakeSource {
    /// (id, name) pairs matched case-insensitively against the query.
    players: Vec<(String, String)>,
    /// Stats payload per athlete id; ids without one fail with 404.
    stats: HashMap<String, Value>,
    fail_search: bool,
    stats_delay: Duration,
    searches: Mutex<Vec<String>>,
    stats_calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PlayerSource for FakeSource {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ApiError> {
        self.searches.lock().unwrap().push(query.to_string());
        if self.fail_search {
            return Err(ApiError::SearchFailed {
                query: query.to_string(),
                reason: "HTTP 503 Service Unavailable".into(),
            });
        }
        let needle = query.trim().to_lowercase();
        let mut candidates: Vec<SearchCandidate> = self
            .players
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(id, name)| SearchCandidate {
                id: Some(id.clone()),
                name: name.clone(),
                team: None,
                image: None,
            })
            .collect();
        // An entry without an athlete id is never displayable.
        candidates.push(SearchCandidate {
            id: None,
            name: format!("{query} (team page)"),
            team: None,
            image: None,
        });
        Ok(candidates)
    }

    async fn fetch_stats(&self, player_id: &str) -> Result<RawStatsPayload, ApiError> {
        self.stats_calls.lock().unwrap().push(player_id.to_string());
        if !self.stats_delay.is_zero() {
            tokio::time::sleep(self.stats_delay).await;
        }
        match self.stats.get(player_id) {
            Some(body) => Ok(RawStatsPayload::new(body.clone())),
            None => Err(ApiError::StatsFetchFailed {
                player_id: player_id.to_string(),
                reason: "HTTP 404 Not Found".into(),
            }),
        }
    }
}

fn quarterbacks() -> FakeSource {
    let mut stats = HashMap::new();
    stats.insert(
        "3139477".to_string(),
        passing(&[("Passing Yards", 28424.0, "28,424"), ("Passing Touchdowns", 219.0, "219")]),
    );
    stats.insert(
        "3918298".to_string(),
        passing(&[("Passing Yards", 26000.0, "26,000"), ("Rushing Touchdowns", 65.0, "65")]),
    );
    FakeSource {
        players: vec![
            ("3139477".into(), "Patrick Mahomes".into()),
            ("3918298".into(), "Josh Allen".into()),
            ("4241479".into(), "Josh Jacobs".into()),
        ],
        stats,
        ..FakeSource::default()
    }
}

fn passing(stats: &[(&str, f64, &str)]) -> Value {
    let stats: Vec<Value> = stats
        .iter()
        .map(|(name, value, display)| {
            json!({"displayName": name, "value": value, "displayValue": display})
        })
        .collect();
    json!({"splits": {"categories": [{"displayName": "Passing", "stats": stats}]}})
}

fn player(id: &str, name: &str) -> Player {
    Player {
        id: id.into(),
        name: name.into(),
        team: None,
        image: None,
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    source: Arc<FakeSource>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(source: FakeSource) -> Harness {
        let source = Arc::new(source);
        let (event_tx, event_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (ui_tx, ui_rx) = mpsc::channel(256);
        let state = AppState::new(Config::default(), source.clone(), event_tx);
        let handle = tokio::spawn(app::run(cmd_rx, event_rx, ui_tx, state));
        Harness {
            cmd_tx,
            ui_rx,
            source,
            handle,
        }
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    async fn type_query(&self, query: &str) {
        self.send(UserCommand::QueryChanged(query.to_string())).await;
    }

    async fn next_update(&mut self) -> UiUpdate {
        tokio::time::timeout(Duration::from_secs(30), self.ui_rx.recv())
            .await
            .expect("timed out waiting for a UI update")
            .expect("UI channel closed")
    }

    /// Skip updates until one matches.
    async fn wait_for(&mut self, matches: impl Fn(&UiUpdate) -> bool) -> UiUpdate {
        loop {
            let update = self.next_update().await;
            if matches(&update) {
                return update;
            }
        }
    }

    async fn wait_for_results(&mut self) -> Vec<Player> {
        match self
            .wait_for(|u| matches!(u, UiUpdate::SearchResults(_)))
            .await
        {
            UiUpdate::SearchResults(players) => players,
            _ => unreachable!(),
        }
    }

    /// Next comparison snapshot satisfying `matches`.
    async fn wait_for_snapshot(
        &mut self,
        matches: impl Fn(&ComparisonSnapshot) -> bool,
    ) -> ComparisonSnapshot {
        loop {
            if let UiUpdate::Comparison(snapshot) = self.next_update().await {
                if matches(&snapshot) {
                    return *snapshot;
                }
            }
        }
    }

    fn drain(&mut self) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.ui_rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    fn searches(&self) -> Vec<String> {
        self.source.searches.lock().unwrap().clone()
    }

    async fn quit(self) {
        self.send(UserCommand::Quit).await;
        self.handle.await.unwrap().unwrap();
    }
}

// ===========================================================================
// Search
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_search_for_final_query() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("m").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.type_query("ma").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.type_query("mah").await;

    assert_eq!(
        h.next_update().await,
        UiUpdate::SearchStarted {
            query: "mah".into()
        }
    );
    let results = h.wait_for_results().await;
    assert_eq!(results, vec![player("3139477", "Patrick Mahomes")]);
    assert_eq!(h.searches(), vec!["mah".to_string()]);

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn no_search_before_debounce_elapses() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("josh").await;
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(h.searches().is_empty());
    assert!(h.drain().is_empty());

    let results = h.wait_for_results().await;
    assert_eq!(results.len(), 2);
    assert_eq!(h.searches(), vec!["josh".to_string()]);

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn submit_bypasses_debounce() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("allen").await;
    h.send(UserCommand::SubmitSearch).await;

    let results = h.wait_for_results().await;
    assert_eq!(results, vec![player("3918298", "Josh Allen")]);

    // The debounced search for the same text was cancelled by the submit.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.searches(), vec!["allen".to_string()]);
    assert!(h.drain().is_empty());

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn short_query_clears_results_without_request() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("m").await;
    let results = h.wait_for_results().await;
    assert!(results.is_empty());

    h.type_query("  j ").await;
    h.send(UserCommand::SubmitSearch).await;
    assert!(h.wait_for_results().await.is_empty());

    assert!(h.searches().is_empty());
    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn id_less_candidates_are_not_shown() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("josh").await;
    h.send(UserCommand::SubmitSearch).await;
    let results = h.wait_for_results().await;
    assert!(results.iter().all(|p| !p.id.is_empty()));
    assert_eq!(results.len(), 2);

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn search_failure_shows_inline_error() {
    let mut h = Harness::start(FakeSource {
        fail_search: true,
        ..quarterbacks()
    });

    h.type_query("mahomes").await;
    h.send(UserCommand::SubmitSearch).await;

    let update = h
        .wait_for(|u| matches!(u, UiUpdate::SearchError(_)))
        .await;
    assert_eq!(update, UiUpdate::SearchError(SEARCH_FAILED_MESSAGE.into()));

    // The app keeps running after a failure.
    h.type_query("allen").await;
    assert_eq!(
        h.next_update().await,
        UiUpdate::SearchStarted {
            query: "allen".into()
        }
    );
    h.quit().await;
}

// ===========================================================================
// Comparison
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn adding_two_players_builds_comparison() {
    let mut h = Harness::start(quarterbacks());

    h.send(UserCommand::AddPlayer(player("3139477", "Patrick Mahomes"))).await;
    let loading = h.wait_for_snapshot(|_| true).await;
    assert_eq!(loading.phase, Phase::Comparing);
    assert_eq!(loading.table.columns[0].status, ColumnStatus::Loading);

    h.wait_for_snapshot(|s| s.table.columns[0].status == ColumnStatus::Loaded)
        .await;

    h.send(UserCommand::AddPlayer(player("3918298", "Josh Allen"))).await;
    let both = h
        .wait_for_snapshot(|s| {
            s.table.columns.len() == 2 && s.table.columns[1].status == ColumnStatus::Loaded
        })
        .await;

    let names: Vec<&str> = both.table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Passing Yards", "Passing Touchdowns", "Rushing Touchdowns"]
    );
    assert_eq!(both.table.rows[0].max_value, 28424.0);
    assert_eq!(both.table.cells[0][1], CellValue::Value("26,000".into()));
    assert_eq!(both.table.cells[1][1], CellValue::NoData);
    assert_eq!(both.table.cells[2][0], CellValue::NoData);
    assert_eq!(both.leaders[1][0].name, "Passing Yards");

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn duplicate_add_is_rejected_with_notice() {
    let mut h = Harness::start(quarterbacks());

    h.send(UserCommand::AddPlayer(player("3918298", "Josh Allen"))).await;
    h.wait_for_snapshot(|s| s.table.columns.first().map(|c| c.status) == Some(ColumnStatus::Loaded))
        .await;

    h.send(UserCommand::AddPlayer(player("3918298", "Josh Allen"))).await;
    let notice = h.wait_for(|u| matches!(u, UiUpdate::Notice(_))).await;
    assert_eq!(
        notice,
        UiUpdate::Notice("Josh Allen is already in the comparison".into())
    );
    let snapshot = h.wait_for_snapshot(|_| true).await;
    assert_eq!(snapshot.table.columns.len(), 1);

    // One fetch only.
    assert_eq!(*h.source.stats_calls.lock().unwrap(), vec!["3918298".to_string()]);
    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn failed_stats_keep_column_with_placeholders() {
    let mut h = Harness::start(quarterbacks());

    h.send(UserCommand::AddPlayer(player("3139477", "Patrick Mahomes"))).await;
    h.send(UserCommand::AddPlayer(player("4241479", "Josh Jacobs"))).await;

    let notice = h.wait_for(|u| matches!(u, UiUpdate::Notice(_))).await;
    assert_eq!(
        notice,
        UiUpdate::Notice("Could not load stats for Josh Jacobs".into())
    );

    let snapshot = h
        .wait_for_snapshot(|s| {
            s.table.columns.len() == 2
                && s.table.columns[0].status == ColumnStatus::Loaded
                && s.table.columns[1].status == ColumnStatus::Failed
        })
        .await;
    assert_eq!(snapshot.table.rows.len(), 2);
    assert!(snapshot.table.cells.iter().all(|row| row[1] == CellValue::NoData));
    assert!(snapshot.leaders[1].is_empty());

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn removed_player_is_not_resurrected_by_late_stats() {
    let mut h = Harness::start(FakeSource {
        stats_delay: Duration::from_secs(2),
        ..quarterbacks()
    });

    h.send(UserCommand::AddPlayer(player("3139477", "Patrick Mahomes"))).await;
    h.wait_for_snapshot(|s| s.phase == Phase::Comparing).await;

    h.send(UserCommand::RemovePlayer("3139477".into())).await;
    h.wait_for_snapshot(|s| s.phase == Phase::Idle).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    for update in h.drain() {
        if let UiUpdate::Comparison(snapshot) = update {
            assert_eq!(snapshot.phase, Phase::Idle);
            assert!(snapshot.table.is_empty());
        }
    }

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn re_added_player_loads_again() {
    let mut h = Harness::start(quarterbacks());
    let mahomes = player("3139477", "Patrick Mahomes");

    h.send(UserCommand::AddPlayer(mahomes.clone())).await;
    h.wait_for_snapshot(|s| !s.table.rows.is_empty()).await;
    h.send(UserCommand::RemovePlayer(mahomes.id.clone())).await;
    h.wait_for_snapshot(|s| s.phase == Phase::Idle).await;

    h.send(UserCommand::AddPlayer(mahomes)).await;
    let snapshot = h.wait_for_snapshot(|s| !s.table.rows.is_empty()).await;
    assert_eq!(snapshot.table.columns.len(), 1);
    assert_eq!(snapshot.table.rows[0].name, "Passing Yards");

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn adding_from_results_resets_search() {
    let mut h = Harness::start(quarterbacks());

    h.type_query("josh").await;
    // Add before the debounce fires: the pending search must not run.
    h.send(UserCommand::AddPlayer(player("3918298", "Josh Allen"))).await;

    let results = h.wait_for_results().await;
    assert!(results.is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(h.searches().is_empty());
    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn closing_command_channel_stops_loop() {
    let h = Harness::start(quarterbacks());
    let Harness { cmd_tx, handle, .. } = h;
    drop(cmd_tx);
    handle.await.unwrap().unwrap();
}
