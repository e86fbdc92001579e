// Remote data sources: ESPN player search and career statistics.
//
// The orchestrator talks to a `PlayerSource` so tests can substitute an
// in-memory source for the HTTP client.

pub mod client;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::player::SearchCandidate;
use crate::stats::RawStatsPayload;

pub use client::EspnClient;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures at the network boundary. Neither is fatal to the application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("search for {query:?} failed: {reason}")]
    SearchFailed { query: String, reason: String },

    #[error("stats fetch for athlete {player_id} failed: {reason}")]
    StatsFetchFailed { player_id: String, reason: String },
}

// ---------------------------------------------------------------------------
// PlayerSource
// ---------------------------------------------------------------------------

/// Read-only access to player search and per-player statistics.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Search players by name. Results are already filtered to the configured
    /// league; candidates may still lack an athlete id.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ApiError>;

    /// Fetch one player's raw career statistics document.
    async fn fetch_stats(&self, player_id: &str) -> Result<RawStatsPayload, ApiError>;
}
