// ESPN HTTP client: player search and career statistics.
//
// Both calls are single GETs with no retry. Failures are mapped to `ApiError`
// with a short human-readable reason for the status bar.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::wire::SearchResponse;
use super::{ApiError, PlayerSource};
use crate::config::{ApiConfig, Config};
use crate::player::SearchCandidate;
use crate::stats::RawStatsPayload;

const USER_AGENT: &str = concat!("gridline/", env!("CARGO_PKG_VERSION"));

/// ESPN-backed [`PlayerSource`].
#[derive(Debug, Clone)]
pub struct EspnClient {
    http: reqwest::Client,
    search_url: String,
    stats_base_url: String,
    league_tag: String,
    search_limit: u32,
}

impl EspnClient {
    /// Build a client for the given endpoints.
    pub fn new(api: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            search_url: api.search_url.clone(),
            stats_base_url: api.stats_base_url.trim_end_matches('/').to_string(),
            league_tag: api.league_tag.clone(),
            search_limit: api.search_limit,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.api)
    }

    /// `<stats_base_url>/athletes/<id>/statistics`
    pub fn stats_url(&self, player_id: &str) -> String {
        format!("{}/athletes/{player_id}/statistics", self.stats_base_url)
    }
}

#[async_trait]
impl PlayerSource for EspnClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ApiError> {
        let fail = |reason: String| ApiError::SearchFailed {
            query: query.to_string(),
            reason,
        };
        let limit = self.search_limit.to_string();

        let response = self
            .http
            .get(&self.search_url)
            .query(&[("query", query), ("limit", limit.as_str()), ("type", "player")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fail(describe(&e)))?;

        let body: SearchResponse = response.json().await.map_err(|e| fail(describe(&e)))?;
        let candidates = body.into_candidates(&self.league_tag);
        debug!(query, count = candidates.len(), "search complete");
        Ok(candidates)
    }

    async fn fetch_stats(&self, player_id: &str) -> Result<RawStatsPayload, ApiError> {
        let fail = |reason: String| ApiError::StatsFetchFailed {
            player_id: player_id.to_string(),
            reason,
        };

        let response = self
            .http
            .get(self.stats_url(player_id))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fail(describe(&e)))?;

        let body: Value = response.json().await.map_err(|e| fail(describe(&e)))?;
        debug!(player_id, "stats fetched");
        Ok(RawStatsPayload::new(body))
    }
}

/// Short reason for a failed request.
fn describe(err: &reqwest::Error) -> String {
    if let Some(status) = err.status() {
        format!("HTTP {status}")
    } else if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_decode() {
        format!("unreadable response: {err}")
    } else {
        format!("network error: {err}")
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
