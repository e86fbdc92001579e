// Raw wire types for the ESPN search endpoint and their mapping onto
// `SearchCandidate`. Every field is optional: the index omits fields freely.

use serde::Deserialize;

use crate::player::{athlete_id_from_uid, SearchCandidate};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchResponse {
    pub results: Option<Vec<SearchResultGroup>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchResultGroup {
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub contents: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchItem {
    /// Composite identifier, e.g. `s:20~l:28~a:3139477`.
    pub uid: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<SearchImage>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchImage {
    pub default: Option<String>,
}

impl SearchResponse {
    /// Items of the first result group; the endpoint puts player hits there.
    pub fn first_contents(self) -> Vec<SearchItem> {
        self.results
            .and_then(|groups| groups.into_iter().next())
            .and_then(|group| group.contents)
            .unwrap_or_default()
    }

    /// Keep items whose uid carries `league_tag` and map them to candidates.
    pub fn into_candidates(self, league_tag: &str) -> Vec<SearchCandidate> {
        self.first_contents()
            .into_iter()
            .filter(|item| item.uid.as_deref().is_some_and(|uid| uid.contains(league_tag)))
            .map(SearchItem::into_candidate)
            .collect()
    }
}

impl SearchItem {
    pub fn into_candidate(self) -> SearchCandidate {
        SearchCandidate {
            id: self.uid.as_deref().and_then(athlete_id_from_uid),
            name: self.display_name.unwrap_or_default(),
            team: self.subtitle,
            image: self.image.and_then(|img| img.default),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
