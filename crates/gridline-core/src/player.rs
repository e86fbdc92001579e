// Player identity: search candidates and the selected players built from them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Athlete segment of an ESPN composite uid, e.g. `s:20~l:28~a:3139477`.
static ATHLETE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"a:(\d+)").expect("athlete id pattern is valid"));

/// A player that can be selected for comparison.
///
/// `id` is the ESPN athlete id and is the only field used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Team or position subtitle from the search index.
    pub team: Option<String>,
    /// Headshot URL.
    pub image: Option<String>,
}

/// One search hit before it has been vetted for display.
///
/// `id` is `None` when the composite uid carried no athlete segment; such
/// candidates are never shown and never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub id: Option<String>,
    pub name: String,
    pub team: Option<String>,
    pub image: Option<String>,
}

impl SearchCandidate {
    /// Promote to a [`Player`] if an athlete id was extracted.
    pub fn into_player(self) -> Option<Player> {
        let id = self.id?;
        Some(Player {
            id,
            name: self.name,
            team: self.team,
            image: self.image,
        })
    }
}

/// Extract the numeric athlete id from a composite uid.
pub fn athlete_id_from_uid(uid: &str) -> Option<String> {
    ATHLETE_ID
        .captures(uid)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drop candidates without an id and cap the list at `limit`, preserving
/// search ranking order.
pub fn displayable(candidates: Vec<SearchCandidate>, limit: usize) -> Vec<Player> {
    candidates
        .into_iter()
        .filter_map(SearchCandidate::into_player)
        .take(limit)
        .collect()
}
