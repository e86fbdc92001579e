// Stat normalization: flattens ESPN's nested career statistics payload into a
// list of positive-valued records ordered by raw magnitude.
//
// The ordering compares yards, percentages and counts on one numeric scale.
// That is the intended display order, not a unit-aware ranking.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// How many records the player detail line shows by default.
pub const DEFAULT_TOP_STATS: usize = 20;

/// Opaque statistics document as returned by the stats endpoint.
///
/// Only shape-checked while [`normalize`] walks it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStatsPayload(Value);

impl RawStatsPayload {
    pub fn new(value: Value) -> Self {
        RawStatsPayload(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawStatsPayload {
    fn from(value: Value) -> Self {
        RawStatsPayload(value)
    }
}

/// One normalized statistic for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Category display name, e.g. "Passing".
    pub category: String,
    /// Stat display name, e.g. "Passing Yards". Used to align players.
    pub name: String,
    pub short_name: String,
    pub value: f64,
    /// Pre-formatted value from the source, e.g. "5,250".
    pub display_value: String,
    pub description: String,
    pub abbreviation: String,
}

/// Flatten `splits.categories[].stats[]` into records with `value > 0`,
/// sorted descending by value. Equal values keep traversal order.
///
/// Never fails: a payload without the expected structure yields an empty list.
pub fn normalize(payload: &RawStatsPayload) -> Vec<StatRecord> {
    let Some(categories) = payload
        .0
        .get("splits")
        .and_then(|splits| splits.get("categories"))
        .and_then(Value::as_array)
    else {
        debug!("stats payload has no splits.categories array, treating as empty");
        return Vec::new();
    };

    let mut records = Vec::new();
    for category in categories {
        let category_name = string_field(category, "displayName");
        let Some(stats) = category.get("stats").and_then(Value::as_array) else {
            debug!(category = %category_name, "category without stats array skipped");
            continue;
        };
        records.extend(
            stats
                .iter()
                .filter_map(|stat| stat_record(&category_name, stat)),
        );
    }

    // `sort_by` is stable, which keeps first-seen order among ties.
    records.sort_by(|a, b| b.value.total_cmp(&a.value));
    records
}

/// Group records by category. Categories appear in first-seen order and each
/// group keeps the input order of its records.
pub fn group_by_category(stats: &[StatRecord]) -> Vec<(String, Vec<StatRecord>)> {
    let mut groups: Vec<(String, Vec<StatRecord>)> = Vec::new();
    for stat in stats {
        match groups.iter_mut().find(|(name, _)| *name == stat.category) {
            Some((_, group)) => group.push(stat.clone()),
            None => groups.push((stat.category.clone(), vec![stat.clone()])),
        }
    }
    groups
}

/// The first `count` records of an already-normalized list.
pub fn top_stats(stats: &[StatRecord], count: usize) -> &[StatRecord] {
    &stats[..stats.len().min(count)]
}

fn stat_record(category: &str, stat: &Value) -> Option<StatRecord> {
    let value = stat.get("value")?.as_f64()?;
    if value <= 0.0 {
        return None;
    }
    // A stat without a name cannot be lined up against other players.
    let name = stat.get("displayName")?.as_str()?.to_string();
    let display_value = stat
        .get("displayValue")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format_value(value));

    Some(StatRecord {
        category: category.to_string(),
        name,
        short_name: string_field(stat, "shortDisplayName"),
        value,
        display_value,
        description: string_field(stat, "description"),
        abbreviation: string_field(stat, "abbreviation"),
    })
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
