// Comparison aggregation: aligns every selected player's normalized stats into
// one row per distinct stat name, ordered by the largest value any player has.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::stats::StatRecord;

/// Placeholder shown for a player that has no record for a row's stat.
pub const NO_DATA: &str = "—";

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStatRow {
    pub name: String,
    /// Category of the first record discovered with this name.
    pub category: String,
    pub description: String,
    /// Largest value among players that have this stat.
    pub max_value: f64,
}

/// Content of one (row, player) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// The player's `display_value` for the stat.
    Value(String),
    /// The player has no record for the stat (or its stats are not in yet).
    NoData,
}

impl CellValue {
    /// Text to draw, substituting `placeholder` for missing data.
    pub fn render<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            CellValue::Value(text) => text,
            CellValue::NoData => placeholder,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, CellValue::NoData)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(NO_DATA))
    }
}

/// Whether a column's stats have arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStatus {
    Loading,
    Loaded,
    /// The fetch failed; the column shows placeholders only.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonColumn {
    pub player: Player,
    pub status: ColumnStatus,
}

/// Render-ready comparison: `cells[row][column]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonTable {
    pub columns: Vec<ComparisonColumn>,
    pub rows: Vec<AggregatedStatRow>,
    pub cells: Vec<Vec<CellValue>>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.cells.get(row)?.get(column)
    }
}

/// Union the stat names of every selected player that has stats, compute each
/// name's maximum value, and order rows by that maximum (descending).
///
/// Discovery order is selection order, then each player's record order; rows
/// with equal maxima keep that order. Only the first record of a given name
/// counts for a player, matching what the player's cell shows.
pub fn aggregate(
    selection: &[Player],
    stats_by_id: &HashMap<String, Vec<StatRecord>>,
) -> Vec<AggregatedStatRow> {
    let mut rows: Vec<AggregatedStatRow> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();

    for player in selection {
        let Some(records) = stats_by_id.get(&player.id) else {
            continue;
        };
        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            if !seen.insert(record.name.as_str()) {
                continue;
            }
            match row_index.get(record.name.as_str()) {
                Some(&idx) => {
                    let row = &mut rows[idx];
                    if record.value > row.max_value {
                        row.max_value = record.value;
                    }
                }
                None => {
                    row_index.insert(record.name.as_str(), rows.len());
                    rows.push(AggregatedStatRow {
                        name: record.name.clone(),
                        category: record.category.clone(),
                        description: record.description.clone(),
                        max_value: record.value,
                    });
                }
            }
        }
    }

    rows.sort_by(|a, b| b.max_value.total_cmp(&a.max_value));
    rows
}

/// The cell for `player_id` on the row named `stat_name`.
pub fn cell_value(
    stats_by_id: &HashMap<String, Vec<StatRecord>>,
    player_id: &str,
    stat_name: &str,
) -> CellValue {
    stats_by_id
        .get(player_id)
        .and_then(|records| records.iter().find(|r| r.name == stat_name))
        .map_or(CellValue::NoData, |r| CellValue::Value(r.display_value.clone()))
}

/// Aggregate and fill every cell. `failed` holds ids whose fetch failed.
pub fn build_table(
    selection: &[Player],
    stats_by_id: &HashMap<String, Vec<StatRecord>>,
    failed: &HashSet<String>,
) -> ComparisonTable {
    let rows = aggregate(selection, stats_by_id);

    let columns = selection
        .iter()
        .map(|player| {
            let status = if failed.contains(&player.id) {
                ColumnStatus::Failed
            } else if stats_by_id.contains_key(&player.id) {
                ColumnStatus::Loaded
            } else {
                ColumnStatus::Loading
            };
            ComparisonColumn {
                player: player.clone(),
                status,
            }
        })
        .collect();

    let cells = rows
        .iter()
        .map(|row| {
            selection
                .iter()
                .map(|player| cell_value(stats_by_id, &player.id, &row.name))
                .collect()
        })
        .collect();

    ComparisonTable {
        columns,
        rows,
        cells,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
