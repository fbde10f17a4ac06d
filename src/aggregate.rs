// src/aggregate.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{Column, ColumnIndex, ColumnLabels, RawTable};

/// How later rows for an already-seen boss are folded into its summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Later rows fill fields that are still empty; set fields never change.
    #[default]
    Backfill,
    /// Only the first row for a boss counts.
    FirstRow,
}

/// One line of the boss index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BossSummary {
    pub name: String,
    pub place: String,
    pub hp: String,
    pub exp: String,
    pub gold: String,
}

impl BossSummary {
    fn from_row(name: &str, row: &[String], idx: &ColumnIndex) -> Self {
        Self {
            name: name.to_string(),
            place: idx.field(row, Column::Place).to_string(),
            hp: idx.field(row, Column::Hp).to_string(),
            exp: idx.field(row, Column::Exp).to_string(),
            gold: idx.field(row, Column::Gold).to_string(),
        }
    }

    fn backfill(&mut self, row: &[String], idx: &ColumnIndex) {
        for (slot, column) in [
            (&mut self.place, Column::Place),
            (&mut self.hp, Column::Hp),
            (&mut self.exp, Column::Exp),
            (&mut self.gold, Column::Gold),
        ] {
            if slot.is_empty() {
                let value = idx.field(row, column);
                if !value.is_empty() {
                    *slot = value.to_string();
                }
            }
        }
    }
}

/// One unit variant fought in a boss encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitDetail {
    pub unit: String,
    pub count: String,
    pub hp: String,
    pub exp: String,
    pub gold: String,
    pub place: String,
    pub note: String,
    pub source: String,
}

impl UnitDetail {
    fn from_row(row: &[String], idx: &ColumnIndex) -> Self {
        Self {
            unit: idx.field(row, Column::Unit).to_string(),
            count: idx.field(row, Column::Count).to_string(),
            hp: idx.field(row, Column::Hp).to_string(),
            exp: idx.field(row, Column::Exp).to_string(),
            gold: idx.field(row, Column::Gold).to_string(),
            place: idx.field(row, Column::Place).to_string(),
            note: idx.field(row, Column::Note).to_string(),
            source: idx.field(row, Column::Source).to_string(),
        }
    }
}

/// Every unit row for one boss, plus the location shared by the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossDetail {
    pub boss: String,
    /// First non-empty place among the boss's rows.
    pub place: String,
    pub units: Vec<UnitDetail>,
}

/// Result of a detail lookup. None of these are failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailOutcome {
    Found(BossDetail),
    /// The header has no boss-name column.
    MissingBossColumn,
    /// The table has no data rows at all.
    EmptyTable,
    /// No row carries the requested boss name.
    NoData,
}

/// Collapse the table into one summary per boss, in first-seen order.
///
/// Rows without a boss name are skipped. A table without a boss-name column
/// has nothing to show and yields an empty list.
pub fn summarize_bosses(
    table: &RawTable,
    labels: &ColumnLabels,
    policy: MergePolicy,
) -> Vec<BossSummary> {
    if table.has_no_data() {
        return Vec::new();
    }
    let idx = table.columns(labels);
    if idx.get(Column::Boss).is_none() {
        debug!(label = %labels.boss, "boss column missing; empty index");
        return Vec::new();
    }

    let mut bosses: IndexMap<String, BossSummary> = IndexMap::new();
    for row in &table.rows {
        let name = idx.field(row, Column::Boss);
        if name.is_empty() {
            continue;
        }
        match bosses.get_mut(name) {
            Some(summary) => {
                if policy == MergePolicy::Backfill {
                    summary.backfill(row, &idx);
                }
            }
            None => {
                bosses.insert(name.to_string(), BossSummary::from_row(name, row, &idx));
            }
        }
    }

    debug!(bosses = bosses.len(), rows = table.rows.len(), "summarized");
    bosses.into_values().collect()
}

/// Gather every row whose boss name equals `boss` exactly.
pub fn boss_detail(table: &RawTable, labels: &ColumnLabels, boss: &str) -> DetailOutcome {
    if table.has_no_data() {
        return DetailOutcome::EmptyTable;
    }
    let idx = table.columns(labels);
    if idx.get(Column::Boss).is_none() {
        return DetailOutcome::MissingBossColumn;
    }

    let mut place = String::new();
    let mut units = Vec::new();
    for row in &table.rows {
        let name = idx.field(row, Column::Boss);
        if name.is_empty() || name != boss {
            continue;
        }
        let unit = UnitDetail::from_row(row, &idx);
        if place.is_empty() && !unit.place.is_empty() {
            place = unit.place.clone();
        }
        units.push(unit);
    }

    if units.is_empty() {
        return DetailOutcome::NoData;
    }
    debug!(boss, units = units.len(), "collected boss detail");
    DetailOutcome::Found(BossDetail {
        boss: boss.to_string(),
        place,
        units,
    })
}
