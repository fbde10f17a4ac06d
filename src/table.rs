// src/table.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parse::{parse_csv, Row};

/// Semantic roles the aggregator looks up by header name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Boss,
    Place,
    Hp,
    Exp,
    Gold,
    Unit,
    Count,
    Note,
    Source,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Boss,
        Column::Place,
        Column::Hp,
        Column::Exp,
        Column::Gold,
        Column::Unit,
        Column::Count,
        Column::Note,
        Column::Source,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Header label for each role. Unset fields fall back to the wiki's labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub boss: String,
    pub place: String,
    pub hp: String,
    pub exp: String,
    pub gold: String,
    pub unit: String,
    pub count: String,
    pub note: String,
    pub source: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            boss: "ボス戦名".to_string(),
            place: "出現場所".to_string(),
            hp: "HP".to_string(),
            exp: "経験値".to_string(),
            gold: "ゴールド".to_string(),
            unit: "個体名".to_string(),
            count: "体数".to_string(),
            note: "特徴メモ".to_string(),
            source: "参考元".to_string(),
        }
    }
}

impl ColumnLabels {
    pub fn label(&self, column: Column) -> &str {
        match column {
            Column::Boss => &self.boss,
            Column::Place => &self.place,
            Column::Hp => &self.hp,
            Column::Exp => &self.exp,
            Column::Gold => &self.gold,
            Column::Unit => &self.unit,
            Column::Count => &self.count,
            Column::Note => &self.note,
            Column::Source => &self.source,
        }
    }
}

/// Position of every role in one header, `None` where the header lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [Option<usize>; 9],
}

impl ColumnIndex {
    /// Resolve each role to the first header cell carrying its label.
    pub fn resolve(headers: &[String], labels: &ColumnLabels) -> Self {
        let mut positions = [None; 9];
        for column in Column::ALL {
            let label = labels.label(column);
            positions[column.slot()] = headers.iter().position(|h| h == label);
        }
        debug!(?positions, "resolved column positions");
        Self { positions }
    }

    pub fn get(&self, column: Column) -> Option<usize> {
        self.positions[column.slot()]
    }

    /// Field for `column` in `row`. Absent columns and short rows read as "".
    pub fn field<'a>(&self, row: &'a [String], column: Column) -> &'a str {
        self.get(column)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A parsed CSV document split into its header row and its data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, from the first row.
    pub headers: Vec<String>,
    /// Every later row, in file order.
    pub rows: Vec<Row>,
}

impl RawTable {
    /// Parse `text` and split off the header. Empty input gives an empty table.
    /// A leading byte-order mark is dropped so it never sticks to the first label.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        Self::from_rows(parse_csv(text))
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut rows = rows.into_iter();
        let headers = rows.next().unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }

    /// True when there is nothing below the header (or no header at all).
    pub fn has_no_data(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self, labels: &ColumnLabels) -> ColumnIndex {
        ColumnIndex::resolve(&self.headers, labels)
    }
}
