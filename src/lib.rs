pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod page;
pub mod parse;
pub mod query;
pub mod render;
pub mod table;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregate::{boss_detail, summarize_bosses, BossDetail, BossSummary, DetailOutcome, UnitDetail};
pub use parse::{parse_csv, Row};
pub use table::{Column, ColumnIndex, ColumnLabels, RawTable};
