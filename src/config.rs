// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::aggregate::MergePolicy;
use crate::table::ColumnLabels;

pub const DEFAULT_DETAIL_PAGE: &str = "dq1_boss_detail.html";

/// Settings read from the optional YAML file. Every key may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub merge_policy: MergePolicy,
    /// Detail page linked from list roots that carry no `data-detail`.
    pub detail_page: String,
    /// Header labels for each column role.
    pub columns: ColumnLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            merge_policy: MergePolicy::default(),
            detail_page: DEFAULT_DETAIL_PAGE.to_string(),
            columns: ColumnLabels::default(),
        }
    }
}

impl Config {
    /// Read `path` if given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
