//! Hierarchy configuration loaded from YAML
//!
//! All row and column indices are 0-based.
//!
//! ```yaml
//! sheet: "Table 3"
//! level_rows: [4, 5, 6]
//! data_start_row: 7
//! fixed_keys:
//!   - column: 0
//!     name: period
//!   - column: 1
//!     name: region
//!     default: Total
//! ```

use crate::error::{TieredError, TieredResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

/// A non-hierarchical key column copied into every record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedKey {
    pub column: usize,
    pub name: String,
    /// Value used when the key cell is empty
    #[serde(default)]
    pub default: Option<String>,
}

impl FixedKey {
    pub fn new(column: usize, name: impl Into<String>) -> Self {
        Self {
            column,
            name: name.into(),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Inclusive range of classified columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Worksheet to process; every sheet when absent
    #[serde(default)]
    pub sheet: Option<String>,

    /// Header row per level, top category first
    pub level_rows: Vec<usize>,

    pub data_start_row: usize,

    /// Last data row (inclusive)
    #[serde(default)]
    pub data_end_row: Option<usize>,

    #[serde(default)]
    pub columns: Option<ColumnRange>,

    #[serde(default)]
    pub fixed_keys: Vec<FixedKey>,

    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,

    #[serde(default = "default_na_marker")]
    pub na_marker: String,

    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,

    #[serde(default = "default_path_separator")]
    pub path_separator: String,
}

fn default_placeholders() -> Vec<String> {
    ["Z", "-", "x", ".", "..."]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_na_marker() -> String {
    "Z".to_string()
}

fn default_unknown_label() -> String {
    "Unknown".to_string()
}

fn default_path_separator() -> String {
    " / ".to_string()
}

impl HierarchyConfig {
    pub fn new(level_rows: Vec<usize>, data_start_row: usize) -> Self {
        Self {
            sheet: None,
            level_rows,
            data_start_row,
            data_end_row: None,
            columns: None,
            fixed_keys: Vec::new(),
            placeholders: default_placeholders(),
            na_marker: default_na_marker(),
            unknown_label: default_unknown_label(),
            path_separator: default_path_separator(),
        }
    }

    #[must_use]
    pub fn with_fixed_key(mut self, key: FixedKey) -> Self {
        self.fixed_keys.push(key);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, first: usize, last: usize) -> Self {
        self.columns = Some(ColumnRange { first, last });
        self
    }

    pub fn level_count(&self) -> usize {
        self.level_rows.len()
    }

    pub fn key_names(&self) -> Vec<String> {
        self.fixed_keys.iter().map(|k| k.name.clone()).collect()
    }

    pub fn is_placeholder(&self, text: &str) -> bool {
        self.placeholders.iter().any(|p| p == text)
    }

    /// Half-open classified column range for a grid of the given width.
    ///
    /// Defaults to the column after the last fixed key through the last column.
    pub fn column_range(&self, width: usize) -> TieredResult<Range<usize>> {
        match self.columns {
            Some(ColumnRange { first, last }) => {
                let end = last
                    .checked_add(1)
                    .ok_or(TieredError::OutOfRange { column: last, width })?;
                Ok(first..end)
            }
            None => {
                let first = self
                    .fixed_keys
                    .iter()
                    .map(|k| k.column.saturating_add(1))
                    .max()
                    .unwrap_or(0);
                Ok(first..width.max(first))
            }
        }
    }

    /// Check the configuration against a grid of the given width
    pub fn validate(&self, width: usize) -> TieredResult<()> {
        if self.level_rows.is_empty() {
            return Err(TieredError::Configuration(
                "at least one level row is required".to_string(),
            ));
        }

        if let Some(&max_level) = self.level_rows.iter().max() {
            if self.data_start_row <= max_level {
                return Err(TieredError::Configuration(format!(
                    "data_start_row {} must come after header row {}",
                    self.data_start_row, max_level
                )));
            }
        }

        if let Some(end) = self.data_end_row {
            if end < self.data_start_row {
                return Err(TieredError::Configuration(format!(
                    "data_end_row {} is before data_start_row {}",
                    end, self.data_start_row
                )));
            }
        }

        if let Some(ColumnRange { first, last }) = self.columns {
            if last < first {
                return Err(TieredError::Configuration(format!(
                    "column range {first}..={last} is empty"
                )));
            }
        }

        let mut names = HashSet::new();
        for key in &self.fixed_keys {
            if !names.insert(key.name.as_str()) {
                return Err(TieredError::Configuration(format!(
                    "fixed key '{}' is declared twice",
                    key.name
                )));
            }
        }

        if let Some(key) = self.fixed_keys.iter().find(|k| k.column >= width) {
            return Err(TieredError::Configuration(format!(
                "fixed key '{}' refers to column {} but the grid has {} columns",
                key.name, key.column, width
            )));
        }

        let range = self.column_range(width)?;
        if let Some(key) = self.fixed_keys.iter().find(|k| range.contains(&k.column)) {
            return Err(TieredError::Configuration(format!(
                "fixed key '{}' (column {}) overlaps the classified columns {}..{}",
                key.name, key.column, range.start, range.end
            )));
        }

        if range.end > width {
            return Err(TieredError::OutOfRange {
                column: range.end - 1,
                width,
            });
        }

        Ok(())
    }
}

/// Parse a hierarchy configuration from a YAML string
pub fn parse_config_str(content: &str) -> TieredResult<HierarchyConfig> {
    let config: HierarchyConfig = serde_yaml::from_str(content)?;
    Ok(config)
}

/// Parse a hierarchy configuration file
pub fn parse_config(path: &Path) -> TieredResult<HierarchyConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}
