//! Record expansion: one data row × column descriptors → expanded records

use crate::config::HierarchyConfig;
use crate::error::{Diagnostics, TieredError, TieredResult};
use crate::types::{Cell, CellGrid, ColumnDescriptor, ExpandedRecord, Observation};
use regex::Regex;

/// Plain decimal with `.` as the separator and an optional exponent
const NUMBER_PATTERN: &str = r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$";

/// Expands data rows against an immutable set of column descriptors
pub struct RecordExpander<'a> {
    config: &'a HierarchyConfig,
    descriptors: &'a [ColumnDescriptor],
    number_pattern: Regex,
}

impl<'a> RecordExpander<'a> {
    pub fn new(
        config: &'a HierarchyConfig,
        descriptors: &'a [ColumnDescriptor],
    ) -> TieredResult<Self> {
        let number_pattern = Regex::new(NUMBER_PATTERN)
            .map_err(|e| TieredError::Configuration(format!("invalid number pattern: {e}")))?;
        Ok(Self {
            config,
            descriptors,
            number_pattern,
        })
    }

    /// Read the fixed keys of a row in configured order
    pub fn read_keys(&self, grid: &CellGrid, row: usize) -> TieredResult<Vec<String>> {
        self.config
            .fixed_keys
            .iter()
            .map(|key| match grid.get(row, key.column).as_label() {
                Some(value) => Ok(value),
                None => key.default.clone().ok_or_else(|| TieredError::MissingKey {
                    row,
                    key: key.name.clone(),
                }),
            })
            .collect()
    }

    /// Expand one data row.
    ///
    /// Fails only when a fixed key is missing. Unparsable value cells are
    /// recorded in `diagnostics` and skipped; blank cells emit nothing.
    pub fn expand_row(
        &self,
        grid: &CellGrid,
        row: usize,
        diagnostics: &mut Diagnostics,
    ) -> TieredResult<Vec<ExpandedRecord>> {
        let keys = self.read_keys(grid, row)?;
        let mut records = Vec::new();

        for descriptor in self.descriptors {
            let column = descriptor.column_index;
            match self.parse_value(grid.get(row, column), row, column) {
                Ok(Some(value)) => records.push(ExpandedRecord {
                    row_index: row,
                    column_index: column,
                    keys: keys.clone(),
                    path: descriptor.path.clone(),
                    value,
                }),
                Ok(None) => {
                    tracing::trace!("row {} column {}: blank cell", row, column);
                }
                Err(error) => diagnostics.push(error),
            }
        }

        Ok(records)
    }

    /// Interpret a value cell; `Ok(None)` for blanks
    pub fn parse_value(
        &self,
        cell: &Cell,
        row: usize,
        column: usize,
    ) -> TieredResult<Option<Observation>> {
        match cell {
            Cell::Empty => Ok(None),
            Cell::Number(n) => Ok(Some(Observation::Number(*n))),
            Cell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else if self.config.is_placeholder(trimmed) {
                    Ok(Some(Observation::Placeholder(trimmed.to_string())))
                } else if let Some(n) = self.parse_number(trimmed) {
                    Ok(Some(Observation::Number(n)))
                } else {
                    Err(TieredError::UnparsableValue {
                        row,
                        column,
                        text: trimmed.to_string(),
                    })
                }
            }
        }
    }

    fn parse_number(&self, text: &str) -> Option<f64> {
        if !self.number_pattern.is_match(text) {
            return None;
        }
        text.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedKey;
    use crate::types::{CategoryLabel, ColumnSpan, LevelLabel};

    fn descriptor(column: usize, category: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            column_index: column,
            path: vec![LevelLabel {
                level: 0,
                label: CategoryLabel::Named(category.to_string()),
            }],
            level0_span: ColumnSpan {
                first: column,
                last: column,
            },
        }
    }

    fn config() -> HierarchyConfig {
        HierarchyConfig::new(vec![0], 1)
            .with_fixed_key(FixedKey::new(0, "period"))
            .with_fixed_key(FixedKey::new(1, "region").with_default("Total"))
    }

    #[test]
    fn test_expand_row_emits_values() {
        let config = config();
        let descriptors = vec![descriptor(2, "A"), descriptor(3, "B"), descriptor(4, "C")];
        let expander = RecordExpander::new(&config, &descriptors).unwrap();
        let grid = CellGrid::new(vec![
            vec![],
            vec![
                Cell::from("2021"),
                Cell::from("North"),
                Cell::from(1.5),
                Cell::Empty,
                Cell::from("x"),
            ],
        ]);

        let mut diagnostics = Diagnostics::new();
        let records = expander.expand_row(&grid, 1, &mut diagnostics).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keys, vec!["2021", "North"]);
        assert_eq!(records[0].value, Observation::Number(1.5));
        assert_eq!(records[1].column_index, 4);
        assert_eq!(records[1].value, Observation::Placeholder("x".to_string()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_expand_row_uses_key_default() {
        let config = config();
        let descriptors = vec![descriptor(2, "A")];
        let expander = RecordExpander::new(&config, &descriptors).unwrap();
        let grid = CellGrid::new(vec![vec![Cell::from(2020), Cell::Empty, Cell::from(4)]]);

        let keys = expander.read_keys(&grid, 0).unwrap();
        assert_eq!(keys, vec!["2020", "Total"]);
    }

    #[test]
    fn test_expand_row_missing_key() {
        let config = config();
        let descriptors = vec![descriptor(2, "A")];
        let expander = RecordExpander::new(&config, &descriptors).unwrap();
        let grid = CellGrid::new(vec![vec![Cell::Empty, Cell::from("N"), Cell::from(4)]]);

        let mut diagnostics = Diagnostics::new();
        let result = expander.expand_row(&grid, 0, &mut diagnostics);
        assert!(matches!(
            result,
            Err(TieredError::MissingKey { row: 0, ref key }) if key == "period"
        ));
    }

    #[test]
    fn test_unparsable_cell_does_not_abort_row() {
        let config = config();
        let descriptors = vec![descriptor(2, "A"), descriptor(3, "B")];
        let expander = RecordExpander::new(&config, &descriptors).unwrap();
        let grid = CellGrid::new(vec![vec![
            Cell::from("2020"),
            Cell::from("N"),
            Cell::from("12 apples"),
            Cell::from(" 7.25 "),
        ]]);

        let mut diagnostics = Diagnostics::new();
        let records = expander.expand_row(&grid, 0, &mut diagnostics).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, Observation::Number(7.25));
        assert_eq!(diagnostics.unparsable(), 1);
    }

    #[test]
    fn test_parse_number_locale_agnostic() {
        let config = config();
        let expander = RecordExpander::new(&config, &[]).unwrap();

        assert_eq!(expander.parse_number("12"), Some(12.0));
        assert_eq!(expander.parse_number("-0.5"), Some(-0.5));
        assert_eq!(expander.parse_number(".25"), Some(0.25));
        assert_eq!(expander.parse_number("1e3"), Some(1000.0));
        assert_eq!(expander.parse_number("1,5"), None);
        assert_eq!(expander.parse_number("1 000"), None);
        assert_eq!(expander.parse_number("inf"), None);
        assert_eq!(expander.parse_number("NaN"), None);
    }
}
