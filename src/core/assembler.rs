//! Wide-format assembly: one row per key combination, one column per level-0 category

use crate::config::HierarchyConfig;
use crate::error::{Diagnostics, TieredError};
use crate::types::{
    CategoryLabel, Classification, ExpandedRecord, NaSource, WideCell, WideRecord, WideTable,
};
use std::collections::HashMap;

/// Pivot expanded records into wide records.
///
/// The category columns come from `classification`, so every row carries the
/// same columns in column order. Within a key group, contributions are applied
/// by ascending column index; a second contribution to one category overwrites
/// the first and records an `AssemblyConflict`.
pub fn assemble(
    records: &[ExpandedRecord],
    classification: &Classification,
    config: &HierarchyConfig,
    diagnostics: &mut Diagnostics,
) -> WideTable {
    let mut group_index: HashMap<&[String], usize> = HashMap::new();
    let mut groups: Vec<(&[String], Vec<&ExpandedRecord>)> = Vec::new();

    for record in records {
        let index = *group_index.entry(record.keys.as_slice()).or_insert_with(|| {
            groups.push((record.keys.as_slice(), Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(record);
    }

    let rows = groups
        .into_iter()
        .map(|(keys, mut contributions)| {
            contributions.sort_by_key(|r| (r.column_index, r.row_index));
            assemble_group(keys, &contributions, classification, config, diagnostics)
        })
        .collect();

    WideTable {
        key_names: config.key_names(),
        categories: classification.categories.clone(),
        rows,
    }
}

fn assemble_group(
    keys: &[String],
    contributions: &[&ExpandedRecord],
    classification: &Classification,
    config: &HierarchyConfig,
    diagnostics: &mut Diagnostics,
) -> WideRecord {
    let mut cells = vec![WideCell::not_applicable(); classification.categories.len()];

    for record in contributions {
        let Some(index) = classification.category_index(record.level0()) else {
            tracing::debug!(
                "column {}: category {} is not part of the sheet schema",
                record.column_index,
                record
                    .level0()
                    .render(&config.unknown_label, &config.na_marker)
            );
            continue;
        };

        let cell = &mut cells[index];
        if let Some(previous) = cell.source_column {
            diagnostics.push(TieredError::AssemblyConflict {
                keys: keys.join(", "),
                category: record
                    .level0()
                    .render(&config.unknown_label, &config.na_marker)
                    .to_string(),
                replaced_column: previous,
                column: record.column_index,
            });
        }

        let label = sub_label(record, config);
        cell.na_source = label
            .is_not_applicable()
            .then_some(NaSource::Classification);
        cell.label = label;
        cell.value = Some(record.value.clone());
        cell.source_column = Some(record.column_index);
    }

    let blank = cells
        .iter()
        .filter(|c| c.na_source == Some(NaSource::NoContribution))
        .count();
    if blank > 0 {
        tracing::debug!(
            "keys [{}]: {} categories not applicable (no contribution)",
            keys.join(", "),
            blank
        );
    }

    WideRecord {
        keys: keys.to_vec(),
        cells,
    }
}

/// Labels below level 0 joined into one cell value, NA when none apply
fn sub_label(record: &ExpandedRecord, config: &HierarchyConfig) -> CategoryLabel {
    let parts: Vec<&str> = record
        .path
        .iter()
        .skip(1)
        .filter_map(|step| match &step.label {
            CategoryLabel::Named(label) => Some(label.as_str()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        CategoryLabel::NotApplicable
    } else {
        CategoryLabel::Named(parts.join(&config.path_separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnDescriptor, ColumnSpan, LevelLabel, Observation};
    use pretty_assertions::assert_eq;

    fn named(s: &str) -> CategoryLabel {
        CategoryLabel::Named(s.to_string())
    }

    fn record(keys: &[&str], column: usize, path: &[CategoryLabel], value: f64) -> ExpandedRecord {
        ExpandedRecord {
            row_index: 0,
            column_index: column,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            path: path
                .iter()
                .enumerate()
                .map(|(level, label)| LevelLabel {
                    level,
                    label: label.clone(),
                })
                .collect(),
            value: Observation::Number(value),
        }
    }

    fn classification(categories: &[CategoryLabel]) -> Classification {
        Classification {
            descriptors: Vec::<ColumnDescriptor>::new(),
            spans: Vec::new(),
            categories: categories.to_vec(),
        }
    }

    #[test]
    fn test_assemble_groups_by_keys() {
        let config = HierarchyConfig::new(vec![0, 1], 2);
        let schema = classification(&[named("Sex"), named("Age")]);
        let records = vec![
            record(&["2020"], 1, &[named("Sex"), named("Male")], 1.0),
            record(&["2021"], 2, &[named("Age"), named("15-24")], 2.0),
            record(&["2020"], 2, &[named("Age"), named("25-34")], 3.0),
        ];

        let mut diagnostics = Diagnostics::new();
        let table = assemble(&records, &schema, &config, &mut diagnostics);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].keys, vec!["2020"]);
        assert_eq!(table.rows[0].cells[0].label, named("Male"));
        assert_eq!(table.rows[0].cells[1].label, named("25-34"));

        let second = &table.rows[1];
        assert_eq!(second.keys, vec!["2021"]);
        assert_eq!(second.cells.len(), 2);
        assert_eq!(second.cells[0].label, CategoryLabel::NotApplicable);
        assert_eq!(second.cells[0].na_source, Some(NaSource::NoContribution));
        assert_eq!(second.cells[1].value, Some(Observation::Number(2.0)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_assemble_conflict_last_column_wins() {
        let config = HierarchyConfig::new(vec![0, 1], 2);
        let schema = classification(&[named("Cat1")]);
        let records = vec![
            record(&["2020"], 1, &[named("Cat1"), named("Sub2")], 20.0),
            record(&["2020"], 0, &[named("Cat1"), named("Sub1")], 10.0),
        ];

        let mut diagnostics = Diagnostics::new();
        let table = assemble(&records, &schema, &config, &mut diagnostics);

        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.label, named("Sub2"));
        assert_eq!(cell.source_column, Some(1));
        assert_eq!(diagnostics.conflicts(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(TieredError::AssemblyConflict {
                replaced_column: 0,
                column: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_assemble_joins_deep_labels() {
        let config = HierarchyConfig::new(vec![0, 1, 2], 3);
        let schema = classification(&[named("Job")]);
        let records = vec![record(
            &["2020"],
            0,
            &[named("Job"), named("Full time"), named("Permanent")],
            5.0,
        )];

        let mut diagnostics = Diagnostics::new();
        let table = assemble(&records, &schema, &config, &mut diagnostics);
        assert_eq!(table.rows[0].cells[0].label, named("Full time / Permanent"));
    }

    #[test]
    fn test_assemble_classification_na() {
        let config = HierarchyConfig::new(vec![0, 1], 2);
        let schema = classification(&[named("Total")]);
        let records = vec![record(
            &["2020"],
            0,
            &[named("Total"), CategoryLabel::NotApplicable],
            9.0,
        )];

        let mut diagnostics = Diagnostics::new();
        let table = assemble(&records, &schema, &config, &mut diagnostics);
        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.label, CategoryLabel::NotApplicable);
        assert_eq!(cell.na_source, Some(NaSource::Classification));
        assert_eq!(cell.value, Some(Observation::Number(9.0)));
    }

    #[test]
    fn test_conflict_names_unknown_category_with_configured_label() {
        let mut config = HierarchyConfig::new(vec![0, 1], 2);
        config.unknown_label = "Unlabelled".to_string();
        let schema = classification(&[CategoryLabel::Unknown]);
        let records = vec![
            record(&["2020"], 0, &[CategoryLabel::Unknown, named("a")], 1.0),
            record(&["2020"], 1, &[CategoryLabel::Unknown, named("b")], 2.0),
        ];

        let mut diagnostics = Diagnostics::new();
        assemble(&records, &schema, &config, &mut diagnostics);

        assert!(matches!(
            diagnostics.iter().next(),
            Some(TieredError::AssemblyConflict { category, .. }) if category == "Unlabelled"
        ));
    }
}
