//! Flattening sheet output into header + rows tables

use crate::config::HierarchyConfig;
use crate::types::{ExpandedRecord, FlatTable, FlatValue, Observation, WideTable};

fn observation_value(value: Option<&Observation>) -> FlatValue {
    match value {
        Some(Observation::Number(n)) => FlatValue::Number(*n),
        Some(Observation::Placeholder(p)) => FlatValue::Text(p.clone()),
        None => FlatValue::Null,
    }
}

/// Wide layout: keys, then a label and a value column per level-0 category
pub fn wide_to_flat(name: &str, table: &WideTable, config: &HierarchyConfig) -> FlatTable {
    let mut columns = table.key_names.clone();
    for category in &table.categories {
        let category = category.render(&config.unknown_label, &config.na_marker);
        columns.push(category.to_string());
        columns.push(format!("{category} value"));
    }

    let rows = table
        .rows
        .iter()
        .map(|record| {
            let mut row: Vec<FlatValue> =
                record.keys.iter().cloned().map(FlatValue::Text).collect();
            for cell in &record.cells {
                row.push(FlatValue::Text(
                    cell.label
                        .render(&config.unknown_label, &config.na_marker)
                        .to_string(),
                ));
                row.push(observation_value(cell.value.as_ref()));
            }
            row
        })
        .collect();

    FlatTable {
        name: name.to_string(),
        columns,
        rows,
    }
}

/// Long layout: keys, one label per hierarchy level, then the value
pub fn long_to_flat(
    name: &str,
    records: &[ExpandedRecord],
    config: &HierarchyConfig,
) -> FlatTable {
    let mut columns = config.key_names();
    columns.extend((0..config.level_count()).map(|level| format!("level_{level}")));
    columns.push("value".to_string());

    let rows = records
        .iter()
        .map(|record| {
            let mut row: Vec<FlatValue> =
                record.keys.iter().cloned().map(FlatValue::Text).collect();
            row.extend(record.path.iter().map(|step| {
                FlatValue::Text(
                    step.label
                        .render(&config.unknown_label, &config.na_marker)
                        .to_string(),
                )
            }));
            row.push(observation_value(Some(&record.value)));
            row
        })
        .collect();

    FlatTable {
        name: name.to_string(),
        columns,
        rows,
    }
}
