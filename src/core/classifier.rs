//! Column classification: hierarchy paths and level-0 spans

use super::extractor::LevelLabels;
use crate::error::{TieredError, TieredResult};
use crate::types::{
    CategoryLabel, CategorySpan, Classification, ColumnDescriptor, ColumnSpan, LevelLabel,
};
use std::ops::Range;

/// Build column descriptors from resolved per-level labels.
///
/// `filled` holds one resolved sequence per level, level 0 first, each as
/// long as the grid is wide. Spans partition `columns`: a new span starts
/// whenever the level-0 label changes, and an unlabeled run counts as its
/// own [`CategoryLabel::Unknown`] category. A column gets a descriptor if
/// any level carries a label and it is not a fixed key column.
pub fn classify(
    filled: &[LevelLabels],
    columns: Range<usize>,
    fixed_key_columns: &[usize],
) -> TieredResult<Classification> {
    let width = filled
        .first()
        .map(Vec::len)
        .ok_or_else(|| TieredError::Configuration("no header levels to classify".to_string()))?;

    if columns.end > width {
        return Err(TieredError::OutOfRange {
            column: columns.end - 1,
            width,
        });
    }

    let spans = level0_spans(&filled[0], columns.clone());

    let mut descriptors = Vec::new();
    let mut categories: Vec<CategoryLabel> = Vec::new();

    for span in &spans {
        for column in span.span.first..=span.span.last {
            if fixed_key_columns.contains(&column) {
                continue;
            }
            if filled.iter().all(|level| level[column].is_none()) {
                tracing::debug!("column {} has no label at any level, skipped", column);
                continue;
            }

            let path = column_path(filled, column);
            let not_applicable: Vec<usize> = path
                .iter()
                .filter(|step| step.label.is_not_applicable())
                .map(|step| step.level)
                .collect();
            if !not_applicable.is_empty() {
                tracing::debug!(
                    "column {}: levels {:?} not applicable (classification)",
                    column,
                    not_applicable
                );
            }

            if !categories.contains(&span.category) {
                categories.push(span.category.clone());
            }

            descriptors.push(ColumnDescriptor {
                column_index: column,
                path,
                level0_span: span.span,
            });
        }
    }

    tracing::debug!(
        "classified {} columns into {} spans, {} categories",
        descriptors.len(),
        spans.len(),
        categories.len()
    );

    Ok(Classification {
        descriptors,
        spans,
        categories,
    })
}

fn level0_category(label: &Option<String>) -> CategoryLabel {
    match label {
        Some(label) => CategoryLabel::Named(label.clone()),
        None => CategoryLabel::Unknown,
    }
}

/// Cut `columns` into contiguous runs sharing one level-0 category
fn level0_spans(level0: &[Option<String>], columns: Range<usize>) -> Vec<CategorySpan> {
    let mut spans: Vec<CategorySpan> = Vec::new();

    for column in columns {
        let category = level0_category(&level0[column]);
        match spans.last_mut() {
            Some(current) if current.category == category => current.span.last = column,
            _ => spans.push(CategorySpan {
                category,
                span: ColumnSpan {
                    first: column,
                    last: column,
                },
            }),
        }
    }

    spans
}

fn column_path(filled: &[LevelLabels], column: usize) -> Vec<LevelLabel> {
    filled
        .iter()
        .enumerate()
        .map(|(level, labels)| {
            let label = match (&labels[column], level) {
                (Some(label), _) => CategoryLabel::Named(label.clone()),
                (None, 0) => CategoryLabel::Unknown,
                (None, _) => CategoryLabel::NotApplicable,
            };
            LevelLabel { level, label }
        })
        .collect()
}
