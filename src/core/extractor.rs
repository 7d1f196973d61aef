//! Header grid extraction: raw per-level labels for every column

use crate::error::{TieredError, TieredResult};
use crate::types::CellGrid;

/// Labels of one header level, one entry per grid column; `None` is absent.
pub type LevelLabels = Vec<Option<String>>;

/// Read the raw label of every column on each configured header row.
///
/// Blank and whitespace-only cells become `None`, so an empty string is never a label.
pub fn extract(grid: &CellGrid, level_rows: &[usize]) -> TieredResult<Vec<LevelLabels>> {
    let width = grid.width();

    level_rows
        .iter()
        .enumerate()
        .map(|(level, &row)| {
            if row >= grid.height() {
                return Err(TieredError::Configuration(format!(
                    "level {} header row {} is beyond the last row {}",
                    level,
                    row,
                    grid.height().saturating_sub(1)
                )));
            }
            Ok((0..width).map(|col| grid.get(row, col).as_label()).collect())
        })
        .collect()
}
