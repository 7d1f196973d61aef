//! Merged-label resolution
//!
//! Spreadsheets state a merged category once, in the leftmost cell of its
//! span. Resolution forward-fills each level so every column carries the
//! label that governs it.

use super::extractor::LevelLabels;

/// Forward-fill absent labels with the nearest preceding label on the same level.
///
/// Columns before the first label stay absent.
pub fn resolve(raw: &[Option<String>]) -> LevelLabels {
    raw.iter()
        .scan(None::<String>, |last_seen, label| {
            if let Some(label) = label {
                *last_seen = Some(label.clone());
            }
            Some(last_seen.clone())
        })
        .collect()
}

/// Resolve every level independently
pub fn resolve_levels(levels: &[LevelLabels]) -> Vec<LevelLabels> {
    levels.iter().map(|raw| resolve(raw)).collect()
}
