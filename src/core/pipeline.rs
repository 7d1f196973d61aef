//! Sheet pipeline: classify once, then stream data rows

use super::{assembler, classifier, expander::RecordExpander, extractor, layout, resolver};
use crate::config::HierarchyConfig;
use crate::error::{Diagnostics, TieredError, TieredResult};
use crate::types::{CellGrid, Classification, ExpandedRecord, FlatTable, WideTable};
use rayon::prelude::*;

/// Everything produced from one sheet
#[derive(Debug)]
pub struct SheetOutput {
    pub classification: Classification,
    /// Long layout
    pub records: Vec<ExpandedRecord>,
    pub wide: WideTable,
    /// Recoverable and row-fatal errors, in encounter order
    pub diagnostics: Diagnostics,
}

impl SheetOutput {
    pub fn wide_table(&self, name: &str, config: &HierarchyConfig) -> FlatTable {
        layout::wide_to_flat(name, &self.wide, config)
    }

    pub fn long_table(&self, name: &str, config: &HierarchyConfig) -> FlatTable {
        layout::long_to_flat(name, &self.records, config)
    }
}

/// Runs the hierarchy pipeline over cell grids sharing one configuration
pub struct SheetProcessor {
    config: HierarchyConfig,
}

impl SheetProcessor {
    pub fn new(config: HierarchyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Validate the configuration and classify the grid's columns
    pub fn classify(&self, grid: &CellGrid) -> TieredResult<Classification> {
        self.config.validate(grid.width())?;

        let raw = extractor::extract(grid, &self.config.level_rows)?;
        let filled = resolver::resolve_levels(&raw);
        let fixed_columns: Vec<usize> = self.config.fixed_keys.iter().map(|k| k.column).collect();

        classifier::classify(
            &filled,
            self.config.column_range(grid.width())?,
            &fixed_columns,
        )
    }

    /// Run the whole pipeline on one sheet.
    ///
    /// Configuration and range errors abort the sheet. Missing keys drop
    /// their row, unparsable cells and assembly conflicts only their cell;
    /// all three end up in [`SheetOutput::diagnostics`].
    pub fn process(&self, grid: &CellGrid) -> TieredResult<SheetOutput> {
        let classification = self.classify(grid)?;
        let expander = RecordExpander::new(&self.config, &classification.descriptors)?;

        let mut diagnostics = Diagnostics::new();
        let mut records = Vec::new();

        let last_row = self
            .config
            .data_end_row
            .map_or(grid.height(), |end| end.saturating_add(1).min(grid.height()));

        for row in self.config.data_start_row..last_row {
            if grid.is_blank_row(row) {
                tracing::debug!("row {} is blank, skipped", row);
                continue;
            }
            match expander.expand_row(grid, row, &mut diagnostics) {
                Ok(row_records) => records.extend(row_records),
                Err(error @ TieredError::MissingKey { .. }) => diagnostics.push(error),
                Err(error) => return Err(error),
            }
        }

        let wide = assembler::assemble(&records, &classification, &self.config, &mut diagnostics);

        tracing::debug!(
            "{} records, {} wide rows, {} diagnostics",
            records.len(),
            wide.rows.len(),
            diagnostics.len()
        );

        Ok(SheetOutput {
            classification,
            records,
            wide,
            diagnostics,
        })
    }
}

/// Process independent sheets in parallel.
///
/// Results keep the input order; a fatal error only affects its own sheet.
pub fn process_batch(
    sheets: Vec<(String, CellGrid)>,
    config: &HierarchyConfig,
) -> Vec<(String, TieredResult<SheetOutput>)> {
    let processor = SheetProcessor::new(config.clone());

    sheets
        .into_par_iter()
        .map(|(name, grid)| {
            let span = tracing::debug_span!("sheet", name = %name);
            let _guard = span.enter();
            let output = processor.process(&grid);
            (name, output)
        })
        .collect()
}
