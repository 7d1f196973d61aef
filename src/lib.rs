//! Tiered - hierarchical header resolution for statistical spreadsheets
//!
//! Statistical tables often spread a classification hierarchy over several
//! header rows, stating each category once across a merged span of columns.
//! This library reconstructs which columns belong to which category at every
//! level and turns each data row into unambiguous records.
//!
//! # Pipeline
//!
//! - Header extraction and merged-label resolution (forward fill per level)
//! - Column classification into hierarchy paths and level-0 spans
//! - Row expansion into long records
//! - Wide assembly: one column per top-level category
//!
//! # Example
//!
//! ```no_run
//! use tiered_sheets::config::parse_config;
//! use tiered_sheets::core::SheetProcessor;
//! use tiered_sheets::excel::ExcelImporter;
//! use std::path::Path;
//!
//! let config = parse_config(Path::new("survey.yaml"))?;
//! let grid = ExcelImporter::new("survey.xlsx").import_sheet("Table 1")?;
//!
//! let output = SheetProcessor::new(config).process(&grid)?;
//! println!("Categories: {}", output.wide.categories.len());
//! println!("Wide rows: {}", output.wide.rows.len());
//! # Ok::<(), tiered_sheets::error::TieredError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use config::{FixedKey, HierarchyConfig};
pub use error::{Diagnostics, TieredError, TieredResult};
pub use types::{Cell, CellGrid, CategoryLabel, ExpandedRecord, WideRecord, WideTable};
