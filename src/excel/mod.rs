//! Excel import/export
//!
//! - Import: Excel (.xlsx) → cell grids
//! - Export: flat tables → Excel (.xlsx)

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
