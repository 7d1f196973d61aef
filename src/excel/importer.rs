//! Excel importer implementation - Excel (.xlsx) → cell grids

use crate::error::{TieredError, TieredResult};
use crate::types::{Cell, CellGrid};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads worksheets into fully materialized [`CellGrid`]s
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> TieredResult<Xlsx<BufReader<File>>> {
        open_workbook(&self.path).map_err(|e| {
            TieredError::Import(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn sheet_names(&self) -> TieredResult<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }

    /// Import every worksheet, in workbook order
    pub fn import(&self) -> TieredResult<Vec<(String, CellGrid)>> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                TieredError::Import(format!("Failed to read sheet '{}': {}", name, e))
            })?;
            sheets.push((name, Self::range_to_grid(&range)));
        }

        Ok(sheets)
    }

    /// Import a single worksheet by name
    pub fn import_sheet(&self, name: &str) -> TieredResult<CellGrid> {
        let mut workbook = self.open()?;
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| TieredError::Import(format!("Failed to read sheet '{}': {}", name, e)))?;
        Ok(Self::range_to_grid(&range))
    }

    /// Convert a used range into a grid anchored at A1.
    ///
    /// calamine trims leading empty rows and columns from the range, so
    /// cells are read by absolute position to keep configured indices valid.
    fn range_to_grid(range: &Range<Data>) -> CellGrid {
        let Some((end_row, end_col)) = range.end() else {
            return CellGrid::default();
        };

        let rows = (0..=end_row)
            .map(|row| {
                (0..=end_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map_or(Cell::Empty, Self::convert_cell)
                    })
                    .collect()
            })
            .collect();

        CellGrid::new(rows)
    }

    fn convert_cell(cell: &Data) -> Cell {
        match cell {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::from(s.as_str()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell() {
        assert_eq!(ExcelImporter::convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String("Sex".to_string())),
            Cell::Text("Sex".to_string())
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String(String::new())),
            Cell::Empty
        );
        assert_eq!(ExcelImporter::convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Float(1.25)),
            Cell::Number(1.25)
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Bool(true)),
            Cell::Text("TRUE".to_string())
        );
    }

    #[test]
    fn test_range_to_grid_keeps_absolute_positions() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Cat".to_string()));
        range.set_value((2, 3), Data::Float(4.0));

        let grid = ExcelImporter::range_to_grid(&range);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.get(0, 0), &Cell::Empty);
        assert_eq!(grid.get(1, 2), &Cell::Text("Cat".to_string()));
        assert_eq!(grid.get(2, 3), &Cell::Number(4.0));
    }

    #[test]
    fn test_range_to_grid_empty() {
        let range: Range<Data> = Range::empty();
        assert_eq!(ExcelImporter::range_to_grid(&range).height(), 0);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let importer = ExcelImporter::new("/nonexistent/path/file.xlsx");
        assert!(matches!(importer.import(), Err(TieredError::Import(_))));
    }
}
