//! Excel exporter implementation - flat tables → Excel (.xlsx)

use crate::error::{TieredError, TieredResult};
use crate::types::{FlatTable, FlatValue};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Excel worksheet names are limited to 31 characters
const MAX_SHEET_NAME: usize = 31;

/// Writes one worksheet per flat table
pub struct ExcelExporter {
    tables: Vec<FlatTable>,
}

impl ExcelExporter {
    pub fn new(tables: Vec<FlatTable>) -> Self {
        Self { tables }
    }

    /// Export all tables to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> TieredResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for (index, table) in self.tables.iter().enumerate() {
            let worksheet = workbook.add_worksheet();
            let name = Self::sanitize_sheet_name(&table.name, index);
            worksheet
                .set_name(&name)
                .map_err(|e| TieredError::Export(format!("Failed to set worksheet name: {}", e)))?;
            Self::export_table(worksheet, table, &header_format)?;
        }

        workbook
            .save(output_path)
            .map_err(|e| TieredError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn export_table(
        worksheet: &mut Worksheet,
        table: &FlatTable,
        header_format: &Format,
    ) -> TieredResult<()> {
        for (col_idx, name) in table.columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, Self::excel_column(col_idx)?, name, header_format)
                .map_err(|e| TieredError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1).map_err(|_| {
                TieredError::Export(format!("Row {} exceeds the worksheet row limit", row_idx + 1))
            })?;
            for (col_idx, value) in row.iter().enumerate() {
                let col = Self::excel_column(col_idx)?;
                let written = match value {
                    FlatValue::Text(s) => worksheet.write_string(excel_row, col, s).map(|_| ()),
                    FlatValue::Number(n) => worksheet.write_number(excel_row, col, *n).map(|_| ()),
                    FlatValue::Null => Ok(()),
                };
                written.map_err(|e| {
                    TieredError::Export(format!("Failed to write cell: {}", e))
                })?;
            }
        }

        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| TieredError::Export(format!("Failed to freeze header: {}", e)))?;

        Ok(())
    }

    fn excel_column(col_idx: usize) -> TieredResult<u16> {
        u16::try_from(col_idx).map_err(|_| {
            TieredError::Export(format!("Column {col_idx} exceeds the worksheet column limit"))
        })
    }

    /// Make a name valid for an Excel worksheet
    fn sanitize_sheet_name(name: &str, index: usize) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| match c {
                '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
                _ => c,
            })
            .take(MAX_SHEET_NAME)
            .collect();
        let cleaned = cleaned.trim_matches('\'').trim().to_string();

        if cleaned.is_empty() {
            format!("Sheet{}", index + 1)
        } else {
            cleaned
        }
    }
}
