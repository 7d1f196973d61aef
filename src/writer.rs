use crate::error::{TieredError, TieredResult};
use crate::excel::ExcelExporter;
use crate::types::FlatTable;
use std::fs;
use std::path::Path;

/// Serialization chosen from an output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> TieredResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(TieredError::Configuration(format!(
                "unsupported output extension '.{}' (expected .xlsx, .json, .yaml)",
                other
            ))),
        }
    }
}

/// Write flat tables to `path` in the format its extension names
pub fn write_tables(path: &Path, tables: Vec<FlatTable>) -> TieredResult<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Xlsx => ExcelExporter::new(tables).export(path),
        OutputFormat::Json => {
            let content = serde_json::to_string_pretty(&tables)?;
            fs::write(path, content)?;
            Ok(())
        }
        OutputFormat::Yaml => {
            let content = serde_yaml::to_string(&tables)?;
            fs::write(path, content)?;
            Ok(())
        }
    }
}
