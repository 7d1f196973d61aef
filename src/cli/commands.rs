use crate::config::{self, HierarchyConfig};
use crate::core::{process_batch, SheetOutput, SheetProcessor};
use crate::error::{TieredError, TieredResult};
use crate::excel::ExcelImporter;
use crate::types::{CellGrid, Classification};
use crate::writer;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output table layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// One row per key combination, one column per top-level category
    Wide,
    /// One row per value cell with every hierarchy level
    Long,
}

fn load_config(config_path: &Path, sheet: Option<String>) -> TieredResult<HierarchyConfig> {
    let mut config = config::parse_config(config_path)?;
    if sheet.is_some() {
        config.sheet = sheet;
    }
    Ok(config)
}

fn load_sheets(
    input: &Path,
    config: &HierarchyConfig,
) -> TieredResult<Vec<(String, CellGrid)>> {
    let importer = ExcelImporter::new(input);
    match &config.sheet {
        Some(name) => Ok(vec![(name.clone(), importer.import_sheet(name)?)]),
        None => importer.import(),
    }
}

fn print_diagnostics(output: &SheetOutput, verbose: bool) {
    let diagnostics = &output.diagnostics;
    if diagnostics.is_empty() {
        return;
    }

    println!(
        "      {} {} diagnostics ({} missing keys, {} unparsable values, {} conflicts)",
        "⚠️".yellow(),
        diagnostics.len(),
        diagnostics.missing_keys(),
        diagnostics.unparsable(),
        diagnostics.conflicts()
    );
    if verbose {
        for diagnostic in diagnostics.iter() {
            println!("         {}", diagnostic.to_string().yellow());
        }
    }
}

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output: PathBuf,
    config_path: PathBuf,
    sheet: Option<String>,
    layout: Layout,
    verbose: bool,
) -> TieredResult<()> {
    println!("{}", "📊 Tiered - Resolving header hierarchy".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!();

    // Fail on a bad output path before doing any work
    writer::OutputFormat::from_path(&output)?;

    let config = load_config(&config_path, sheet)?;
    let sheets = load_sheets(&input, &config)?;

    if verbose {
        println!("   Found {} sheets", sheets.len());
    }

    let mut tables = Vec::new();
    let mut first_error: Option<TieredError> = None;

    for (name, result) in process_batch(sheets, &config) {
        match result {
            Ok(sheet_output) => {
                println!(
                    "   {} {}: {} categories, {} records, {} wide rows",
                    "✅".green(),
                    name.bright_blue().bold(),
                    sheet_output.wide.categories.len(),
                    sheet_output.records.len(),
                    sheet_output.wide.rows.len()
                );
                print_diagnostics(&sheet_output, verbose);
                tables.push(match layout {
                    Layout::Wide => sheet_output.wide_table(&name, &config),
                    Layout::Long => sheet_output.long_table(&name, &config),
                });
            }
            Err(error) => {
                println!("   {} {}: {}", "❌".red(), name.bright_blue().bold(), error);
                first_error.get_or_insert(error);
            }
        }
    }

    if tables.is_empty() {
        return Err(first_error.unwrap_or_else(|| {
            TieredError::Import(format!("No worksheets found in {}", input.display()))
        }));
    }

    writer::write_tables(&output, tables)?;

    println!();
    println!("{}", "✅ Conversion complete".bold().green());
    Ok(())
}

#[derive(Serialize)]
struct SheetClassification {
    sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn print_classification(name: &str, classification: &Classification, config: &HierarchyConfig) {
    println!("   📄 Sheet: {}", name.bright_blue().bold());

    println!("      {}", "Level-0 spans:".cyan());
    for span in &classification.spans {
        println!(
            "         {:>4}..={:<4} {}",
            span.span.first,
            span.span.last,
            span.category.render(&config.unknown_label, &config.na_marker)
        );
    }

    println!("      {}", "Columns:".cyan());
    for descriptor in &classification.descriptors {
        let path: Vec<&str> = descriptor
            .path
            .iter()
            .map(|step| step.label.render(&config.unknown_label, &config.na_marker))
            .collect();
        println!(
            "         {:>4}  {}",
            descriptor.column_index,
            path.join(" → ")
        );
    }
}

/// Execute the inspect command - show how header columns are classified.
///
/// A sheet that fails to classify is reported and skipped; the command only
/// fails when no sheet could be classified.
pub fn inspect(
    input: PathBuf,
    config_path: PathBuf,
    sheet: Option<String>,
    json: bool,
) -> TieredResult<()> {
    let config = load_config(&config_path, sheet)?;
    let sheets = load_sheets(&input, &config)?;
    let processor = SheetProcessor::new(config);

    let mut classified = Vec::with_capacity(sheets.len());
    let mut first_error: Option<TieredError> = None;

    for (name, grid) in sheets {
        let entry = match processor.classify(&grid) {
            Ok(classification) => SheetClassification {
                sheet: name,
                classification: Some(classification),
                error: None,
            },
            Err(error) => {
                tracing::warn!("sheet '{}': {}", name, error);
                let entry = SheetClassification {
                    sheet: name,
                    classification: None,
                    error: Some(error.to_string()),
                };
                first_error.get_or_insert(error);
                entry
            }
        };
        classified.push(entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
    } else {
        println!("{}", "🔍 Tiered - Header classification".bold().green());
        println!("   File: {}", input.display());
        println!();
        for entry in &classified {
            match (&entry.classification, &entry.error) {
                (Some(classification), _) => {
                    print_classification(&entry.sheet, classification, processor.config());
                }
                (None, error) => println!(
                    "   {} {}: {}",
                    "❌".red(),
                    entry.sheet.bright_blue().bold(),
                    error.as_deref().unwrap_or("not classified")
                ),
            }
            println!();
        }
    }

    if classified.iter().all(|entry| entry.classification.is_none()) {
        return Err(first_error.unwrap_or_else(|| {
            TieredError::Import(format!("No worksheets found in {}", input.display()))
        }));
    }

    Ok(())
}
