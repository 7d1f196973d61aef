use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tiered_sheets::cli::{self, Layout};
use tiered_sheets::error::TieredResult;

#[derive(Parser)]
#[command(name = "tiered")]
#[command(about = "Resolve merged multi-level spreadsheet headers into normalized tables.")]
#[command(long_about = "Tiered - hierarchical header resolution for statistical spreadsheets

Header rows that state a category once across a merged span are forward-filled,
every data column is classified under its full category path, and each data
row is expanded into normalized records.

COMMANDS:
  convert   - Workbook → wide or long table (.xlsx, .json, .yaml)
  inspect   - Show column classification and level-0 spans

EXAMPLES:
  tiered inspect survey.xlsx --config survey.yaml
  tiered convert survey.xlsx wide.xlsx --config survey.yaml
  tiered convert survey.xlsx long.json --config survey.yaml --layout long

Set RUST_LOG=debug for classification and NA provenance details.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert a workbook into a normalized table.

Every sheet (or the one named by --sheet or the config's 'sheet') is
processed independently; a sheet that fails does not stop the others.

CONFIG (YAML, 0-based indices):
  level_rows: [3, 4]
  data_start_row: 5
  fixed_keys:
    - { column: 0, name: period }
    - { column: 1, name: region, default: Total }

OUTPUT:
  Format follows the output extension: .xlsx, .json, .yaml/.yml")]
    /// Convert a workbook into a wide or long table
    Convert {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Output file (.xlsx, .json, .yaml)
        output: PathBuf,

        /// Hierarchy configuration (YAML)
        #[arg(short, long, env = "TIERED_CONFIG")]
        config: PathBuf,

        /// Process only this worksheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output layout
        #[arg(short, long, value_enum, default_value = "wide")]
        layout: Layout,

        /// Show every diagnostic
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how header columns are classified
    Inspect {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Hierarchy configuration (YAML)
        #[arg(short, long, env = "TIERED_CONFIG")]
        config: PathBuf,

        /// Inspect only this worksheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tiered=debug,tiered_sheets=debug"
    } else {
        "tiered=warn,tiered_sheets=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> TieredResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            sheet,
            layout,
            verbose,
        } => {
            init_tracing(verbose);
            cli::convert(input, output, config, sheet, layout, verbose)
        }

        Commands::Inspect {
            input,
            config,
            sheet,
            json,
        } => {
            init_tracing(false);
            cli::inspect(input, config, sheet, json)
        }
    }
}
