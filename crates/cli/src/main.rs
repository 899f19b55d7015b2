// Settlebook CLI - settlement export ingestion and aggregation

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use settlebook_engine::{
    combine, process, totals, SourceCatalog, SourceId,
};
use settlebook_engine::source::Granularity;
use settlebook_io::store::{load_series_set, FileStore, ResultStore};

use exit_codes::{
    EXIT_SUCCESS,
    EXIT_INGEST_UNKNOWN_SOURCE, EXIT_INGEST_DECODE, EXIT_INGEST_CATALOG,
    EXIT_STORE_IO,
};

#[derive(Parser)]
#[command(name = "sbook")]
#[command(about = "Aggregate daily settlement exports into a combined revenue table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a billing export and store its per-day series
    #[command(after_help = "\
Examples:
  sbook ingest october.xlsx --source fixed-fee
  sbook ingest cycle.csv --source cycle-b --json
  sbook ingest offline.xls --source offline --catalog sources.toml")]
    Ingest {
        /// Export file (.xlsx, .xls, or .csv)
        file: PathBuf,

        /// Which source this export belongs to
        /// (fixed-fee, cycle-a, cycle-b, offline)
        #[arg(long, short = 's')]
        source: String,

        /// Directory holding stored results
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// TOML file overriding built-in source specs
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output ingest stats as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Merge all stored series into the combined daily table
    #[command(after_help = "\
Examples:
  sbook combine
  sbook combine --json | jq .
  sbook combine --output combined.json")]
    Combine {
        /// Directory holding stored results
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output JSON to stdout instead of the text table
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Reset all stored results to empty
    Clear {
        /// Directory holding stored results
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ingest { file, source, data_dir, catalog, json } => {
            cmd_ingest(file, source, data_dir, catalog, json)
        }
        Commands::Combine { data_dir, json, output } => cmd_combine(data_dir, json, output),
        Commands::Clear { data_dir } => cmd_clear(data_dir),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_ingest(
    file: PathBuf,
    source: String,
    data_dir: PathBuf,
    catalog_path: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let source_id = SourceId::from_str(&source).map_err(|e| {
        CliError {
            code: EXIT_INGEST_UNKNOWN_SOURCE,
            message: e.to_string(),
            hint: Some("valid sources: fixed-fee, cycle-a, cycle-b, offline".into()),
        }
    })?;

    let catalog = match catalog_path {
        Some(ref path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CliError::catalog(format!("cannot read {}: {e}", path.display()))
            })?;
            SourceCatalog::from_toml(&content).map_err(|e| CliError::catalog(e.to_string()))?
        }
        None => SourceCatalog::builtin(),
    };
    let spec = catalog.spec(source_id);

    let rows = settlebook_io::import_rows(&file).map_err(CliError::decode)?;
    let report = process(source_id, spec, &rows);

    let store = FileStore::new(&data_dir);
    store.put(source_id, &report.daily).map_err(CliError::store)?;
    if spec.granularity == Granularity::ShopDate {
        store.put_shops(&report.shops).map_err(CliError::store)?;
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::store(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &report.stats;
    eprintln!(
        "{}: {} rows read, {} skipped — {} shops, {} days, total {:.2}",
        source_id, s.rows_read, s.rows_skipped, s.shop_count, s.day_count, s.total_amount,
    );

    Ok(())
}

/// Combined table plus footer totals, as written by `--json`/`--output`.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CombinedOutput {
    days: Vec<settlebook_engine::CombinedDailyRecord>,
    totals: settlebook_engine::model::CombinedTotals,
}

fn cmd_combine(
    data_dir: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let store = FileStore::new(&data_dir);
    let set = load_series_set(&store).map_err(CliError::store)?;
    let days = combine(&set);
    let totals = totals(&days);

    let out = CombinedOutput { days, totals };

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::store(format!("JSON serialization error: {e}")))?;
        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::store(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    } else {
        print_table(&out);
    }

    eprintln!(
        "{} days — total {:.2}, shops {}",
        out.totals.day_count, out.totals.total_amount, out.totals.total_shop_count,
    );

    Ok(())
}

fn print_table(out: &CombinedOutput) {
    println!(
        "{:<12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>6}",
        "date", "fixed-fee", "cycle-a", "cycle-b", "offline", "total", "shops",
    );
    for day in &out.days {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>6}",
            day.date,
            day.fixed_fee_amount,
            day.cycle_a_amount,
            day.cycle_b_amount,
            day.offline_amount,
            day.total_amount,
            day.total_shop_count,
        );
    }
}

fn cmd_clear(data_dir: PathBuf) -> Result<(), CliError> {
    let store = FileStore::new(&data_dir);
    store.clear().map_err(CliError::store)?;
    eprintln!("cleared stored results in {}", data_dir.display());
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INGEST_DECODE, message: msg.into(), hint: None }
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INGEST_CATALOG, message: msg.into(), hint: None }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE_IO, message: msg.into(), hint: None }
    }
}
