mod config;
mod error;
mod extract;
mod grid;
mod output;
mod pipeline;
mod record_store;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use record_store::AssetStore;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "asset_sheet", about = "Extract asset records from a fetched inventory grid")]
struct Cli {
    /// TOML config file (missing file means defaults)
    #[arg(short, long, global = true, default_value = ".config/asset_sheet.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from the grid file and write them out
    Extract {
        /// Grid JSON file (array of sheets)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Header marker text that anchors the column windows
        #[arg(long)]
        header: Option<String>,
        /// Also write a MySQL import script here
        #[arg(long)]
        sql: Option<PathBuf>,
        /// Skip writing the run to the asset store
        #[arg(long)]
        no_store: bool,
        /// Process sheets one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },
    /// Show asset store statistics
    Stats,
    /// Print the records of a stored run
    Show { run_id: i64 },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load(&cli.config)?;

    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter.as_str().into()),
        )
        .init();

    match cli.command {
        Commands::Extract {
            input,
            output,
            header,
            sql,
            no_store,
            sequential,
        } => {
            let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
            let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
            let header = header.unwrap_or_else(|| cfg.header_marker.clone());
            let mode = if sequential || !cfg.parallel {
                pipeline::Mode::Sequential
            } else {
                pipeline::Mode::Parallel
            };

            info!(input = %input.display(), header = %header, ?mode, "Processing...");
            let sheets = grid::load_sheets(&input)?;
            let extraction = pipeline::run_sheets(&sheets, &header, mode);

            for summary in &extraction.sheets {
                info!(
                    sheet = %summary.title,
                    anchor_found = summary.anchor_found,
                    candidates = summary.candidates,
                    records = summary.records,
                    skipped = summary.skipped,
                    "Sheet"
                );
            }
            for issue in &extraction.diagnostics {
                warn!(error = %issue, "Diagnostic");
            }

            output::write_json(&output, &extraction.records)?;
            if let Some(sql) = sql {
                output::write_sql(&sql, &extraction.records)?;
            }

            if !no_store {
                let mut store = open_store(&cfg.db_path)?;
                let fingerprint = AssetStore::fingerprint(&extraction.records)?;
                let unchanged = store
                    .latest_run()?
                    .is_some_and(|prev| prev.fingerprint == fingerprint);
                let run_id = store.record_run(&extraction)?;
                info!(run_id, unchanged, "Run recorded");
            }

            info!(
                sheets = extraction.sheets.len(),
                records = extraction.records.len(),
                diagnostics = extraction.diagnostics.len(),
                output = %output.display(),
                "Completed"
            );
        }
        Commands::Stats => {
            let store = open_store(&cfg.db_path)?;
            let (runs, assets) = store.get_counts()?;
            println!("Runs:    {runs}");
            println!("Records: {assets}");
            if let Some(run) = store.latest_run()? {
                println!(
                    "Latest:  #{} at {} ({} sheets, {} records, {} diagnostics)",
                    run.id, run.created_at, run.sheets, run.records, run.diagnostics
                );
                println!("Fingerprint: {}", run.fingerprint);
            }
        }
        Commands::Show { run_id } => {
            let store = open_store(&cfg.db_path)?;
            let records = store.get_run_records(run_id)?;
            if records.is_empty() {
                println!("No records for run {run_id}.");
            } else {
                println!("{}", output::render_json(&records)?);
            }
        }
    }

    Ok(())
}

fn open_store(db_path: &str) -> Result<AssetStore, Box<dyn std::error::Error>> {
    if let Some(dir) = Path::new(db_path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(AssetStore::new(db_path)?)
}
