//! Simsense - command-line access to atmospheric datasets.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use simsense::{
    export, find_dataset_files, AssetLayout, ConfigLoader, DataReader, RealDataManager,
    RetrievalStatus, SimulationManager, StatusFilter, DEFAULT_EXTENSION,
};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "simsense")]
#[command(about = "Locate, read and tabulate atmospheric datasets", long_about = None)]
struct Args {
    /// Enable debug logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Increase stderr log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List dataset files below a directory
    Files {
        /// Directory to search
        root: PathBuf,

        /// File name suffix to match
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Configuration file name used for status filtering
        #[arg(long, requires = "status")]
        config: Option<String>,

        /// Required retrieval status
        #[arg(long, value_enum, requires = "config")]
        status: Option<StatusArg>,

        /// Repository root holding `assets/configs` (defaults to the git top level)
        #[arg(long)]
        repo_root: Option<PathBuf>,
    },

    /// Print the fields of one record
    Show {
        /// Dataset file
        file: PathBuf,

        /// Group to read
        #[arg(long)]
        source: String,
    },

    /// Write daily VMR tables for a date range
    Export {
        /// Directory holding retrieval files
        root: PathBuf,

        /// Retrieval group to read
        #[arg(long)]
        source: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Output base name; `.csv` and `_time.csv` are appended
        #[arg(long)]
        output: PathBuf,
    },

    /// List simulations and their fields
    Simulations {
        /// Directory holding simulation files
        root: PathBuf,

        /// Explicit names, comma separated, paired with files in sorted order
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    /// The configuration's retrieval group is present
    Retrieved,
    /// The retrieval is present and converged
    Converged,
}

impl From<StatusArg> for RetrievalStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Retrieved => RetrievalStatus::Retrieved,
            StatusArg::Converged => RetrievalStatus::Converged,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    match args.command {
        Command::Files {
            root,
            extension,
            config,
            status,
            repo_root,
        } => {
            let filter = match (config, status) {
                (Some(config_name), Some(status)) => {
                    let layout = match repo_root {
                        Some(root) => AssetLayout::new(root),
                        None => AssetLayout::discover()?,
                    };
                    let config = ConfigLoader::new(layout)
                        .load(&config_name)?
                        .with_context(|| format!("Configuration not found: {}", config_name))?;
                    Some(StatusFilter::new(status.into(), config))
                }
                _ => None,
            };
            for path in find_dataset_files(&root, &extension, filter.as_ref())? {
                println!("{}", path.display());
            }
        }

        Command::Show { file, source } => {
            let record = DataReader::read_record(&file, &source)?;
            for (name, value) in record.iter() {
                println!("{:<24} {}", name, value.describe());
            }
        }

        Command::Export {
            root,
            source,
            start,
            end,
            output,
        } => {
            let start = start.and_hms_opt(0, 0, 0).context("invalid start")?;
            let end = end.and_hms_opt(23, 59, 59).context("invalid end")?;

            let paths = find_dataset_files(&root, DEFAULT_EXTENSION, None)?;
            let mut manager = RealDataManager::with_source(paths, source)?;
            manager.filter_by_date(start, end);
            let records: Vec<_> = manager.to_mapping(None)?.into_values().collect();

            export::export_vmr_csv(&records, start, end, &output)?;
            println!("Wrote {} records to {}.csv", records.len(), output.display());
        }

        Command::Simulations { root, names } => {
            let mut manager = SimulationManager::new(root)?;
            if !names.is_empty() {
                manager.set_names(names);
            }
            for (name, record) in manager.to_mapping()? {
                let fields: Vec<&str> = record.keys().collect();
                println!("{}: {}", name, fields.join(", "));
            }
        }
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    // With --log everything goes to the file at DEBUG
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Simsense");
        return Ok(());
    }

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("simsense={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
