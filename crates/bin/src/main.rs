//! Fama/French CLI binary.
//!
//! Provides a command-line interface to the monthly and annual research
//! factors.

mod integration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use famafrench::output::{CsvPresenter, ExportFormat, Exporter, TextPresenter};
use famafrench::{FIRST_MONTHLY_PERIOD, FIRST_YEAR, FactorDataset, FactorSelection, PeriodKey};
use integration::cache_manager::{CacheOptions, open_cache};
use integration::data_pipeline::{export_dataset, load_dataset, print_cache_info, resolve_format};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "famafrench")]
#[command(about = "Fama/French research factors: summary, monthly returns and cumulative value", long_about = None)]
#[command(version)]
struct Cli {
    /// Cache directory (defaults to the platform cache dir)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Re-download even if this month's artifact exists
    #[arg(long, global = true)]
    refresh: bool,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Read the factor archive from a local zip instead of downloading it
    #[arg(long, global = true)]
    archive: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean and standard deviation of annual returns
    Summary,

    /// Monthly returns, decimalized
    Monthly {
        /// First month (YYYYMM)
        #[arg(long, default_value_t = FIRST_MONTHLY_PERIOD.get())]
        start: i64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Value of 1 USD invested in a given year
    Plot {
        /// Year of the initial investment (YYYY)
        #[arg(long, default_value_t = FIRST_YEAR.get())]
        start: i64,

        /// Hide the excess market return
        #[arg(long)]
        no_mktrf: bool,

        /// Hide the size premium
        #[arg(long)]
        no_smb: bool,

        /// Hide the value premium
        #[arg(long)]
        no_hml: bool,

        /// Write the series as CSV to this path instead of drawing a table
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Write monthly returns and the annual summary to files
    Export {
        /// Output path for the monthly returns
        #[arg(long)]
        out: PathBuf,

        /// File format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<FileFormat>,

        /// First month (YYYYMM)
        #[arg(long, default_value_t = FIRST_MONTHLY_PERIOD.get())]
        start: i64,
    },

    /// Inspect or clean the artifact cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached artifacts
    List,
    /// Delete artifacts from previous months
    Prune,
    /// Print the cache directory
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FileFormat {
    Csv,
    Json,
}

impl From<FileFormat> for ExportFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => Self::Csv,
            FileFormat::Json => Self::PrettyJson,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = CacheOptions {
        dir: cli.cache_dir,
        refresh: cli.refresh,
        timeout: cli.timeout.map(Duration::from_secs),
        archive: cli.archive,
    };

    match cli.command {
        Commands::Summary => {
            let dataset = load_dataset(&options)?;
            let mut presenter = TextPresenter::new(io::stdout().lock());
            dataset.present_summary(&mut presenter)?;
        }
        Commands::Monthly { start, format } => {
            let dataset = load_dataset(&options)?;
            show_monthly(&dataset, PeriodKey::new(start), format)?;
        }
        Commands::Plot {
            start,
            no_mktrf,
            no_smb,
            no_hml,
            csv,
        } => {
            let dataset = load_dataset(&options)?;
            let selection = FactorSelection::all()
                .with_mkt_rf(!no_mktrf)
                .with_smb(!no_smb)
                .with_hml(!no_hml);
            plot(&dataset, selection, PeriodKey::new(start), csv)?;
        }
        Commands::Export { out, format, start } => {
            let format = resolve_format(&out, format.map(ExportFormat::from))?;
            let dataset = load_dataset(&options)?;
            let (monthly, summary) = export_dataset(&dataset, PeriodKey::new(start), &out, format)?;
            println!("Wrote {}", monthly.display());
            println!("Wrote {}", summary.display());
        }
        Commands::Cache { action } => match action {
            CacheAction::Path => println!("{}", options.cache_dir().display()),
            CacheAction::List => print_cache_info(&open_cache(&options)?)?,
            CacheAction::Prune => {
                let removed = open_cache(&options)?.prune()?;
                for path in &removed {
                    println!("Removed {}", path.display());
                }
                println!("Pruned {} artifact(s)", removed.len());
            }
        },
    }

    Ok(())
}

fn show_monthly(
    dataset: &FactorDataset,
    start: PeriodKey,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = dataset.monthly(start);
    match format {
        OutputFormat::Text => {
            println!("\nMonthly Returns (decimal) from {}:\n", view.start());
            println!("{}", view.to_frame()?);
        }
        OutputFormat::Csv => print!("{}", view.export_to_string(ExportFormat::Csv)?),
        OutputFormat::Json => println!("{}", view.export_to_string(ExportFormat::PrettyJson)?),
    }
    Ok(())
}

fn plot(
    dataset: &FactorDataset,
    selection: FactorSelection,
    start: PeriodKey,
    csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = csv {
        let mut presenter = CsvPresenter::new(BufWriter::new(File::create(&path)?));
        dataset.plot_annual(selection, start, &mut presenter)?;
        presenter.into_inner()?;
        println!("Wrote {}", path.display());
    } else {
        let mut presenter = TextPresenter::new(io::stdout().lock());
        dataset.plot_annual(selection, start, &mut presenter)?;
    }
    Ok(())
}
