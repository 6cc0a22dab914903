//! CLI entry point for the auto-mpg tool.
//!
//! Loads the dataset (downloading it on first use), then prints the records
//! or one of the average-mpg views, optionally to a file and as a chart.

use anyhow::Result;
use autompg::clean::Cleaner;
use autompg::config::{
    DEFAULT_CLEAN_FILE, DEFAULT_DATA_URL, DEFAULT_LOG_FILE, DEFAULT_RAW_CACHE, Settings,
};
use autompg::fetch::{BasicClient, HttpFetcher};
use autompg::logging::{self, LogConfig};
use autompg::output::{OutputFormat, open_output, write_averages, write_records};
use autompg::plot::{render_bar_chart, render_line_chart, write_chart};
use autompg::{AggregationStore, SortOrder};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "autompg")]
#[command(about = "Sort and average the UCI auto-mpg dataset", long_about = None)]
struct Cli {
    /// URL of the raw dataset
    #[arg(long, global = true, env = "AUTOMPG_DATA_URL", default_value = DEFAULT_DATA_URL)]
    url: String,

    /// Local copy of the downloaded dataset
    #[arg(long, global = true, env = "AUTOMPG_RAW_CACHE", default_value = DEFAULT_RAW_CACHE)]
    raw_cache: PathBuf,

    /// Whitespace-normalized copy of the raw cache
    #[arg(long, global = true, env = "AUTOMPG_CLEAN_FILE", default_value = DEFAULT_CLEAN_FILE)]
    clean_file: PathBuf,

    /// JSON log file, overwritten on each run
    #[arg(long, global = true, env = "LOG_FILE_PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            data_url: self.url.clone(),
            raw_cache: self.raw_cache.clone(),
            clean_file: self.clean_file.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record as make,model,year,mpg
    Print {
        /// Sort order applied before printing (file order if omitted)
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print the average mpg of each model year
    #[command(alias = "mpg_by_year")]
    MpgByYear {
        #[command(flatten)]
        out: OutputArgs,

        /// Write a line chart (SVG) of average mpg by year
        #[arg(short, long, num_args = 0..=1, default_missing_value = "mpg_by_year.svg")]
        plot: Option<PathBuf>,
    },
    /// Print the average mpg of each make
    #[command(alias = "mpg_by_make")]
    MpgByMake {
        #[command(flatten)]
        out: OutputArgs,

        /// Write a bar chart (SVG) of average mpg by make
        #[arg(short, long, num_args = 0..=1, default_missing_value = "mpg_by_make.svg")]
        plot: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output file (standard output if omitted)
    #[arg(short, long)]
    ofile: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Default,
    Year,
    Mpg,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Default => SortOrder::Default,
            SortArg::Year => SortOrder::Year,
            SortArg::Mpg => SortOrder::Mpg,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let settings = cli.settings();

    let _log_guard = logging::init(&LogConfig::new(&settings.log_file))?;
    debug!(?settings, "Settings resolved");

    let fetcher = HttpFetcher::new(BasicClient::new(), &settings.data_url, &settings.raw_cache);
    let cleaner = Cleaner::new(&settings.raw_cache, &settings.clean_file);
    let mut store = AggregationStore::load(&cleaner, &fetcher).await?;

    match cli.command {
        Commands::Print { sort, out } => {
            if let Some(sort) = sort {
                store.sort(sort.into());
            }
            let writer = open_output(out.ofile.as_deref())?;
            write_records(writer, store.records(), out.format.into())?;
            info!(records = store.records().len(), "Printed records");
        }
        Commands::MpgByYear { out, plot } => {
            store.compute_yearly_averages();
            let writer = open_output(out.ofile.as_deref())?;
            write_averages(writer, store.yearly_averages(), out.format.into())?;

            if let Some(path) = plot {
                write_chart(&path, &render_line_chart(store.yearly_averages())?)?;
            }
        }
        Commands::MpgByMake { out, plot } => {
            store.compute_averages_by_make();
            let writer = open_output(out.ofile.as_deref())?;
            write_averages(writer, store.averages_by_make(), out.format.into())?;

            if let Some(path) = plot {
                write_chart(&path, &render_bar_chart(store.averages_by_make())?)?;
            }
        }
    }

    Ok(())
}
