use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use leitos::types::{CapacityPolicy, OccupancyReport};
use leitos::{CrawlerConfig, LogObserver, ScraperError, WebScraper, crawl_html, crawl_text};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "leitos")]
#[command(about = "Hospital bed-occupancy crawler for the Bahia health dashboard", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(long, help = "Reject rows reporting more occupied beds than existing ones")]
    strict: bool,
}

impl ReportArgs {
    fn capacity_policy(&self) -> CapacityPolicy {
        if self.strict {
            CapacityPolicy::Strict
        } else {
            CapacityPolicy::Lenient
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live dashboard and build the occupancy report
    Fetch {
        #[arg(long, help = "Dashboard URL (defaults to the Bahia transparency portal)")]
        url: Option<String>,

        #[arg(
            long,
            value_name = "SECS",
            default_value_t = 360,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Request timeout in seconds"
        )]
        timeout: u64,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Build the report from a locally saved copy of the dashboard page
    File {
        #[arg(help = "Path to the saved HTML page")]
        path: PathBuf,

        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "Position of the occupancy table among the page tables"
        )]
        table_index: u16,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Build the report from region text already rendered by a browser
    Text {
        #[arg(long, help = "File holding the text of the update-date label")]
        date: PathBuf,

        #[arg(long, help = "File holding the text of the occupancy table")]
        table: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn read_file(path: &Path) -> Result<String, ScraperError> {
    log::debug!("Reading {}", path.display());
    Ok(fs::read_to_string(path)?)
}

fn print_report(report: &OccupancyReport, format: &OutputFormat) {
    match format {
        OutputFormat::Json => serialize_json(report),
        OutputFormat::Text => println!("{}", report),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    log::info!("Starting bed-occupancy crawler");

    let observer = LogObserver;

    let (result, format) = match cli.command {
        Commands::Fetch {
            url,
            timeout,
            report,
        } => {
            let defaults = CrawlerConfig::default();
            let config = CrawlerConfig {
                url: url.unwrap_or(defaults.url),
                timeout: Duration::from_secs(timeout),
                capacity_policy: report.capacity_policy(),
                ..defaults
            };

            let scraper = WebScraper::new(config).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            (scraper.crawl(&observer).await, report.format)
        }

        Commands::File {
            path,
            table_index,
            report,
        } => {
            let config = CrawlerConfig {
                table_index: usize::from(table_index),
                capacity_policy: report.capacity_policy(),
                ..CrawlerConfig::default()
            };

            let result =
                read_file(&path).and_then(|html| crawl_html(&html, &config, &observer));
            (result, report.format)
        }

        Commands::Text {
            date,
            table,
            report,
        } => {
            let result = read_file(&date).and_then(|date_text| {
                let table_text = read_file(&table)?;
                crawl_text(&date_text, &table_text, report.capacity_policy(), &observer)
            });
            (result, report.format)
        }
    };

    match result {
        Ok(report) => print_report(&report, &format),
        Err(e) => {
            log::error!("Error building occupancy report: {}", e);
            process::exit(1);
        }
    }
}
