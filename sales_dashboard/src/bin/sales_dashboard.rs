use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sales_dashboard::report::{write_forecast, NO_DATA_WARNING};
use sales_dashboard::{Dashboard, DashboardConfig, DashboardError, Filter, SalesFilter};
use sales_forecast::{clean_file, CleaningOptions};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sales dashboard and weekly sales forecast", long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a raw sales export
    Clean {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the filtered sales report
    Report {
        #[arg(long)]
        data: Option<PathBuf>,
        /// A year present in the data, or All
        #[arg(long, default_value = "All")]
        year: Filter<i32>,
        /// A time of sale present in the data, or All
        #[arg(long, default_value = "All")]
        time_of_sale: Filter<String>,
    },
    /// Print the weekly sales forecast
    Forecast {
        #[arg(long)]
        data: Option<PathBuf>,
        /// Print `{"YYYY-MM-DD": value}` JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sales_dashboard=info,sales_forecast=info",
        1 => "sales_dashboard=debug,sales_forecast=debug",
        _ => "sales_dashboard=trace,sales_forecast=trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

/// Load the dataset, or print the no-data warning and return `None`
fn load_dashboard(config: DashboardConfig) -> Result<Option<Dashboard>> {
    match Dashboard::load(config) {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(DashboardError::NoData(reason)) => {
            warn!(%reason, "no data");
            println!("Warning: {}", NO_DATA_WARNING);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Clean { input, output } => {
            let input = input.unwrap_or(config.raw_path);
            let output = output.unwrap_or(config.data_path);
            let report = clean_file(&input, &output, &CleaningOptions::default())
                .with_context(|| format!("failed to clean {}", input.display()))?;
            info!(
                rows_read = report.rows_read,
                duplicates_removed = report.duplicates_removed,
                transaction_types_filled = report.transaction_types_filled,
                total_price_derived = report.total_price_derived,
                "cleaning finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Report {
            data,
            year,
            time_of_sale,
        } => {
            if let Some(data) = data {
                config.data_path = data;
            }
            if let Some(dashboard) = load_dashboard(config)? {
                let report = dashboard.report(&SalesFilter::new(year, time_of_sale))?;
                print!("{}", report);
            }
        }
        Command::Forecast { data, json } => {
            if let Some(data) = data {
                config.data_path = data;
            }
            let symbol = config.currency_symbol.clone();
            if let Some(dashboard) = load_dashboard(config)? {
                let forecast = dashboard.forecast();
                match (&forecast, json) {
                    (Some(forecast), true) => println!("{}", forecast.to_json()?),
                    (None, true) => println!("null"),
                    (_, false) => {
                        let mut out = String::new();
                        write_forecast(&mut out, forecast.as_ref(), &symbol)?;
                        print!("{}", out);
                    }
                }
            }
        }
    }

    Ok(())
}
