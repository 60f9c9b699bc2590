use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use employer_cost_engine::api::{AppState, create_router};
use employer_cost_engine::batch::{
    BatchProcessor, format_currency, labelled_summary_rows, read_table, write_detail,
    write_summary,
};
use employer_cost_engine::calculation::CostCalculator;
use employer_cost_engine::config::{ConfigLoader, StatutoryConfig};
use employer_cost_engine::logging::init_logger;
use employer_cost_engine::models::{CompensationProfile, Regime, TOTAL_ANNUAL_COLUMN};

#[derive(Debug, Parser)]
#[command(name = "employer-cost-engine", version, about = "Employer cost calculator for CLT and PJ hiring")]
struct Cli {
    /// Directory with statutory.yaml, inss_employee.yaml and income_tax.yaml.
    /// Built-in 2025 tables are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: SocketAddr,
    },
    /// Compute a CSV of employees and write the detail and summary tables.
    Batch {
        /// CSV file with a header row.
        #[arg(long)]
        input: PathBuf,
        /// Column holding each employee's salary.
        #[arg(long)]
        salary_column: String,
        /// Column to group the summary by.
        #[arg(long)]
        group_column: String,
        /// Column to sum per group.
        #[arg(long, default_value = TOTAL_ANNUAL_COLUMN)]
        value_column: String,
        /// JSON file with the benefit settings shared by every row.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Hiring regime, overriding the profile's.
        #[arg(long)]
        regime: Option<Regime>,
        /// Where detail.csv and summary.csv are written.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Compute rows on all cores.
        #[arg(long)]
        parallel: bool,
    },
}

fn load_config(dir: Option<&PathBuf>) -> Result<StatutoryConfig> {
    match dir {
        Some(dir) => {
            let loader = ConfigLoader::load(dir)
                .with_context(|| format!("loading statutory tables from {}", dir.display()))?;
            Ok(loader.into_config())
        }
        None => Ok(StatutoryConfig::default()),
    }
}

fn load_profile(path: Option<&PathBuf>) -> Result<CompensationProfile> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing profile {}", path.display()))
        }
        None => Ok(CompensationProfile::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    info!(reference_year = config.rates.reference_year, "Statutory tables loaded");
    let calculator = CostCalculator::new(config);

    match cli.command {
        Command::Serve { bind } => {
            let router = create_router(AppState::new(calculator));
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("binding {}", bind))?;
            info!(address = %bind, "Listening");
            axum::serve(listener, router).await.context("serving HTTP")?;
        }
        Command::Batch {
            input,
            salary_column,
            group_column,
            value_column,
            profile,
            regime,
            output_dir,
            parallel,
        } => {
            let mut template = load_profile(profile.as_ref())?;
            if let Some(regime) = regime {
                template.regime = regime;
            }

            let table = read_table(&input)?;
            let outcome = BatchProcessor::new(calculator)
                .with_value_column(value_column)
                .with_parallelism(parallel)
                .run_batch(&table, &salary_column, &group_column, &template)?;

            fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating {}", output_dir.display()))?;
            write_detail(&output_dir.join("detail.csv"), &outcome.detail)?;
            write_summary(&output_dir.join("summary.csv"), &outcome.summary)?;

            for (label, row) in labelled_summary_rows(&outcome.summary) {
                println!("{:<30} {:>6} {:>16}", label, row.row_count, format_currency(row.total));
            }
            for error in &outcome.errors {
                eprintln!("row {}: {}", error.row_index, error.reason);
            }
        }
    }

    Ok(())
}
