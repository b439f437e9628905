//! CLI entry point for the trip analytics tool.
//!
//! Loads a taxi-trip snapshot from a file or the public dataset endpoint and
//! renders summary statistics, field profiles, correlations, group
//! aggregates, rankings and chart breakdowns.

mod infra;
mod services;

use crate::infra::local::LocalFile;
use crate::infra::socrata::client::SocrataClient;
use crate::services::trip_source::TripSource;
use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_analytics::analyzers::aggregate::{group_by_company, group_by_payment_type};
use trip_analytics::analyzers::analyzer::analyze;
use trip_analytics::analyzers::correlation::{DEFAULT_FIELDS, correlation_matrix, field_by_name};
use trip_analytics::analyzers::distribution::{distribution_points, total_points};
use trip_analytics::analyzers::ranking::rank_groups;
use trip_analytics::analyzers::types::RankCriterion;
use trip_analytics::analyzers::utility::fixed2;
use trip_analytics::config::EngineConfig;
use trip_analytics::fetch::is_remote;
use trip_analytics::output::{print_json, print_pretty, print_summary, write_json, write_points};
use trip_analytics::parser::TripRecord;
use trip_analytics::stats::{SummaryStats, profile_fields};

#[derive(Parser)]
#[command(name = "trip_analytics")]
#[command(about = "Summary statistics and breakdowns for taxi-trip snapshots", long_about = None)]
struct Cli {
    /// JSON config file (summaryDenominator, rankWidth, datasetUrl, rowLimit)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Divisor for the summary averages
    #[arg(long, global = true)]
    denominator: Option<u64>,

    /// Maximum rows requested from the dataset endpoint
    #[arg(long, global = true)]
    limit: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a JSON snapshot or URL to fetch (defaults to the configured dataset URL)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RankArg {
    Top,
    Bottom,
}

impl From<RankArg> for RankCriterion {
    fn from(arg: RankArg) -> Self {
        match arg {
            RankArg::Top => RankCriterion::Top,
            RankArg::Bottom => RankCriterion::Bottom,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every aggregate and log it or write it as JSON
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON file to write the report to (logged when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Gzip compress the JSON file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Average duration, distance and fare
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Observed types and null counts per field
    Profile {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Pearson correlation between numeric fields
    Correlate {
        #[command(flatten)]
        source: SourceArgs,

        /// Comma-separated fields (default: duration, distance, fare, tips, tolls, extras)
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Average fare per payment type
    Payments {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Company revenue ranking
    Companies {
        #[command(flatten)]
        source: SourceArgs,

        /// Rank by highest or lowest total fare
        #[arg(short, long, value_enum, default_value_t = RankArg::Top)]
        rank: RankArg,

        /// Number of companies to show (defaults to the configured rank width)
        #[arg(short)]
        k: Option<usize>,
    },
    /// Export per-trip scatter points as CSV
    Points {
        #[command(flatten)]
        source: SourceArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "points.csv")]
        output: String,

        /// Export trip total / extras / miles instead of duration / fare / distance
        #[arg(long, default_value_t = false)]
        totals: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(denominator) = cli.denominator {
        config.summary_denominator = denominator;
    }
    if let Some(limit) = cli.limit {
        config.row_limit = Some(limit);
    }

    match cli.command {
        Commands::Report {
            source,
            output,
            gzip,
        } => {
            let trips = load(source, &config).await?;
            let report = analyze(&trips, &config);

            print_summary(&report);
            match output {
                Some(path) => {
                    write_json(&path, &report, gzip)?;
                    info!(path = %path, gzip, "Report written");
                }
                None => {
                    print_pretty(&report);
                    print_json(&report)?;
                }
            }
        }
        Commands::Summary { source } => {
            let trips = load(source, &config).await?;
            let summary = SummaryStats::from_records(&trips, config.summary_denominator);
            print_json(&summary)?;
        }
        Commands::Profile { source } => {
            let trips = load(source, &config).await?;
            for profile in profile_fields(&trips) {
                let types: Vec<&str> = profile
                    .observed_types
                    .iter()
                    .map(|t| t.as_str())
                    .collect();
                info!(
                    field = %profile.field_name,
                    types = %types.join(", "),
                    nulls = profile.null_count,
                    "Field profile"
                );
            }
        }
        Commands::Correlate { source, fields } => {
            let selected = if fields.is_empty() {
                DEFAULT_FIELDS.to_vec()
            } else {
                fields
                    .iter()
                    .map(|name| match field_by_name(name) {
                        Some(f) => Ok(f),
                        None => bail!("Unknown numeric field '{name}'"),
                    })
                    .collect::<Result<Vec<_>>>()?
            };

            let trips = load(source, &config).await?;
            let matrix = correlation_matrix(&trips, &selected);

            info!(rows = matrix.row_count, "Correlation matrix");
            for a in &matrix.fields {
                let row: Vec<String> = matrix
                    .fields
                    .iter()
                    .map(|b| matrix.rounded(a, b).map_or_else(|| "NaN".to_string(), fixed2))
                    .collect();
                info!(field = %a, "{}", row.join("  "));
            }
        }
        Commands::Payments { source } => {
            let trips = load(source, &config).await?;
            for (payment_type, agg) in group_by_payment_type(&trips).iter() {
                info!(
                    payment_type = %payment_type,
                    trips = agg.trip_count,
                    average_fare = %fixed2(agg.average_fare),
                    "Payment type"
                );
            }
        }
        Commands::Companies { source, rank, k } => {
            let trips = load(source, &config).await?;
            let companies = group_by_company(&trips);
            let ranking = rank_groups(&companies, rank.into(), k.unwrap_or(config.rank_width));

            info!(
                criterion = ?ranking.criterion,
                shown = ranking.ordered_keys.len(),
                companies = companies.len(),
                "Company ranking"
            );
            for name in &ranking.ordered_keys {
                if let Some(c) = companies.get(name) {
                    info!(
                        company = %name,
                        trips = c.trip_count,
                        average_duration = %fixed2(c.average_trip_duration),
                        total_fare = %c.total_fare,
                        "Company"
                    );
                }
            }
        }
        Commands::Points {
            source,
            output,
            totals,
        } => {
            let trips = load(source, &config).await?;
            if totals {
                write_points(&output, &total_points(&trips))?;
            } else {
                write_points(&output, &distribution_points(&trips))?;
            }
            info!(path = %output, rows = trips.len(), "Points written");
        }
    }

    Ok(())
}

/// Loads trips from a local file path or the dataset endpoint.
async fn load(args: SourceArgs, config: &EngineConfig) -> Result<Vec<TripRecord>> {
    let source = trip_source(args.source, config)?;
    info!(source = %source.describe(), "Loading trips");

    let trips = source.load_trips().await?;
    info!(count = trips.len(), "Trips loaded");
    Ok(trips)
}

fn trip_source(source: Option<String>, config: &EngineConfig) -> Result<Box<dyn TripSource>> {
    let source = source.unwrap_or_else(|| config.dataset_url.clone());
    if is_remote(&source) {
        let app_token = std::env::var("SOCRATA_APP_TOKEN").ok();
        Ok(Box::new(SocrataClient::new(
            source,
            app_token.as_deref(),
            config.row_limit,
        )?))
    } else {
        Ok(Box::new(LocalFile::new(source)))
    }
}
