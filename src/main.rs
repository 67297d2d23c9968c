//! CLI entry point for campaign_stats.
//!
//! Provides subcommands for summarising a performance export, writing a
//! normalized copy of it, and requesting an LLM diagnostic report.

use anyhow::{Context, Result};
use campaign_stats::config::ReportConfig;
use campaign_stats::fetch::{BasicClient, fetch_bytes};
use campaign_stats::narrative::{describe, kpi_cards};
use campaign_stats::output::{export_series, print_pretty, to_json};
use campaign_stats::report::GeminiClient;
use campaign_stats::schema::Scope;
use campaign_stats::series::{Series, ingest};
use campaign_stats::session::{ReportOutcome, Session};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "campaign_stats")]
#[command(about = "Summarise daily ad-campaign performance exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline KPIs and per-channel trend notes for an export
    Summary {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Emit the series and summary as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the parsed series back out as a normalized CSV
    Export {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to write
        #[arg(short, long, default_value = "normalized.csv")]
        output: String,
    },
    /// Ask the configured LLM for a diagnostic report on an export
    Report {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/campaign_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("campaign_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { source, json } => {
            let raw = load_text(&source).await?;
            let (series, summary) = ingest(&raw);
            print_pretty(&summary);

            if json {
                println!("{}", to_json(&json!({ "series": series, "summary": summary }))?);
            } else if series.is_empty() {
                println!("No data parsed from {source}.");
            } else {
                let config = ReportConfig::from_env()?;
                for card in kpi_cards(&summary) {
                    println!("{:<20} {}", card.title, card.value);
                }
                print_digests(&series, &config);
            }
        }
        Commands::Export { source, output } => {
            let raw = load_text(&source).await?;
            let (series, _) = ingest(&raw);
            if series.is_empty() {
                warn!(source = %source, "No data parsed, exporting header only");
            }
            export_series(&output, &series)?;
        }
        Commands::Report { source } => {
            let config = ReportConfig::from_env()?;
            let generator = Arc::new(GeminiClient::from_config(&config)?);

            let raw = load_text(&source).await?;
            let mut session = Session::new();
            session.load(&raw, Some(source.clone()));

            let Some(task) = session.spawn_report(generator, &config) else {
                println!("No data parsed from {source}; nothing to report on.");
                return Ok(());
            };

            info!(generation = task.generation, "Waiting for report");
            let (generation, result) = task.join().await;

            match session.accept(generation, result) {
                ReportOutcome::Current(text) => println!("{text}"),
                ReportOutcome::Stale { requested, current } => {
                    warn!(requested, current, "Report describes replaced data, not shown");
                }
                ReportOutcome::Failed(e) => {
                    return Err(e.context("report generation failed, please retry later"));
                }
            }
        }
    }

    Ok(())
}

/// Loads export text from a local file path or fetches it over HTTP.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[tracing::instrument(skip_all, fields(source = %source))]
async fn load_text(source: &str) -> Result<String> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("cannot read '{source}'"))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_digests(series: &Series, config: &ReportConfig) {
    for scope in Scope::ALL {
        let title = match scope {
            Scope::Overall => "Overall",
            Scope::ChannelA => config.channel_a_label.as_str(),
            Scope::ChannelB => config.channel_b_label.as_str(),
        };
        println!();
        println!("== {title} ==");
        for metric in campaign_stats::narrative::PANEL_METRICS {
            println!("- {}", describe(series, scope, metric));
        }
    }
}
