//! CLI entry point for the alert tracker.
//!
//! Provides subcommands for processing the subway-alerts feed into a
//! per-stop snapshot, migrating timestamps in persisted snapshots, and
//! looking up stop display names.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use alert_tracker::aggregate::aggregate;
use alert_tracker::config::{AppConfig, DEFAULT_FEED_URL};
use alert_tracker::feed::FeedPayload;
use alert_tracker::fetch::{BasicClient, auth::ApiKey, fetch_feed};
use alert_tracker::migrate::migrate_snapshot;
use alert_tracker::output::write_snapshot;
use alert_tracker::stops::StopDirectory;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "alert_tracker")]
#[command(about = "Normalize a transit service-alert feed into per-stop records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an alert feed from a file or URL into a per-stop snapshot
    Process {
        /// Path to a feed JSON file, or a URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = DEFAULT_FEED_URL)]
        source: String,

        /// Stop reference table (stops.txt-style CSV)
        #[arg(short, long, default_value = "util/stops.csv")]
        stops: PathBuf,

        /// Snapshot file to write
        #[arg(short, long, default_value = "result.json")]
        output: String,
    },
    /// Rewrite epoch timestamps in a snapshot file to dd/mm/yyyy strings
    MigrateTimestamps {
        /// Snapshot JSON file, rewritten in place
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Look up the display name for a stop id
    StopName {
        #[arg(value_name = "STOP_ID")]
        stop_id: String,

        /// Stop reference table (stops.txt-style CSV)
        #[arg(short, long, default_value = "util/stops.csv")]
        stops: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/alert_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("alert_tracker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            source,
            stops,
            output,
        } => {
            let config = AppConfig::from_env(source, stops);

            let directory = StopDirectory::load(&config.stops_path)?;
            let payload = load_feed(&config).await?;
            info!(entities = payload.entity.len(), "Feed payload loaded");

            let collection = aggregate(&payload, &directory);
            write_snapshot(&output, &collection)?;

            let alerted = collection.iter().filter(|s| !s.alerts.is_empty()).count();
            info!(output = %output, stops = collection.len(), alerted, "Snapshot written");
        }
        Commands::MigrateTimestamps { file } => {
            migrate_snapshot(&file)?;
        }
        Commands::StopName { stop_id, stops } => {
            let directory = StopDirectory::load(&stops)?;
            println!("{}", directory.display_name(&stop_id)?);
        }
    }

    Ok(())
}

/// Loads the feed payload from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(config), fields(source = %config.feed_url))]
async fn load_feed(config: &AppConfig) -> Result<FeedPayload> {
    if config.feed_url.starts_with("http") {
        let payload = match &config.api_key {
            Some(key) => {
                let client = ApiKey::x_api_key(BasicClient::new(), key.clone());
                fetch_feed(&client, &config.feed_url).await?
            }
            None => fetch_feed(&BasicClient::new(), &config.feed_url).await?,
        };
        Ok(payload)
    } else {
        let raw = std::fs::read_to_string(&config.feed_url)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
