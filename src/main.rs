//! callr-bridge binary entry point
//!
//! Reads one webhook delivery (file or stdin), runs it through the pipeline
//! and prints the validated activity.

use std::path::PathBuf;

use callr_bridge::{Parser, config, metrics};
use clap::Parser as _;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, clap::Parser)]
#[command(name = "callr-bridge", version, about)]
struct Cli {
    /// Webhook delivery JSON file (stdin when omitted)
    input: Option<PathBuf>,

    /// Treat the input as a bare webhook body instead of `{ request: { body } }`
    #[arg(long)]
    body: bool,

    /// Extra configuration file, layered before environment variables
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr after processing
    #[arg(long)]
    metrics: bool,

    /// Pretty-print the activity
    #[arg(long)]
    pretty: bool,
}

/// Application entry point
///
/// # Setup
/// 1. Load configuration from files and environment
/// 2. Initialize tracing/logging
/// 3. Initialize metrics
/// 4. Build the parser
/// 5. Process the input
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = config::AppConfig::load_from(cli.config.as_deref())?;

    // 2. Initialize tracing/logging (stderr, stdout carries the activity)
    let default_filter = format!("callr_bridge={}", config.logging.level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    tracing::info!(
        service_id = %config.service.id,
        "Configuration loaded"
    );

    // 3. Initialize metrics
    metrics::init_metrics();

    // 4. Build the parser
    let parser = Parser::from_config(&config)?;

    // 5. Process the input
    let raw = match &cli.input {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let mut event: serde_json::Value = serde_json::from_str(&raw)?;
    if cli.body {
        event = serde_json::json!({ "request": { "body": event } });
    }

    match parser.process(&event).await? {
        Some(activity) => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&activity)?
            } else {
                serde_json::to_string(&activity)?
            };
            println!("{}", rendered);
        }
        None => tracing::info!("Webhook produced no activity"),
    }

    if cli.metrics {
        eprint!("{}", metrics::render()?);
    }

    Ok(())
}
