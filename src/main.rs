//! `sentiment-breakdown` binary.
//!
//! ```bash
//! # Serve the form on 127.0.0.1:8080
//! sentiment-breakdown
//!
//! # Larger model on GPU, custom port
//! sentiment-breakdown --model large --device cuda:0 serve --bind 0.0.0.0:3000
//!
//! # One-off analysis on stdout
//! sentiment-breakdown analyze "The food was great. The service was slow."
//!
//! # More logging
//! RUST_LOG=debug sentiment-breakdown
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sentiment_breakdown::aggregate::{Aggregator, Classifier};
use sentiment_breakdown::config::{Overrides, Settings};
use sentiment_breakdown::sentiment::SentimentAnalysisPipelineBuilder;
use sentiment_breakdown::web::{self, page, SharedAggregator};

#[derive(Debug, Parser)]
#[command(version, about = "Sentence-level sentiment breakdown")]
struct Cli {
    /// TOML settings file.
    #[arg(long, env = "SENTIMENT_CONFIG")]
    config: Option<PathBuf>,

    /// `base`, `large` or a hub repo id.
    #[arg(long, env = "SENTIMENT_MODEL")]
    model: Option<String>,

    /// `cpu`, `cuda` or `cuda:N`.
    #[arg(long, env = "SENTIMENT_DEVICE")]
    device: Option<String>,

    /// Per-sentence classification limit in seconds, 0 to disable.
    #[arg(long, env = "SENTIMENT_CLAUSE_TIMEOUT")]
    clause_timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web form (default).
    Serve {
        /// Listen address.
        #[arg(long, env = "SENTIMENT_BIND")]
        bind: Option<SocketAddr>,
    },
    /// Analyze one statement and print the breakdown.
    Analyze {
        /// Sentences separated by `.`.
        statement: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let bind = match &cli.command {
        Some(Command::Serve { bind }) => *bind,
        _ => None,
    };

    let settings = Settings::load(cli.config.as_deref())
        .context("failed to load settings")?
        .merge(Overrides {
            bind,
            model: cli.model,
            device: cli.device,
            clause_timeout_secs: cli.clause_timeout,
        });
    settings.validate().context("invalid settings")?;

    let aggregator = build_aggregator(&settings).await.map_err(|e| {
        tracing::error!("FATAL: {e:#}");
        e
    })?;

    match cli.command {
        Some(Command::Analyze { statement }) => analyze(&aggregator, &statement).await,
        Some(Command::Serve { .. }) | None => {
            let listener = tokio::net::TcpListener::bind(settings.bind)
                .await
                .with_context(|| format!("failed to bind {}", settings.bind))?;
            web::serve(listener, web::router(aggregator))
                .await
                .context("server error")
        }
    }
}

/// Load the model once; every request shares it.
async fn build_aggregator(settings: &Settings) -> Result<SharedAggregator> {
    let checkpoint = settings.checkpoint()?;
    let device = settings.device_request()?;

    let pipeline = tokio::task::spawn_blocking(move || {
        SentimentAnalysisPipelineBuilder::checkpoint(checkpoint)
            .device(device)
            .build()
    })
    .await
    .context("model loading task failed")?
    .context("failed to load sentiment model")?;

    let classifier: Arc<dyn Classifier> = Arc::new(pipeline);
    let aggregator = Aggregator::new(classifier).with_labels(settings.label_map()?);
    let aggregator = match settings.clause_timeout() {
        Some(limit) => aggregator.with_timeout(limit),
        None => aggregator.without_timeout(),
    };
    Ok(Arc::new(aggregator))
}

async fn analyze(aggregator: &SharedAggregator, statement: &str) -> Result<()> {
    if statement.trim().is_empty() {
        tracing::warn!("Please enter a statement to analyze.");
        return Ok(());
    }

    let report = aggregator.aggregate(statement).await?;
    for line in page::result_lines(&report.breakdown) {
        println!("{line}");
    }
    if report.failures() > 0 {
        tracing::warn!(
            failures = report.failures(),
            "some sentences could not be classified and were counted as neutral"
        );
    }
    Ok(())
}
