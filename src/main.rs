use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloud_trash::common::config::AppConfig;
use cloud_trash::infrastructure::remote::PcsTrashClient;
use cloud_trash::interfaces::cli::{self, Cli};
use cloud_trash::interfaces::console::ConsoleTrashView;

/// cloud-trash - trash browser for a cloud storage account
///
/// Lists deleted remote files page by page and restores, deletes or clears
/// them through the storage web API. Layout follows the usual split:
///
/// - Domain Layer: trash entries and the per-session list model (domain/*)
/// - Application Layer: the trash controller, ports and DTOs (application/*)
/// - Infrastructure Layer: the HTTP client for the web API (infrastructure/*)
/// - Interface Layer: CLI and console rendering (interfaces/*)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration from environment variables, then CLI overrides
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    tracing::debug!("Using API at {}", config.remote.api_url);

    let client = Arc::new(PcsTrashClient::new(&config)?);
    let view = Arc::new(ConsoleTrashView::new(std::io::stdout()));

    cli::run(cli.command, &config, client, view).await
}
