//! Game server entry point.
mod config;
mod teleport;

use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::{ConfigLoader, ContentFactory, ItemLoader};
use runtime::{Command, Runtime, ZoneEffect};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::ServerConfig;
use teleport::TeleportService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _log_guard = setup_logging(&config)?;

    let factory = ContentFactory::new(config.content_dir.clone());
    let zone = match &config.zone_config {
        Some(path) => ConfigLoader::load(path),
        None => factory.load_zone_config(),
    }
    .context("loading zone configuration")?;
    let catalog = match &config.item_catalog {
        Some(path) => ItemLoader::load(path),
        None => factory.load_items(),
    }
    .context("loading item catalog")?;

    tracing::info!(definitions = catalog.len(), "content loaded");

    let mut runtime = Runtime::builder()
        .config(config.runtime.clone().with_zone(zone))
        .catalog(catalog)
        .handler(Command::SparkTeleportUse, Arc::new(TeleportService))
        .build()?;

    if let Some(mut effects) = runtime.take_zone_effects() {
        tokio::spawn(async move {
            while let Some(effect) = effects.recv().await {
                match effect {
                    ZoneEffect::Beam(beam) => {
                        tracing::debug!(target: "server::effects", kind = %beam.kind, "beam")
                    }
                    ZoneEffect::AreaDamage(damage) => tracing::info!(
                        target: "server::effects",
                        attacker = %damage.attacker,
                        total = damage.total(),
                        "area damage"
                    ),
                }
            }
        });
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutdown requested");

    runtime.shutdown().await?;
    Ok(())
}

/// Setup logging to stderr, plus daily files when `LOG_DIR` is set.
fn setup_logging(
    config: &ServerConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
