// Allow dead code for policy helpers not yet called by an API route
#![allow(dead_code)]

mod billing;
mod rpc;
mod tier;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing::BillingConfig;
use tier::{HttpUsageBackend, PendingUsageBackend, UsageBackend};

#[derive(Parser)]
#[command(name = "adriel-core")]
#[command(about = "Adriel Core - Tier, quota and billing policy engine")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value = "21500")]
    port: u16,

    /// Base URL of the usage-tracking service. Without it quota reads
    /// report Unavailable (the service is not deployed yet).
    #[arg(long)]
    usage_api: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Fail fast on a bad price table; in production a missing Stripe
    // price id must block startup, not surface at checkout.
    let billing = BillingConfig::from_env().context("billing configuration invalid")?;
    tracing::info!("billing configured for {}", billing.deployment().as_str());

    let usage: Arc<dyn UsageBackend> = match &cli.usage_api {
        Some(base) => {
            let base_url = url::Url::parse(base)
                .with_context(|| format!("invalid usage API URL: {}", base))?;
            tracing::info!("quota reads from usage service at {}", base_url);
            Arc::new(HttpUsageBackend::new(base_url))
        }
        None => {
            tracing::info!("no usage service configured, quota reads report unavailable");
            Arc::new(PendingUsageBackend)
        }
    };

    tracing::info!(
        "Starting adriel-core HTTP server on {}:{}",
        cli.host,
        cli.port
    );
    rpc::run_http_server(&cli.host, cli.port, billing, usage).await
}
