mod actor_framework;
mod app_system;
mod clients;
mod config;
mod controller;
mod customer_actor;
mod domain;
mod order_actor;
mod product_actor;
mod record_store;

#[cfg(test)]
mod mock_framework;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use crate::app_system::{setup_tracing, OrderSystem};
use crate::config::{AppConfig, CliArgs};
use crate::controller::{Console, Controller};

// Actors and the console share one thread; nothing here runs in parallel.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_args(CliArgs::parse())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_level);

    info!(
        products = %config.products_file.display(),
        customers = %config.customers_file.display(),
        "Starting shop desk"
    );

    let system = OrderSystem::start(&config)
        .await
        .context("failed to load shop data")?;

    let console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    Controller::new(system, console).run().await?;

    info!("Session finished");
    Ok(())
}
