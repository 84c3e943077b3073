mod app_system;
mod classifier;
mod clients;
mod confirmation;
mod console;
mod display;
mod domain;
mod transport;
mod validation;
mod workflow;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::{info, Instrument};

use crate::app_system::{setup_tracing, ConsoleConfig, ProductSystem, SystemError};
use crate::console::Console;

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = ConsoleConfig::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    info!(?config, "Starting product console");

    let mut system = ProductSystem::start(&config)?;

    let span = tracing::info_span!("initial_load");
    system.controller.load().instrument(span).await;

    Console::new(&system.controller, &mut system.prompts).run().await?;

    system.shutdown().await?;
    info!("Product console finished");
    Ok(())
}
