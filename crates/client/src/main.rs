//! Tileworld client binary.
//!
//! Bootstraps a network session against the configured world and, when asked,
//! runs a single system call with the session account.
//!
//! ```bash
//! # Connect, restore or create a burner, and print the session summary
//! cargo run -p tileworld-client
//!
//! # Same, then register the burner as a player
//! cargo run -p tileworld-client -- spawn
//! ```
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use client_blockchain_core::{BurnerPool, ContractProvider, IndexerClient, SessionAccount};
use client_blockchain_starknet::BurnerConfig;
use client_bootstrap::{NetworkConfig, NetworkSession, setup_network, tileworld_registry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging()?;

    let config = NetworkConfig::from_env().context("Network configuration is incomplete")?;
    let burner = BurnerConfig::from_env().context("Burner configuration is incomplete")?;
    let world = Arc::new(tileworld_registry()?);

    tracing::info!("Starting Tileworld client ({:?})", config.environment);

    let session = setup_network(config, burner, world).await?;
    log_session(&session);

    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("spawn") => {
            let receipt = session.systems().spawn(session.account.as_ref()).await?;
            tracing::info!("Spawned: tx {:#x}", receipt.transaction_hash);
        }
        Some(other) => bail!("Unknown command: {other} (expected `spawn`)"),
    }

    Ok(())
}

fn log_session(session: &NetworkSession) {
    tracing::info!("Account: {:#x}", session.account.address());
    tracing::info!("World: {:#x}", session.provider.world_address());
    tracing::info!("Indexed models: {}", session.indexer.models().len());

    for burner in session.burner_manager.list() {
        tracing::info!(
            "Burner {:#x} (active: {}, deployed: {})",
            burner.address,
            burner.active,
            burner.deployed
        );
    }
}
