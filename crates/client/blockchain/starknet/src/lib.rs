//! Starknet integration for the Tileworld client.
//!
//! This crate provides the concrete collaborators behind the traits of
//! `client-blockchain-core`:
//! - `DojoProvider`: resolves manifest contracts and submits calls
//! - `StarknetAccount`: single-owner account signing over JSON-RPC
//! - `ToriiClient`: GraphQL connection to the Torii indexer
//! - `StarknetBurnerManager`: persisted pool of funded burner accounts
//!
//! # Architecture
//!
//! ```text
//! client-bootstrap ──▶ ProviderFactory   ──▶ StarknetProviderFactory ─▶ DojoProvider
//!                  ├─▶ IndexerConnector  ──▶ ToriiConnector          ─▶ ToriiClient
//!                  └─▶ AccountSource     ──▶ BurnerAccountSource     ─▶ StarknetBurnerManager
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_starknet::{BurnerAccountSource, BurnerConfig};
//! use client_blockchain_core::AccountSource;
//!
//! let source = BurnerAccountSource::new(BurnerConfig::from_env()?, "http://localhost:5050");
//! let bundle = source.obtain().await?;
//! ```

pub mod account;
pub mod burner;
pub mod config;
pub mod provider;
pub mod torii;
pub mod utils;

pub use account::StarknetAccount;
pub use burner::{BurnerAccountSource, BurnerRecord, BurnerStore, StarknetBurnerManager};
pub use config::BurnerConfig;
pub use provider::{DojoProvider, StarknetProviderFactory};
pub use torii::{ToriiClient, ToriiConnector};
