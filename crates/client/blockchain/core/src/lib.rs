//! Chain-agnostic collaborator layer for the Tileworld client.
//!
//! This crate defines the capabilities the network bootstrap consumes without
//! knowing how they are implemented.
//!
//! # Architecture
//!
//! ```text
//! Factories (construct handles)
//!   ├── ProviderFactory   → ContractProvider
//!   ├── IndexerConnector  → IndexerClient
//!   └── AccountSource     → SessionAccount + BurnerPool
//!
//! Data (shared by every backend)
//!   ├── Manifest (deployed contracts and models)
//!   └── Call / InvokeReceipt / EntityFilter
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{ContractProvider, SessionAccount};
//!
//! async fn spawn(provider: &dyn ContractProvider, signer: &dyn SessionAccount) {
//!     let receipt = provider.execute(signer, "actions", "spawn", vec![]).await?;
//!     tracing::info!("spawn tx: {:#x}", receipt.transaction_hash);
//! }
//! ```

pub mod manifest;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use manifest::{ContractManifest, Manifest, ManifestError, ModelManifest, ModelMember, WorldManifest};

// Re-export all traits
pub use traits::{
    AccountError, AccountSource, BurnerPool, ContractProvider, IndexerClient, IndexerConnector,
    IndexerError, ProviderError, ProviderFactory, SessionAccount,
};

// Re-export all types
pub use types::{AccountBundle, BurnerInfo, Call, EntityFilter, Felt, InvokeReceipt, ModelMetadata};
