//! Collaborator traits consumed by the network bootstrap.
//!
//! Each capability comes in two halves:
//! - a handle trait used after bootstrap (ContractProvider, IndexerClient, ...)
//! - a factory trait the bootstrap calls once to build the handle

use std::sync::Arc;

use async_trait::async_trait;

use crate::manifest::Manifest;
use crate::types::{AccountBundle, BurnerInfo, Call, EntityFilter, Felt, InvokeReceipt, ModelMetadata};

// ============================================================================
// Error Types
// ============================================================================

/// Contract provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid world address: {0}")]
    InvalidWorldAddress(String),

    #[error("Invalid node URL: {0}")]
    InvalidNodeUrl(String),

    #[error("Contract not found in manifest: {0}")]
    ContractNotFound(String),

    #[error("Invalid entrypoint name: {0}")]
    InvalidEntrypoint(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Indexer client errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("Invalid indexer URL: {0}")]
    InvalidUrl(String),

    #[error("Indexer unreachable: {0}")]
    Unreachable(String),

    #[error("Indexer handshake failed: {0}")]
    Handshake(String),

    #[error("Indexer query failed: {0}")]
    Query(String),
}

/// Account and burner management errors.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid account configuration: {0}")]
    InvalidConfig(String),

    #[error("Burner not found: {0:#x}")]
    BurnerNotFound(Felt),

    #[error("Burner storage error: {0}")]
    Storage(String),

    #[error("Account deployment failed: {0}")]
    Deployment(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Network error: {0}")]
    Network(String),
}

// ============================================================================
// Handles
// ============================================================================

/// Signing identity able to submit invoke transactions.
#[async_trait]
pub trait SessionAccount: Send + Sync {
    /// On-chain address of the account.
    fn address(&self) -> Felt;

    /// Sign and submit a multicall.
    async fn execute(&self, calls: Vec<Call>) -> Result<InvokeReceipt, ProviderError>;
}

/// Submits calls to contracts named in a world manifest.
#[async_trait]
pub trait ContractProvider: Send + Sync {
    /// Address of the world contract this provider is bound to.
    fn world_address(&self) -> Felt;

    /// Manifest used to resolve contract names.
    fn manifest(&self) -> &Manifest;

    /// Have `signer` invoke `system` on the contract named `contract`.
    async fn execute(
        &self,
        signer: &dyn SessionAccount,
        contract: &str,
        system: &str,
        calldata: Vec<Felt>,
    ) -> Result<InvokeReceipt, ProviderError>;

    /// Read-only call of `system` on the contract named `contract`.
    async fn call(
        &self,
        contract: &str,
        system: &str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, ProviderError>;
}

/// Live connection to an indexing service mirroring world state.
#[async_trait]
pub trait IndexerClient: Send + Sync {
    /// World address the client indexes.
    fn world_address(&self) -> &str;

    /// Filters registered when the client connected.
    fn filters(&self) -> &[EntityFilter];

    /// Models reported by the indexer during the handshake.
    fn models(&self) -> &[ModelMetadata];

    /// Run a raw query against the indexer and return the `data` payload.
    async fn query(&self, query: &str) -> Result<serde_json::Value, IndexerError>;
}

/// Pool of ephemeral ("burner") accounts.
#[async_trait]
pub trait BurnerPool: Send + Sync {
    /// Every burner known to the pool.
    fn list(&self) -> Vec<BurnerInfo>;

    /// The currently selected burner, if any.
    fn active(&self) -> Option<Arc<dyn SessionAccount>>;

    /// Make the burner at `address` the active one.
    fn select(&self, address: Felt) -> Result<Arc<dyn SessionAccount>, AccountError>;

    /// Create, fund and deploy a new burner, making it active.
    async fn create(&self) -> Result<Arc<dyn SessionAccount>, AccountError>;

    /// Forget every burner.
    fn clear(&self) -> Result<(), AccountError>;
}

// ============================================================================
// Factories
// ============================================================================

/// Builds a contract provider. Construction performs no network I/O.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        world_address: &str,
        manifest: Arc<Manifest>,
        node_url: &str,
    ) -> Result<Arc<dyn ContractProvider>, ProviderError>;
}

/// Connects to an indexer, resolving once the handshake completes.
#[async_trait]
pub trait IndexerConnector: Send + Sync {
    async fn connect(
        &self,
        node_url: &str,
        indexer_url: &str,
        world_address: &str,
        filters: Vec<EntityFilter>,
    ) -> Result<Arc<dyn IndexerClient>, IndexerError>;
}

/// Produces the session account, creating or restoring a burner as needed.
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn obtain(&self) -> Result<AccountBundle, AccountError>;
}
