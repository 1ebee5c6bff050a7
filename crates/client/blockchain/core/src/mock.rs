//! In-memory collaborators for testing without a node or indexer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::manifest::{Manifest, WorldManifest};
use crate::traits::{
    AccountError, AccountSource, BurnerPool, ContractProvider, IndexerClient, IndexerConnector,
    IndexerError, ProviderError, ProviderFactory, SessionAccount,
};
use crate::types::{AccountBundle, BurnerInfo, Call, EntityFilter, Felt, InvokeReceipt, ModelMetadata};

/// Minimal manifest with a world and no contracts.
pub fn empty_manifest(world_address: Felt) -> Manifest {
    Manifest {
        world: WorldManifest {
            name: "world".to_string(),
            address: Some(world_address),
            class_hash: Felt::ZERO,
        },
        contracts: Vec::new(),
        models: Vec::new(),
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Account that records every multicall instead of signing it.
pub struct MockAccount {
    address: Felt,
    executed: Mutex<Vec<Vec<Call>>>,
}

impl MockAccount {
    pub fn new(address: Felt) -> Self {
        Self {
            address,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<Vec<Call>> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionAccount for MockAccount {
    fn address(&self) -> Felt {
        self.address
    }

    async fn execute(&self, calls: Vec<Call>) -> Result<InvokeReceipt, ProviderError> {
        let mut executed = self.executed.lock().unwrap();
        executed.push(calls);
        Ok(InvokeReceipt {
            transaction_hash: Felt::from(executed.len() as u64),
        })
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Arguments seen by [`MockContractProvider::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExecute {
    pub signer: Felt,
    pub contract: String,
    pub system: String,
    pub calldata: Vec<Felt>,
}

/// Provider that records executions and answers with a fixed receipt.
pub struct MockContractProvider {
    world_address: Felt,
    manifest: Arc<Manifest>,
    receipt: InvokeReceipt,
    executions: Mutex<Vec<RecordedExecute>>,
}

impl MockContractProvider {
    pub fn new(world_address: Felt, manifest: Arc<Manifest>) -> Self {
        Self {
            world_address,
            manifest,
            receipt: InvokeReceipt {
                transaction_hash: Felt::from(0xabcu64),
            },
            executions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_receipt(mut self, receipt: InvokeReceipt) -> Self {
        self.receipt = receipt;
        self
    }

    pub fn executions(&self) -> Vec<RecordedExecute> {
        self.executions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractProvider for MockContractProvider {
    fn world_address(&self) -> Felt {
        self.world_address
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    async fn execute(
        &self,
        signer: &dyn SessionAccount,
        contract: &str,
        system: &str,
        calldata: Vec<Felt>,
    ) -> Result<InvokeReceipt, ProviderError> {
        self.executions.lock().unwrap().push(RecordedExecute {
            signer: signer.address(),
            contract: contract.to_string(),
            system: system.to_string(),
            calldata,
        });
        Ok(self.receipt)
    }

    async fn call(
        &self,
        _contract: &str,
        _system: &str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, ProviderError> {
        Ok(calldata)
    }
}

/// Arguments seen by [`MockProviderFactory::create`].
#[derive(Debug, Clone)]
pub struct RecordedProvider {
    pub world_address: String,
    pub manifest: Arc<Manifest>,
    pub node_url: String,
}

/// Factory handing out one shared [`MockContractProvider`].
#[derive(Default)]
pub struct MockProviderFactory {
    created: Mutex<Vec<RecordedProvider>>,
    provider: Mutex<Option<Arc<MockContractProvider>>>,
}

impl MockProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<RecordedProvider> {
        self.created.lock().unwrap().clone()
    }

    /// The provider handed out by the last `create` call.
    pub fn provider(&self) -> Option<Arc<MockContractProvider>> {
        self.provider.lock().unwrap().clone()
    }
}

impl ProviderFactory for MockProviderFactory {
    fn create(
        &self,
        world_address: &str,
        manifest: Arc<Manifest>,
        node_url: &str,
    ) -> Result<Arc<dyn ContractProvider>, ProviderError> {
        let address = Felt::from_hex(world_address)
            .map_err(|_| ProviderError::InvalidWorldAddress(world_address.to_string()))?;

        self.created.lock().unwrap().push(RecordedProvider {
            world_address: world_address.to_string(),
            manifest: Arc::clone(&manifest),
            node_url: node_url.to_string(),
        });

        let provider = Arc::new(MockContractProvider::new(address, manifest));
        *self.provider.lock().unwrap() = Some(Arc::clone(&provider));
        Ok(provider)
    }
}

// ============================================================================
// Indexer
// ============================================================================

pub struct MockIndexerClient {
    world_address: String,
    filters: Vec<EntityFilter>,
    models: Vec<ModelMetadata>,
}

#[async_trait]
impl IndexerClient for MockIndexerClient {
    fn world_address(&self) -> &str {
        &self.world_address
    }

    fn filters(&self) -> &[EntityFilter] {
        &self.filters
    }

    fn models(&self) -> &[ModelMetadata] {
        &self.models
    }

    async fn query(&self, _query: &str) -> Result<serde_json::Value, IndexerError> {
        Ok(serde_json::Value::Null)
    }
}

/// Connector that succeeds with a [`MockIndexerClient`] or fails on demand.
#[derive(Default)]
pub struct MockIndexerConnector {
    failure: Option<String>,
    calls: AtomicUsize,
    last_filters: Mutex<Vec<EntityFilter>>,
}

impl MockIndexerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector whose handshake always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_filters(&self) -> Vec<EntityFilter> {
        self.last_filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexerConnector for MockIndexerConnector {
    async fn connect(
        &self,
        _node_url: &str,
        _indexer_url: &str,
        world_address: &str,
        filters: Vec<EntityFilter>,
    ) -> Result<Arc<dyn IndexerClient>, IndexerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filters.lock().unwrap() = filters.clone();

        if let Some(reason) = &self.failure {
            return Err(IndexerError::Handshake(reason.clone()));
        }

        Ok(Arc::new(MockIndexerClient {
            world_address: world_address.to_string(),
            filters,
            models: vec![ModelMetadata {
                name: "Tile".to_string(),
                class_hash: None,
            }],
        }))
    }
}

// ============================================================================
// Burners
// ============================================================================

/// Burner pool backed by a list of [`MockAccount`]s.
#[derive(Default)]
pub struct MockBurnerPool {
    burners: Mutex<Vec<Arc<MockAccount>>>,
    active: Mutex<Option<usize>>,
}

impl MockBurnerPool {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BurnerPool for MockBurnerPool {
    fn list(&self) -> Vec<BurnerInfo> {
        let active = *self.active.lock().unwrap();
        self.burners
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(index, burner)| BurnerInfo {
                address: burner.address(),
                active: active == Some(index),
                deployed: true,
            })
            .collect()
    }

    fn active(&self) -> Option<Arc<dyn SessionAccount>> {
        let active = (*self.active.lock().unwrap())?;
        let burners = self.burners.lock().unwrap();
        burners
            .get(active)
            .map(|burner| Arc::clone(burner) as Arc<dyn SessionAccount>)
    }

    fn select(&self, address: Felt) -> Result<Arc<dyn SessionAccount>, AccountError> {
        let burners = self.burners.lock().unwrap();
        let index = burners
            .iter()
            .position(|b| b.address() == address)
            .ok_or(AccountError::BurnerNotFound(address))?;
        *self.active.lock().unwrap() = Some(index);
        Ok(Arc::clone(&burners[index]) as Arc<dyn SessionAccount>)
    }

    async fn create(&self) -> Result<Arc<dyn SessionAccount>, AccountError> {
        let mut burners = self.burners.lock().unwrap();
        let burner = Arc::new(MockAccount::new(Felt::from(0x100 + burners.len() as u64)));
        burners.push(Arc::clone(&burner));
        *self.active.lock().unwrap() = Some(burners.len() - 1);
        Ok(burner)
    }

    fn clear(&self) -> Result<(), AccountError> {
        self.burners.lock().unwrap().clear();
        *self.active.lock().unwrap() = None;
        Ok(())
    }
}

/// Account source that creates one mock burner or fails on demand.
#[derive(Default)]
pub struct MockAccountSource {
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockAccountSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose key management always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountSource for MockAccountSource {
    async fn obtain(&self) -> Result<AccountBundle, AccountError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Err(AccountError::Deployment(reason.clone()));
        }

        let pool = Arc::new(MockBurnerPool::new());
        let account = pool.create().await?;
        Ok(AccountBundle {
            account,
            burner_manager: pool,
        })
    }
}
