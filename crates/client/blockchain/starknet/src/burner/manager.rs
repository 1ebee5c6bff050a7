//! Burner account manager and the account source built on it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use starknet::accounts::{AccountFactory, OpenZeppelinAccountFactory};
use starknet::core::types::{BlockId, BlockTag, ExecutionResult, StarknetError};
use starknet::core::utils::get_contract_address;
use starknet::macros::{felt, selector};
use starknet::providers::{Provider, ProviderError as RpcError};
use starknet::signers::{LocalWallet, SigningKey};
use url::Url;

use client_blockchain_core::{
    AccountBundle, AccountError, AccountSource, BurnerInfo, BurnerPool, Call, Felt, SessionAccount,
};

use super::store::{BurnerRecord, BurnerStore};
use crate::account::StarknetAccount;
use crate::config::BurnerConfig;
use crate::utils::{parse_felt, parse_url, rpc_client};

/// ETH fee token, used to prefund burners.
const ETH_FEE_TOKEN: Felt =
    felt!("0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7");

const RECEIPT_POLL_ATTEMPTS: usize = 60;
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

type Records = BTreeMap<Felt, BurnerRecord>;

/// Manages a persisted pool of burner accounts funded by a master account.
pub struct StarknetBurnerManager {
    node_url: Url,
    chain_id: Felt,
    master: Arc<StarknetAccount>,
    account_class_hash: Felt,
    prefund_amount: u128,
    store: BurnerStore,
    burners: Mutex<Records>,
}

impl StarknetBurnerManager {
    /// Build a manager for a known chain, loading persisted burners.
    pub fn new(config: &BurnerConfig, node_url: &str, chain_id: Felt) -> Result<Self, AccountError> {
        let node_url = parse_url(node_url).map_err(AccountError::InvalidConfig)?;
        let master_address = parse_felt(&config.master_address).map_err(AccountError::InvalidConfig)?;
        let master_key = parse_felt(&config.master_private_key).map_err(AccountError::InvalidConfig)?;
        let account_class_hash =
            parse_felt(&config.account_class_hash).map_err(AccountError::InvalidConfig)?;

        let store = BurnerStore::new(config.resolved_store_path());
        let burners = store.load()?;

        Ok(Self {
            master: Arc::new(StarknetAccount::new(&node_url, master_address, master_key, chain_id)),
            node_url,
            chain_id,
            account_class_hash,
            prefund_amount: config.prefund_amount,
            store,
            burners: Mutex::new(burners),
        })
    }

    /// Query the node for its chain id, then build the manager.
    pub async fn connect(config: &BurnerConfig, node_url: &str) -> Result<Self, AccountError> {
        let url = parse_url(node_url).map_err(AccountError::InvalidConfig)?;
        let chain_id = rpc_client(&url)
            .chain_id()
            .await
            .map_err(|e| AccountError::Network(e.to_string()))?;

        Self::new(config, node_url, chain_id)
    }

    /// The funding account.
    pub fn master(&self) -> Arc<dyn SessionAccount> {
        Arc::clone(&self.master) as Arc<dyn SessionAccount>
    }

    pub fn store(&self) -> &BurnerStore {
        &self.store
    }

    /// Restore the active burner, demoting it to undeployed if the chain no
    /// longer has its contract.
    ///
    /// Development chains are frequently restarted, which wipes deployed
    /// burners. Node errors are returned and leave the records untouched.
    pub async fn init(&self) -> Result<(), AccountError> {
        let active = self
            .lock()
            .iter()
            .find(|(_, record)| record.active)
            .map(|(address, _)| *address);

        let Some(address) = active else {
            return Ok(());
        };

        if self.is_deployed_on_chain(address).await? {
            tracing::info!("Restored burner {:#x}", address);
            return Ok(());
        }

        tracing::warn!("Burner {:#x} is not deployed on this chain, deactivating", address);
        self.commit(|burners| {
            if let Some(record) = burners.get_mut(&address) {
                // Key is kept so the next `create` redeploys the same account
                *record = BurnerRecord::pending(record.private_key, record.public_key);
            }
            Ok(())
        })
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        // Records stay consistent even if a holder panicked
        self.burners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `change` to a copy of the records, persist the copy, then publish it.
    ///
    /// A failed save leaves the in-memory records as they were.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut Records) -> Result<T, AccountError>,
    ) -> Result<T, AccountError> {
        let mut burners = self.lock();
        let mut next = burners.clone();
        let value = change(&mut next)?;
        self.store.save(&next)?;
        *burners = next;
        Ok(value)
    }

    fn update(
        &self,
        address: Felt,
        change: impl FnOnce(&mut BurnerRecord),
    ) -> Result<(), AccountError> {
        self.commit(|burners| {
            let record = burners
                .get_mut(&address)
                .ok_or(AccountError::BurnerNotFound(address))?;
            change(record);
            Ok(())
        })
    }

    fn account_for(&self, address: Felt, record: &BurnerRecord) -> Arc<dyn SessionAccount> {
        Arc::new(StarknetAccount::new(
            &self.node_url,
            address,
            record.private_key,
            self.chain_id,
        ))
    }

    /// Oldest burner whose creation never completed, if any.
    fn pending(&self) -> Option<(Felt, BurnerRecord)> {
        self.lock()
            .iter()
            .find(|(_, record)| !record.is_deployed())
            .map(|(address, record)| (*address, record.clone()))
    }

    /// Generate a key and record it before anything is sent on chain.
    fn generate(&self) -> Result<(Felt, BurnerRecord), AccountError> {
        let key = SigningKey::from_random();
        let public_key = key.verifying_key().scalar();
        let address = get_contract_address(public_key, self.account_class_hash, &[public_key], Felt::ZERO);
        let record = BurnerRecord::pending(key.secret_scalar(), public_key);

        self.commit(|burners| {
            burners.insert(address, record.clone());
            Ok(())
        })?;

        tracing::info!("Creating burner {:#x}", address);
        Ok((address, record))
    }

    async fn is_deployed_on_chain(&self, address: Felt) -> Result<bool, AccountError> {
        match rpc_client(&self.node_url)
            .get_class_hash_at(BlockId::Tag(BlockTag::Pending), address)
            .await
        {
            Ok(_) => Ok(true),
            Err(RpcError::StarknetError(StarknetError::ContractNotFound)) => Ok(false),
            Err(e) => Err(AccountError::Network(e.to_string())),
        }
    }

    async fn wait_for_transaction(&self, hash: Felt) -> Result<(), AccountError> {
        let rpc = rpc_client(&self.node_url);

        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            match rpc.get_transaction_receipt(hash).await {
                Ok(receipt) => {
                    return match receipt.receipt.execution_result() {
                        ExecutionResult::Succeeded => Ok(()),
                        ExecutionResult::Reverted { reason } => Err(AccountError::TransactionFailed(
                            format!("{hash:#x} reverted: {reason}"),
                        )),
                    };
                }
                Err(RpcError::StarknetError(StarknetError::TransactionHashNotFound)) => {
                    tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                }
                Err(e) => return Err(AccountError::Network(e.to_string())),
            }
        }

        Err(AccountError::TransactionFailed(format!(
            "{hash:#x} not accepted after {RECEIPT_POLL_ATTEMPTS} attempts"
        )))
    }

    /// Fund the counterfactual address so it can pay for its own deployment.
    async fn prefund(&self, address: Felt, record: &BurnerRecord) -> Result<(), AccountError> {
        if let Some(hash) = record.prefund_tx {
            return self.wait_for_transaction(hash).await;
        }

        let transfer = Call {
            to: ETH_FEE_TOKEN,
            selector: selector!("transfer"),
            calldata: vec![address, Felt::from(self.prefund_amount), Felt::ZERO],
        };
        let funding = self
            .master
            .execute(vec![transfer])
            .await
            .map_err(|e| AccountError::TransactionFailed(e.to_string()))?;
        self.update(address, |r| r.prefund_tx = Some(funding.transaction_hash))?;

        self.wait_for_transaction(funding.transaction_hash).await
    }

    async fn deploy(&self, address: Felt, record: &BurnerRecord) -> Result<(), AccountError> {
        if self.is_deployed_on_chain(address).await? {
            return Ok(());
        }

        let mut factory = OpenZeppelinAccountFactory::new(
            self.account_class_hash,
            self.chain_id,
            LocalWallet::from(SigningKey::from_secret_scalar(record.private_key)),
            rpc_client(&self.node_url),
        )
        .await
        .map_err(|e| AccountError::Deployment(e.to_string()))?;
        factory.set_block_id(BlockId::Tag(BlockTag::Pending));

        let deployment = factory
            .deploy_v1(record.public_key)
            .send()
            .await
            .map_err(|e| AccountError::Deployment(e.to_string()))?;
        self.update(address, |r| r.deploy_tx = Some(deployment.transaction_hash))?;

        self.wait_for_transaction(deployment.transaction_hash).await
    }
}

#[async_trait]
impl BurnerPool for StarknetBurnerManager {
    fn list(&self) -> Vec<BurnerInfo> {
        self.lock()
            .iter()
            .map(|(address, record)| BurnerInfo {
                address: *address,
                active: record.active,
                deployed: record.is_deployed(),
            })
            .collect()
    }

    fn active(&self) -> Option<Arc<dyn SessionAccount>> {
        let burners = self.lock();
        burners
            .iter()
            .find(|(_, record)| record.active)
            .map(|(address, record)| self.account_for(*address, record))
    }

    fn select(&self, address: Felt) -> Result<Arc<dyn SessionAccount>, AccountError> {
        let record = self.commit(|burners| {
            let record = burners
                .get(&address)
                .cloned()
                .ok_or(AccountError::BurnerNotFound(address))?;
            for (candidate, entry) in burners.iter_mut() {
                entry.active = *candidate == address;
            }
            Ok(record)
        })?;

        Ok(self.account_for(address, &record))
    }

    /// Resumes an interrupted creation before generating a new key.
    async fn create(&self) -> Result<Arc<dyn SessionAccount>, AccountError> {
        let (address, record) = match self.pending() {
            Some(pending) => {
                tracing::info!("Resuming burner {:#x}", pending.0);
                pending
            }
            None => self.generate()?,
        };

        self.prefund(address, &record).await?;
        self.deploy(address, &record).await?;

        let record = self.commit(|burners| {
            for (candidate, existing) in burners.iter_mut() {
                existing.active = *candidate == address;
            }
            let record = burners
                .get_mut(&address)
                .ok_or(AccountError::BurnerNotFound(address))?;
            record.deployed = true;
            Ok(record.clone())
        })?;

        tracing::info!("Burner {:#x} deployed", address);

        Ok(self.account_for(address, &record))
    }

    fn clear(&self) -> Result<(), AccountError> {
        self.commit(|burners| {
            burners.clear();
            Ok(())
        })
    }
}

/// Account source that restores or creates a burner.
///
/// Falls back to the master account when no burner is active after
/// initialization.
pub struct BurnerAccountSource {
    config: BurnerConfig,
    node_url: String,
}

impl BurnerAccountSource {
    pub fn new(config: BurnerConfig, node_url: impl Into<String>) -> Self {
        Self {
            config,
            node_url: node_url.into(),
        }
    }
}

#[async_trait]
impl AccountSource for BurnerAccountSource {
    async fn obtain(&self) -> Result<AccountBundle, AccountError> {
        let manager = Arc::new(StarknetBurnerManager::connect(&self.config, &self.node_url).await?);
        manager.init().await?;

        // Also finishes a burner left undeployed by an interrupted run
        if manager.list().iter().all(|burner| !burner.deployed) {
            manager.create().await?;
        }

        let account = match manager.active() {
            Some(account) => account,
            None => manager.master(),
        };

        Ok(AccountBundle {
            account,
            burner_manager: manager,
        })
    }
}
