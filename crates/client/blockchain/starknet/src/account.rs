//! Single-owner Starknet account implementing [`SessionAccount`].

use async_trait::async_trait;
use starknet::accounts::{Account, ExecutionEncoding, SingleOwnerAccount};
use starknet::core::types::{BlockId, BlockTag};
use starknet::signers::{LocalWallet, SigningKey};
use url::Url;

use client_blockchain_core::{Call, Felt, InvokeReceipt, ProviderError, SessionAccount};

use crate::utils::{RpcClient, rpc_client, to_starknet_call};

/// Account controlled by a local private key.
///
/// Used both for the master (funding) account and for every burner.
pub struct StarknetAccount {
    inner: SingleOwnerAccount<RpcClient, LocalWallet>,
}

impl StarknetAccount {
    pub fn new(node_url: &Url, address: Felt, private_key: Felt, chain_id: Felt) -> Self {
        let signer = LocalWallet::from(SigningKey::from_secret_scalar(private_key));
        let mut inner = SingleOwnerAccount::new(
            rpc_client(node_url),
            signer,
            address,
            chain_id,
            ExecutionEncoding::New,
        );
        // Nonces must include transactions still in the pending block
        inner.set_block_id(BlockId::Tag(BlockTag::Pending));

        Self { inner }
    }
}

#[async_trait]
impl SessionAccount for StarknetAccount {
    fn address(&self) -> Felt {
        self.inner.address()
    }

    async fn execute(&self, calls: Vec<Call>) -> Result<InvokeReceipt, ProviderError> {
        let calls = calls.into_iter().map(to_starknet_call).collect();

        tracing::debug!("Submitting invoke from {:#x}", self.inner.address());

        let result = self
            .inner
            .execute_v1(calls)
            .send()
            .await
            .map_err(|e| ProviderError::TransactionFailed(e.to_string()))?;

        Ok(InvokeReceipt {
            transaction_hash: result.transaction_hash,
        })
    }
}
