//! Contract provider bound to a Dojo world manifest.

use std::sync::Arc;

use async_trait::async_trait;
use starknet::core::types::{BlockId, BlockTag, FunctionCall};
use starknet::core::utils::get_selector_from_name;
use starknet::providers::Provider;
use url::Url;

use client_blockchain_core::{
    Call, ContractProvider, Felt, InvokeReceipt, Manifest, ProviderError, ProviderFactory,
    SessionAccount,
};

use crate::utils::{RpcClient, parse_felt, parse_url, rpc_client};

/// Provider resolving contract names through a world manifest.
///
/// Construction only parses its inputs; no request reaches the node until a
/// call is made.
pub struct DojoProvider {
    world_address: Felt,
    manifest: Arc<Manifest>,
    node_url: Url,
    rpc: RpcClient,
}

impl DojoProvider {
    pub fn new(
        world_address: &str,
        manifest: Arc<Manifest>,
        node_url: &str,
    ) -> Result<Self, ProviderError> {
        let world_address = parse_felt(world_address).map_err(ProviderError::InvalidWorldAddress)?;
        let node_url = parse_url(node_url).map_err(ProviderError::InvalidNodeUrl)?;

        Ok(Self {
            world_address,
            manifest,
            rpc: rpc_client(&node_url),
            node_url,
        })
    }

    pub fn node_url(&self) -> &Url {
        &self.node_url
    }

    /// Resolve `contract` to its deployed address.
    pub fn contract_address(&self, contract: &str) -> Result<Felt, ProviderError> {
        self.manifest
            .contract(contract)
            .and_then(|c| c.address)
            .ok_or_else(|| ProviderError::ContractNotFound(contract.to_string()))
    }

    /// Build the call invoking `system` on `contract` with `calldata`.
    pub fn build_call(
        &self,
        contract: &str,
        system: &str,
        calldata: Vec<Felt>,
    ) -> Result<Call, ProviderError> {
        let to = self.contract_address(contract)?;
        let selector = get_selector_from_name(system)
            .map_err(|_| ProviderError::InvalidEntrypoint(system.to_string()))?;

        Ok(Call {
            to,
            selector,
            calldata,
        })
    }
}

#[async_trait]
impl ContractProvider for DojoProvider {
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
        let call = self.build_call(contract, system, calldata)?;

        tracing::debug!(
            "Executing {}::{} at {:#x} with {} calldata words",
            contract,
            system,
            call.to,
            call.calldata.len()
        );

        signer.execute(vec![call]).await
    }

    async fn call(
        &self,
        contract: &str,
        system: &str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, ProviderError> {
        let call = self.build_call(contract, system, calldata)?;

        self.rpc
            .call(
                FunctionCall {
                    contract_address: call.to,
                    entry_point_selector: call.selector,
                    calldata: call.calldata,
                },
                BlockId::Tag(BlockTag::Pending),
            )
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))
    }
}

/// Builds [`DojoProvider`]s for the network bootstrap.
#[derive(Clone, Copy, Debug, Default)]
pub struct StarknetProviderFactory;

impl ProviderFactory for StarknetProviderFactory {
    fn create(
        &self,
        world_address: &str,
        manifest: Arc<Manifest>,
        node_url: &str,
    ) -> Result<Arc<dyn ContractProvider>, ProviderError> {
        Ok(Arc::new(DojoProvider::new(world_address, manifest, node_url)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "world": { "name": "world", "address": "0x1", "class_hash": "0x2" },
        "contracts": [
            { "name": "tileworld::systems::actions::actions", "address": "0x10", "class_hash": "0x11" },
            { "name": "tileworld::systems::pending::pending", "class_hash": "0x21" }
        ]
    }"#;

    fn provider() -> DojoProvider {
        let manifest = Arc::new(Manifest::from_json(MANIFEST).unwrap());
        DojoProvider::new("0x1", manifest, "http://localhost:5050").unwrap()
    }

    #[test]
    fn test_builds_call_from_manifest_name_and_entrypoint() {
        let call = provider()
            .build_call("actions", "spawn", vec![Felt::from(9u8)])
            .unwrap();

        assert_eq!(call.to, Felt::from(0x10u8));
        assert_eq!(call.selector, get_selector_from_name("spawn").unwrap());
        assert_eq!(call.calldata, vec![Felt::from(9u8)]);
    }

    #[test]
    fn test_undeployed_or_unknown_contracts_are_not_found() {
        let provider = provider();
        assert!(matches!(
            provider.contract_address("pending"),
            Err(ProviderError::ContractNotFound(_))
        ));
        assert!(matches!(
            provider.build_call("missing", "spawn", Vec::new()),
            Err(ProviderError::ContractNotFound(_))
        ));
    }

    #[test]
    fn test_construction_validates_inputs_without_network() {
        let manifest = Arc::new(Manifest::from_json(MANIFEST).unwrap());
        assert!(matches!(
            DojoProvider::new("world", Arc::clone(&manifest), "http://localhost:5050"),
            Err(ProviderError::InvalidWorldAddress(_))
        ));
        assert!(matches!(
            DojoProvider::new("0x1", manifest, "not a url"),
            Err(ProviderError::InvalidNodeUrl(_))
        ));

        let provider = provider();
        assert_eq!(provider.world_address(), Felt::from(1u8));
        assert_eq!(provider.node_url().as_str(), "http://localhost:5050/");
    }

    #[test]
    fn test_factory_builds_dojo_provider() {
        let manifest = Arc::new(Manifest::from_json(MANIFEST).unwrap());
        let provider = StarknetProviderFactory
            .create("0x1", manifest, "http://localhost:5050")
            .unwrap();
        assert_eq!(provider.world_address(), Felt::from(1u8));
        assert!(provider.manifest().contract("actions").is_some());
    }
}
