//! The network session handed to the rest of the client.

use std::sync::Arc;

use client_blockchain_core::{
    BurnerPool, ContractProvider, Felt, IndexerClient, InvokeReceipt, ProviderError, SessionAccount,
};

use crate::components::ContractComponents;
use crate::systems::SystemCalls;
use crate::world::ComponentRegistry;

/// Everything produced by a successful bootstrap.
///
/// Only ever constructed fully populated.
#[derive(Clone)]
pub struct NetworkSession {
    pub provider: Arc<dyn ContractProvider>,
    pub world: Arc<ComponentRegistry>,
    pub indexer: Arc<dyn IndexerClient>,
    pub account: Arc<dyn SessionAccount>,
    pub burner_manager: Arc<dyn BurnerPool>,
    pub contract_components: ContractComponents,
}

impl NetworkSession {
    /// Forward a call to the provider untouched.
    pub async fn execute(
        &self,
        signer: &dyn SessionAccount,
        contract: &str,
        system: &str,
        call_data: Vec<Felt>,
    ) -> Result<InvokeReceipt, ProviderError> {
        self.provider.execute(signer, contract, system, call_data).await
    }

    /// Typed wrappers for the game's systems.
    pub fn systems(&self) -> SystemCalls<'_> {
        SystemCalls::new(self)
    }
}
