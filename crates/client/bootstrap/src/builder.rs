//! Builds the network session: provider, indexer, accounts and components.
use std::sync::Arc;

use client_blockchain_core::{
    AccountError, AccountSource, EntityFilter, IndexerConnector, IndexerError, ManifestError,
    ProviderError, ProviderFactory, SessionAccount,
};

use crate::components::define_contract_components;
use crate::config::NetworkConfig;
use crate::manifests::Manifests;
use crate::session::NetworkSession;
use crate::world::{ComponentRegistry, RegistryError};

/// Bootstrap failure.
///
/// Collaborator errors are carried unchanged; `Display` and `source` are the
/// collaborator's own.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("{0} is required")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Builder that assembles the collaborators of a network session.
pub struct NetworkBuilder {
    config: NetworkConfig,
    world: Arc<ComponentRegistry>,
    manifests: Option<Manifests>,
    filters: Vec<EntityFilter>,
    provider_factory: Option<Arc<dyn ProviderFactory>>,
    indexer_connector: Option<Arc<dyn IndexerConnector>>,
    account_source: Option<Arc<dyn AccountSource>>,
}

impl NetworkBuilder {
    pub fn new(config: NetworkConfig, world: Arc<ComponentRegistry>) -> Self {
        Self {
            config,
            world,
            manifests: None,
            filters: Vec::new(),
            provider_factory: None,
            indexer_connector: None,
            account_source: None,
        }
    }

    /// Use the Starknet provider, Torii indexer and burner accounts.
    #[cfg(feature = "starknet")]
    pub fn with_starknet_defaults(self, burner: client_blockchain_starknet::BurnerConfig) -> Self {
        use client_blockchain_starknet::{BurnerAccountSource, StarknetProviderFactory, ToriiConnector};

        let accounts = BurnerAccountSource::new(burner, self.config.node_url.clone());
        self.provider_factory(Arc::new(StarknetProviderFactory))
            .indexer_connector(Arc::new(ToriiConnector))
            .account_source(Arc::new(accounts))
    }

    /// Override the manifests (default: the embedded dev/release pair).
    pub fn manifests(mut self, manifests: Manifests) -> Self {
        self.manifests = Some(manifests);
        self
    }

    /// Entity filters registered with the indexer at connect time (default: none).
    pub fn filters(mut self, filters: Vec<EntityFilter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.provider_factory = Some(factory);
        self
    }

    pub fn indexer_connector(mut self, connector: Arc<dyn IndexerConnector>) -> Self {
        self.indexer_connector = Some(connector);
        self
    }

    pub fn account_source(mut self, source: Arc<dyn AccountSource>) -> Self {
        self.account_source = Some(source);
        self
    }

    /// Run the bootstrap.
    ///
    /// The indexer handshake and the account setup run concurrently; if either
    /// fails the other is dropped and no session is returned.
    pub async fn setup(self) -> Result<NetworkSession, SetupError> {
        let Self {
            config,
            world,
            manifests,
            filters,
            provider_factory,
            indexer_connector,
            account_source,
        } = self;

        let provider_factory = provider_factory.ok_or(SetupError::MissingCollaborator("provider factory"))?;
        let indexer_connector =
            indexer_connector.ok_or(SetupError::MissingCollaborator("indexer connector"))?;
        let account_source = account_source.ok_or(SetupError::MissingCollaborator("account source"))?;

        tracing::info!("####### NETWORK DETAILS #######\n{}", config.details_table());

        let manifests = match manifests {
            Some(manifests) => manifests,
            None => Manifests::embedded()?,
        };
        let manifest = manifests.select(config.environment);
        tracing::debug!("Using {:?} manifest", config.environment);

        let provider = provider_factory.create(&config.world_address, manifest, &config.node_url)?;

        let (indexer, accounts) = tokio::try_join!(
            async {
                indexer_connector
                    .connect(&config.node_url, &config.torii_url, &config.world_address, filters)
                    .await
                    .map_err(SetupError::from)
            },
            async { account_source.obtain().await.map_err(SetupError::from) },
        )?;

        let contract_components = define_contract_components(&world)?;

        tracing::info!("Network session ready: account {:#x}", accounts.account.address());

        Ok(NetworkSession {
            provider,
            world,
            indexer,
            account: accounts.account,
            burner_manager: accounts.burner_manager,
            contract_components,
        })
    }
}

/// Bootstrap a session with the Starknet collaborators.
#[cfg(feature = "starknet")]
pub async fn setup_network(
    config: NetworkConfig,
    burner: client_blockchain_starknet::BurnerConfig,
    world: Arc<ComponentRegistry>,
) -> Result<NetworkSession, SetupError> {
    NetworkBuilder::new(config, world)
        .with_starknet_defaults(burner)
        .setup()
        .await
}
