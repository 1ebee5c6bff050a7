//! Network bootstrap scenarios against in-memory collaborators.

use std::sync::Arc;

use client_blockchain_core::mock::{
    MockAccount, MockAccountSource, MockIndexerConnector, MockProviderFactory, RecordedExecute,
};
use client_blockchain_core::{
    AccountError, BurnerPool, ContractProvider, EntityFilter, Felt, IndexerClient, IndexerError,
    InvokeReceipt, SessionAccount,
};
use client_bootstrap::{
    ComponentRegistry, ComponentSchema, Environment, FieldType, Manifests, NetworkBuilder,
    NetworkConfig, RegistryError, SetupError, Tile, TileType, tileworld_registry,
};

struct Harness {
    providers: Arc<MockProviderFactory>,
    indexer: Arc<MockIndexerConnector>,
    accounts: Arc<MockAccountSource>,
}

impl Harness {
    fn new() -> Self {
        Self {
            providers: Arc::new(MockProviderFactory::new()),
            indexer: Arc::new(MockIndexerConnector::new()),
            accounts: Arc::new(MockAccountSource::new()),
        }
    }

    fn with_indexer(mut self, indexer: MockIndexerConnector) -> Self {
        self.indexer = Arc::new(indexer);
        self
    }

    fn with_accounts(mut self, accounts: MockAccountSource) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    fn builder(&self, config: NetworkConfig) -> NetworkBuilder {
        self.builder_with_world(config, tileworld_registry().unwrap())
    }

    fn builder_with_world(&self, config: NetworkConfig, world: ComponentRegistry) -> NetworkBuilder {
        NetworkBuilder::new(config, Arc::new(world))
            .provider_factory(self.providers.clone())
            .indexer_connector(self.indexer.clone())
            .account_source(self.accounts.clone())
    }
}

fn dev_config() -> NetworkConfig {
    NetworkConfig::new(
        "0xABC",
        "http://node",
        "http://indexer",
        Environment::from_flag("true"),
    )
}

#[tokio::test]
async fn test_dev_flag_scenario_builds_full_session() {
    let harness = Harness::new();
    let manifests = Manifests::embedded().unwrap();

    let session = harness
        .builder(dev_config())
        .manifests(manifests.clone())
        .setup()
        .await
        .expect("bootstrap should succeed");

    // Provider bound to ("0xABC", development manifest, "http://node")
    let created = harness.providers.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].world_address, "0xABC");
    assert_eq!(created[0].node_url, "http://node");
    assert!(Arc::ptr_eq(&created[0].manifest, manifests.development()));
    assert_eq!(session.provider.world_address(), Felt::from(0xabcu64));

    // Every collaborator is live
    assert_eq!(session.indexer.world_address(), "0xABC");
    assert!(session.indexer.filters().is_empty());
    assert_eq!(session.burner_manager.list().len(), 1);
    assert_eq!(
        session.burner_manager.active().unwrap().address(),
        session.account.address()
    );
    assert_eq!(session.world.len(), 2);
    assert_eq!(session.contract_components.tile.name, "Tile");
    assert_eq!(session.contract_components.player.name, "Player");

    assert_eq!(harness.indexer.calls(), 1);
    assert_eq!(harness.accounts.calls(), 1);
}

#[tokio::test]
async fn test_other_flags_select_production_manifest() {
    for flag in ["false", "", "TRUE", "1"] {
        let harness = Harness::new();
        let manifests = Manifests::embedded().unwrap();
        let config = NetworkConfig::new("0xABC", "http://node", "http://indexer", Environment::from_flag(flag));

        harness
            .builder(config)
            .manifests(manifests.clone())
            .setup()
            .await
            .unwrap();

        let created = harness.providers.created();
        assert!(
            Arc::ptr_eq(&created[0].manifest, manifests.production()),
            "flag {flag:?} should select production"
        );
    }
}

#[tokio::test]
async fn test_embedded_manifests_are_the_default() {
    let harness = Harness::new();
    harness.builder(dev_config()).setup().await.unwrap();

    let created = harness.providers.created();
    let embedded = Manifests::embedded().unwrap();
    assert_eq!(*created[0].manifest, **embedded.development());
}

#[tokio::test]
async fn test_execute_forwards_arguments_and_result_verbatim() {
    let harness = Harness::new();
    let session = harness.builder(dev_config()).setup().await.unwrap();

    let signer = MockAccount::new(Felt::from(0x5eu8));
    let call_data = vec![Felt::from(3u8), Felt::from(1u8), Felt::from(4u8)];

    let receipt = session
        .execute(&signer, "actions", "place_tile", call_data.clone())
        .await
        .unwrap();

    let provider = harness.providers.provider().unwrap();
    assert_eq!(
        provider.executions(),
        vec![RecordedExecute {
            signer: Felt::from(0x5eu8),
            contract: "actions".to_string(),
            system: "place_tile".to_string(),
            calldata: call_data,
        }]
    );
    assert_eq!(
        receipt,
        InvokeReceipt {
            transaction_hash: Felt::from(0xabcu64)
        }
    );

    // The session never signs on the caller's behalf
    assert!(signer.executed().is_empty());
}

#[tokio::test]
async fn test_system_calls_go_through_execute() {
    let harness = Harness::new();
    let session = harness.builder(dev_config()).setup().await.unwrap();
    let systems = session.systems();
    let signer = session.account.as_ref();

    systems.spawn(signer).await.unwrap();
    systems
        .place_tile(signer, &[Tile::new(2, 7, TileType::Grass)])
        .await
        .unwrap();

    let executions = harness.providers.provider().unwrap().executions();
    assert_eq!(executions.len(), 2);
    assert_eq!(executions[0].system, "spawn");
    assert!(executions[0].calldata.is_empty());
    assert_eq!(executions[1].system, "place_tile");
    assert_eq!(
        executions[1].calldata,
        vec![Felt::from(1u8), Felt::from(2u8), Felt::from(7u8), Felt::from(1u8)]
    );
    assert!(executions.iter().all(|e| e.contract == "actions"));
    assert!(executions.iter().all(|e| e.signer == session.account.address()));
}

#[tokio::test]
async fn test_indexer_failure_rejects_bootstrap() {
    let harness = Harness::new().with_indexer(MockIndexerConnector::failing("connection refused"));

    let result = harness.builder(dev_config()).setup().await;

    match result {
        Err(SetupError::Indexer(IndexerError::Handshake(reason))) => {
            assert_eq!(reason, "connection refused")
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("bootstrap must not produce a session"),
    }
}

#[tokio::test]
async fn test_indexer_error_is_propagated_unchanged() {
    let harness = Harness::new().with_indexer(MockIndexerConnector::failing("connection refused"));

    let error = match harness.builder(dev_config()).setup().await {
        Err(error) => error,
        Ok(_) => panic!("bootstrap must fail"),
    };

    let original = IndexerError::Handshake("connection refused".to_string());
    assert_eq!(error.to_string(), original.to_string());
}

#[tokio::test]
async fn test_account_failure_rejects_bootstrap() {
    let harness = Harness::new().with_accounts(MockAccountSource::failing("key storage unavailable"));

    let result = harness.builder(dev_config()).setup().await;

    assert!(matches!(
        result,
        Err(SetupError::Account(AccountError::Deployment(reason))) if reason == "key storage unavailable"
    ));
}

#[tokio::test]
async fn test_invalid_world_address_fails_before_network() {
    let harness = Harness::new();
    let config = NetworkConfig::new("not-an-address", "http://node", "http://indexer", Environment::Production);

    let result = harness.builder(config).setup().await;

    assert!(matches!(result, Err(SetupError::Provider(_))));
    assert_eq!(harness.indexer.calls(), 0);
    assert_eq!(harness.accounts.calls(), 0);
}

#[tokio::test]
async fn test_filters_are_passed_to_indexer() {
    let harness = Harness::new();
    let filters = vec![EntityFilter::new("Tile", vec![Felt::from(1u8)])];

    let session = harness
        .builder(dev_config())
        .filters(filters.clone())
        .setup()
        .await
        .unwrap();

    assert_eq!(harness.indexer.last_filters(), filters);
    assert_eq!(session.indexer.filters(), filters.as_slice());
}

#[tokio::test]
async fn test_default_filters_are_empty() {
    let harness = Harness::new();
    harness.builder(dev_config()).setup().await.unwrap();
    assert!(harness.indexer.last_filters().is_empty());
}

#[tokio::test]
async fn test_malformed_registry_rejects_bootstrap() {
    let harness = Harness::new();
    let world = ComponentRegistry::builder()
        .component(ComponentSchema::new("Tile").field("row", FieldType::Number, "u32"))
        .build()
        .unwrap();

    let result = harness.builder_with_world(dev_config(), world).setup().await;

    assert!(matches!(
        result,
        Err(SetupError::Registry(RegistryError::MissingComponent(name))) if name == "Player"
    ));
}

#[tokio::test]
async fn test_missing_collaborator() {
    let result = NetworkBuilder::new(dev_config(), Arc::new(tileworld_registry().unwrap()))
        .setup()
        .await;

    assert!(matches!(result, Err(SetupError::MissingCollaborator(_))));
}
