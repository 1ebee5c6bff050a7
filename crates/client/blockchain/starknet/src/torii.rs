//! Torii indexer client over the GraphQL HTTP endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use client_blockchain_core::{EntityFilter, IndexerClient, IndexerConnector, IndexerError, ModelMetadata};

const MODELS_QUERY: &str = "query { models { edges { node { id name classHash } } } }";

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<serde_json::Value>,

    errors: Option<Vec<GraphQLErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorMessage {
    message: String,
}

/// Connected Torii client.
///
/// Connecting performs a handshake that lists the world's models; a client
/// only exists once the indexer has answered.
pub struct ToriiClient {
    http: Client,
    graphql_url: Url,
    rpc_url: String,
    world_address: String,
    filters: Vec<EntityFilter>,
    models: Vec<ModelMetadata>,
}

impl ToriiClient {
    pub async fn connect(
        rpc_url: &str,
        torii_url: &str,
        world_address: &str,
        filters: Vec<EntityFilter>,
    ) -> Result<Self, IndexerError> {
        let graphql_url = graphql_endpoint(torii_url)?;

        let mut client = Self {
            http: Client::new(),
            graphql_url,
            rpc_url: rpc_url.to_string(),
            world_address: world_address.to_string(),
            filters,
            models: Vec::new(),
        };

        let data = client
            .query(MODELS_QUERY)
            .await
            .map_err(|e| IndexerError::Handshake(e.to_string()))?;
        client.models = parse_models(&data);

        tracing::info!(
            "Connected to Torii at {} ({} models, {} filters)",
            client.graphql_url,
            client.models.len(),
            client.filters.len()
        );

        Ok(client)
    }

    /// Node URL this client was paired with.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }
}

#[async_trait]
impl IndexerClient for ToriiClient {
    fn world_address(&self) -> &str {
        &self.world_address
    }

    fn filters(&self) -> &[EntityFilter] {
        &self.filters
    }

    fn models(&self) -> &[ModelMetadata] {
        &self.models
    }

    async fn query(&self, query: &str) -> Result<serde_json::Value, IndexerError> {
        let response = self
            .http
            .post(self.graphql_url.clone())
            .json(&GraphQLRequest { query })
            .send()
            .await
            .map_err(|e| IndexerError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IndexerError::Query(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let body: GraphQLResponse = response
            .json()
            .await
            .map_err(|e| IndexerError::Query(format!("invalid response: {}", e)))?;

        into_data(body)
    }
}

/// Connects [`ToriiClient`]s for the network bootstrap.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToriiConnector;

#[async_trait]
impl IndexerConnector for ToriiConnector {
    async fn connect(
        &self,
        node_url: &str,
        indexer_url: &str,
        world_address: &str,
        filters: Vec<EntityFilter>,
    ) -> Result<Arc<dyn IndexerClient>, IndexerError> {
        let client = ToriiClient::connect(node_url, indexer_url, world_address, filters).await?;
        Ok(Arc::new(client))
    }
}

fn graphql_endpoint(torii_url: &str) -> Result<Url, IndexerError> {
    let endpoint = format!("{}/graphql", torii_url.trim_end_matches('/'));
    Url::parse(&endpoint).map_err(|e| IndexerError::InvalidUrl(format!("{torii_url}: {e}")))
}

fn into_data(body: GraphQLResponse) -> Result<serde_json::Value, IndexerError> {
    if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(IndexerError::Query(messages.join("; ")));
    }

    body.data
        .ok_or_else(|| IndexerError::Query("response has no data".to_string()))
}

fn parse_models(data: &serde_json::Value) -> Vec<ModelMetadata> {
    data.pointer("/models/edges")
        .and_then(|edges| edges.as_array())
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| {
                    let node = edge.get("node")?;
                    Some(ModelMetadata {
                        name: node.get("name")?.as_str()?.to_string(),
                        class_hash: node
                            .get("classHash")
                            .and_then(|h| h.as_str())
                            .map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
