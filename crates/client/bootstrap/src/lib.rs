//! Network session bootstrap for Tileworld clients.
//!
//! Loads configuration, selects the world manifest, and assembles the contract
//! provider, indexer client, burner accounts and contract components into a
//! single [`NetworkSession`] that front-ends share.
pub mod builder;
pub mod components;
pub mod config;
pub mod manifests;
pub mod session;
pub mod systems;
pub mod world;

#[cfg(feature = "starknet")]
pub use builder::setup_network;
pub use builder::{NetworkBuilder, SetupError};
pub use components::{ContractComponents, define_contract_components};
pub use config::{ConfigError, Environment, NetworkConfig};
pub use manifests::Manifests;
pub use session::NetworkSession;
pub use systems::{SystemCalls, Tile, TileType};
pub use world::{ComponentRegistry, ComponentSchema, FieldType, RegistryError, tileworld_registry};
