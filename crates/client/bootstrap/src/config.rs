//! Network configuration structures and loaders.
use std::env;

/// Deployment environment, selecting which manifest the session uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Interpret the dev-mode flag: exactly `"true"` selects development.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "true" {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Settings required to bootstrap a network session.
///
/// Values are passed to the collaborators as-is; their format is checked by
/// whichever collaborator interprets them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub world_address: String,
    pub node_url: String,
    pub torii_url: String,
    pub environment: Environment,
}

impl NetworkConfig {
    pub fn new(
        world_address: impl Into<String>,
        node_url: impl Into<String>,
        torii_url: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            world_address: world_address.into(),
            node_url: node_url.into(),
            torii_url: torii_url.into(),
            environment,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PUBLIC_WORLD_ADDRESS` - World contract address (required)
    /// - `PUBLIC_NODE_URL` - Starknet JSON-RPC endpoint (required)
    /// - `PUBLIC_TORII` - Torii indexer endpoint (required)
    /// - `PUBLIC_DEV` - `true` selects the development manifest (default: production)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construct configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let environment = lookup("PUBLIC_DEV")
            .map(|flag| Environment::from_flag(&flag))
            .unwrap_or_default();

        Ok(Self::new(
            required("PUBLIC_WORLD_ADDRESS")?,
            required("PUBLIC_NODE_URL")?,
            required("PUBLIC_TORII")?,
            environment,
        ))
    }

    /// Human-readable table of the addresses and endpoints in use.
    pub fn details_table(&self) -> String {
        let rows = [
            ("worldAddress", self.world_address.as_str()),
            ("nodeUrl", self.node_url.as_str()),
            ("toriiUrl", self.torii_url.as_str()),
        ];

        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0).max(5);
        let border = format!("+-{}-+-{}-+", "-".repeat(key_width), "-".repeat(value_width));

        let mut table = String::new();
        table.push_str(&border);
        table.push('\n');
        table.push_str(&format!("| {:key_width$} | {:value_width$} |\n", "key", "value"));
        table.push_str(&border);
        table.push('\n');
        for (key, value) in rows {
            table.push_str(&format!("| {key:key_width$} | {value:value_width$} |\n"));
        }
        table.push_str(&border);
        table
    }
}
