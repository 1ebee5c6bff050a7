//! Burner account configuration.

use std::env;
use std::path::PathBuf;

use client_blockchain_core::AccountError;

/// Default amount (in wei) transferred to each new burner: 0.01 ETH.
pub const DEFAULT_PREFUND_AMOUNT: u128 = 10_000_000_000_000_000;

/// Settings for the master (funding) account and burner persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnerConfig {
    /// Address of the account that funds new burners
    pub master_address: String,

    /// Private key of the funding account
    pub master_private_key: String,

    /// Class hash burners are deployed with
    pub account_class_hash: String,

    /// File where burners are persisted (default: platform data directory)
    pub store_path: Option<PathBuf>,

    /// Wei transferred to each burner before deployment
    pub prefund_amount: u128,
}

impl BurnerConfig {
    pub fn new(
        master_address: impl Into<String>,
        master_private_key: impl Into<String>,
        account_class_hash: impl Into<String>,
    ) -> Self {
        Self {
            master_address: master_address.into(),
            master_private_key: master_private_key.into(),
            account_class_hash: account_class_hash.into(),
            store_path: None,
            prefund_amount: DEFAULT_PREFUND_AMOUNT,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PUBLIC_MASTER_ADDRESS` - Funding account address (required)
    /// - `PUBLIC_MASTER_PRIVATE_KEY` - Funding account private key (required)
    /// - `PUBLIC_ACCOUNT_CLASS_HASH` - Burner account class hash (required)
    /// - `BURNER_STORE_PATH` - Burner persistence file (default: platform data dir)
    /// - `BURNER_PREFUND_AMOUNT` - Wei sent to each new burner (default: 10^16)
    pub fn from_env() -> Result<Self, AccountError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AccountError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AccountError::InvalidConfig(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("PUBLIC_MASTER_ADDRESS")?,
            required("PUBLIC_MASTER_PRIVATE_KEY")?,
            required("PUBLIC_ACCOUNT_CLASS_HASH")?,
        );

        config.store_path = lookup("BURNER_STORE_PATH").map(PathBuf::from);

        if let Some(amount) = lookup("BURNER_PREFUND_AMOUNT") {
            config.prefund_amount = amount.parse().map_err(|_| {
                AccountError::InvalidConfig(format!("Invalid BURNER_PREFUND_AMOUNT: {amount}"))
            })?;
        }

        Ok(config)
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Persistence file, falling back to the platform data directory.
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("gg", "tileworld", "tileworld")
        .map(|dirs| dirs.data_dir().join("burners.json"))
        .unwrap_or_else(|| PathBuf::from("burners.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_with_defaults() {
        let config = BurnerConfig::from_lookup(lookup(&[
            ("PUBLIC_MASTER_ADDRESS", "0x1"),
            ("PUBLIC_MASTER_PRIVATE_KEY", "0x2"),
            ("PUBLIC_ACCOUNT_CLASS_HASH", "0x3"),
        ]))
        .unwrap();

        assert_eq!(config, BurnerConfig::new("0x1", "0x2", "0x3"));
        assert_eq!(config.prefund_amount, DEFAULT_PREFUND_AMOUNT);
        assert!(config.resolved_store_path().ends_with("burners.json"));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = BurnerConfig::from_lookup(lookup(&[
            ("PUBLIC_MASTER_ADDRESS", "0x1"),
            ("PUBLIC_MASTER_PRIVATE_KEY", "0x2"),
            ("PUBLIC_ACCOUNT_CLASS_HASH", "0x3"),
            ("BURNER_STORE_PATH", "/tmp/burners.json"),
            ("BURNER_PREFUND_AMOUNT", "42"),
        ]))
        .unwrap();

        assert_eq!(config.resolved_store_path(), PathBuf::from("/tmp/burners.json"));
        assert_eq!(config.prefund_amount, 42);
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let missing = BurnerConfig::from_lookup(lookup(&[("PUBLIC_MASTER_ADDRESS", "0x1")]));
        assert!(matches!(missing, Err(AccountError::InvalidConfig(msg)) if msg.contains("PUBLIC_MASTER_PRIVATE_KEY")));

        let invalid = BurnerConfig::from_lookup(lookup(&[
            ("PUBLIC_MASTER_ADDRESS", "0x1"),
            ("PUBLIC_MASTER_PRIVATE_KEY", "0x2"),
            ("PUBLIC_ACCOUNT_CLASS_HASH", "0x3"),
            ("BURNER_PREFUND_AMOUNT", "lots"),
        ]));
        assert!(matches!(invalid, Err(AccountError::InvalidConfig(_))));
    }
}
