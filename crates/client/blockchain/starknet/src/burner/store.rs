//! JSON persistence for burner accounts.
//!
//! File layout:
//! ```text
//! {
//!   "burners": {
//!     "0x<address>": {
//!       "private_key": "0x..", "public_key": "0x..",
//!       "prefund_tx": "0x..", "deploy_tx": "0x..", "deployed": true, "active": true
//!     }
//!   }
//! }
//! ```
//!
//! A burner is recorded before it is funded, so a creation interrupted at any
//! point leaves an undeployed record whose key can still be recovered.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use client_blockchain_core::{AccountError, Felt};

use crate::utils::parse_felt;

/// Key material and status of one burner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnerRecord {
    pub private_key: Felt,
    pub public_key: Felt,

    /// Transfer from the master account, `None` until funding was submitted
    #[serde(default)]
    pub prefund_tx: Option<Felt>,

    /// Deployment transaction, `None` until deployment was submitted
    #[serde(default)]
    pub deploy_tx: Option<Felt>,

    /// Set once the account contract is confirmed on chain
    #[serde(default)]
    pub deployed: bool,

    #[serde(default)]
    pub active: bool,
}

impl BurnerRecord {
    /// Record for a freshly generated key, before any transaction.
    pub fn pending(private_key: Felt, public_key: Felt) -> Self {
        Self {
            private_key,
            public_key,
            prefund_tx: None,
            deploy_tx: None,
            deployed: false,
            active: false,
        }
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed
    }
}

#[derive(Default, Serialize, Deserialize)]
struct StoredBurners {
    #[serde(default)]
    burners: BTreeMap<String, BurnerRecord>,
}

/// File-backed burner storage.
#[derive(Clone, Debug)]
pub struct BurnerStore {
    path: PathBuf,
}

impl BurnerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored burner; a missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<Felt, BurnerRecord>, AccountError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| storage_error(&self.path, e))?;
        let stored: StoredBurners =
            serde_json::from_str(&json).map_err(|e| storage_error(&self.path, e))?;

        stored
            .burners
            .into_iter()
            .map(|(address, record)| {
                let address = parse_felt(&address).map_err(AccountError::Storage)?;
                Ok((address, record))
            })
            .collect()
    }

    /// Replace the stored burners with `burners`.
    pub fn save(&self, burners: &BTreeMap<Felt, BurnerRecord>) -> Result<(), AccountError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let stored = StoredBurners {
            burners: burners
                .iter()
                .map(|(address, record)| (format!("{address:#x}"), record.clone()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| storage_error(&self.path, e))?;

        // Write-then-rename so a crash never leaves a truncated store
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))?;

        Ok(())
    }
}

fn storage_error(path: &Path, error: impl std::fmt::Display) -> AccountError {
    AccountError::Storage(format!("{}: {}", path.display(), error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(key: u64, active: bool) -> BurnerRecord {
        BurnerRecord {
            private_key: Felt::from(key),
            public_key: Felt::from(key + 1),
            prefund_tx: Some(Felt::from(key + 2)),
            deploy_tx: Some(Felt::from(key + 3)),
            deployed: true,
            active,
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = BurnerStore::new(dir.path().join("burners.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let store = BurnerStore::new(dir.path().join("nested").join("burners.json"));

        let mut burners = BTreeMap::new();
        burners.insert(Felt::from(0xa1u64), record(10, true));
        burners.insert(Felt::from(0xb2u64), record(20, false));
        store.save(&burners).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
        assert_eq!(store.load().unwrap(), burners);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("burners.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            BurnerStore::new(path).load(),
            Err(AccountError::Storage(_))
        ));
    }

    #[test]
    fn test_records_default_to_undeployed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("burners.json");
        std::fs::write(
            &path,
            r#"{ "burners": { "0x5": { "private_key": "0x1", "public_key": "0x2" } } }"#,
        )
        .unwrap();

        let burners = BurnerStore::new(path).load().unwrap();
        let burner = &burners[&Felt::from(5u8)];
        assert!(!burner.is_deployed());
        assert!(!burner.active);
        assert_eq!(burner.prefund_tx, None);
    }
}
