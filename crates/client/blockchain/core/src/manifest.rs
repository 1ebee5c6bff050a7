//! World manifest: deployed contract addresses and model layouts.
//!
//! Manifests are produced by the contract toolchain, one per environment, and
//! are read-only once loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Felt;

/// Errors raised while loading a manifest document.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deployment manifest for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub world: WorldManifest,

    #[serde(default)]
    pub contracts: Vec<ContractManifest>,

    #[serde(default)]
    pub models: Vec<ModelManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldManifest {
    pub name: String,
    pub address: Option<Felt>,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractManifest {
    /// Fully qualified name (e.g., "tileworld::systems::actions::actions")
    pub name: String,
    pub address: Option<Felt>,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,

    #[serde(default)]
    pub members: Vec<ModelMember>,

    pub class_hash: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMember {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub key: bool,
}

impl Manifest {
    /// Parse a manifest from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest file from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Find a deployed contract by name.
    ///
    /// Matches the fully qualified name first, then the last `::` segment, so
    /// both "tileworld::systems::actions::actions" and "actions" resolve.
    pub fn contract(&self, name: &str) -> Option<&ContractManifest> {
        self.contracts
            .iter()
            .find(|c| c.name == name)
            .or_else(|| {
                self.contracts
                    .iter()
                    .find(|c| c.name.rsplit("::").next() == Some(name))
            })
    }

    pub fn model(&self, name: &str) -> Option<&ModelManifest> {
        self.models.iter().find(|m| m.name == name)
    }
}
