//! Common types for contract interactions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::{BurnerPool, SessionAccount};

/// Starknet field element, the unit of every address, selector and calldata word.
pub use starknet_types_core::felt::Felt;

/// A single contract invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Contract address
    pub to: Felt,

    /// Entrypoint selector
    pub selector: Felt,

    /// Serialized arguments
    pub calldata: Vec<Felt>,
}

/// Result of submitting an invoke transaction.
///
/// The transaction is accepted by the node but not necessarily included yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeReceipt {
    pub transaction_hash: Felt,
}

/// Entity subscription filter handed to the indexer at connect time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    /// Model name (e.g., "Tile")
    pub model: String,

    /// Entity keys to match; empty matches every entity of the model
    pub keys: Vec<Felt>,
}

impl EntityFilter {
    pub fn new(model: impl Into<String>, keys: Vec<Felt>) -> Self {
        Self {
            model: model.into(),
            keys,
        }
    }
}

/// Model metadata reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub class_hash: Option<String>,
}

/// Summary of a burner account known to a [`BurnerPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnerInfo {
    pub address: Felt,
    pub active: bool,
    pub deployed: bool,
}

/// Account and burner manager produced by an [`AccountSource`](crate::AccountSource).
#[derive(Clone)]
pub struct AccountBundle {
    /// Account used to sign session transactions
    pub account: Arc<dyn SessionAccount>,

    /// Manager owning the burner pool the account came from
    pub burner_manager: Arc<dyn BurnerPool>,
}
