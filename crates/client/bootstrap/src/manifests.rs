//! Development and production world manifests.
use std::path::Path;
use std::sync::Arc;

use client_blockchain_core::{Manifest, ManifestError};

use crate::config::Environment;

// Placeholder documents with illustrative addresses; replace them with the
// `sozo build` output of the deployed world before pointing the client at a
// real network.
const DEV_MANIFEST: &str = include_str!("../manifests/dev/manifest.json");
const RELEASE_MANIFEST: &str = include_str!("../manifests/release/manifest.json");

/// The pair of manifests a session chooses from.
#[derive(Clone, Debug)]
pub struct Manifests {
    development: Arc<Manifest>,
    production: Arc<Manifest>,
}

impl Manifests {
    pub fn new(development: Manifest, production: Manifest) -> Self {
        Self {
            development: Arc::new(development),
            production: Arc::new(production),
        }
    }

    /// Manifests compiled into the binary from `manifests/{dev,release}`.
    ///
    /// The checked-in files are placeholders until replaced by `sozo build`
    /// output; use [`Manifests::load`] to read a deployment's own manifests.
    pub fn embedded() -> Result<Self, ManifestError> {
        Ok(Self::new(
            Manifest::from_json(DEV_MANIFEST)?,
            Manifest::from_json(RELEASE_MANIFEST)?,
        ))
    }

    /// Load both manifests from disk.
    pub fn load(development: &Path, production: &Path) -> Result<Self, ManifestError> {
        Ok(Self::new(Manifest::load(development)?, Manifest::load(production)?))
    }

    /// Manifest for `environment`. Never fails.
    pub fn select(&self, environment: Environment) -> Arc<Manifest> {
        match environment {
            Environment::Development => Arc::clone(&self.development),
            Environment::Production => Arc::clone(&self.production),
        }
    }

    pub fn development(&self) -> &Arc<Manifest> {
        &self.development
    }

    pub fn production(&self) -> &Arc<Manifest> {
        &self.production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_manifests_parse_and_differ() {
        let manifests = Manifests::embedded().unwrap();
        assert_ne!(manifests.development().world.address, manifests.production().world.address);

        for manifest in [manifests.development(), manifests.production()] {
            assert!(manifest.contract("actions").and_then(|c| c.address).is_some());
            assert!(manifest.model("Player").is_some());
            assert!(manifest.model("Tile").is_some());
        }
    }

    #[test]
    fn test_select_picks_exactly_one() {
        let manifests = Manifests::embedded().unwrap();

        let dev = manifests.select(Environment::Development);
        assert!(Arc::ptr_eq(&dev, manifests.development()));
        assert!(!Arc::ptr_eq(&dev, manifests.production()));

        let prod = manifests.select(Environment::Production);
        assert!(Arc::ptr_eq(&prod, manifests.production()));
        assert!(!Arc::ptr_eq(&prod, manifests.development()));
    }

    #[test]
    fn test_selection_follows_flag() {
        let manifests = Manifests::embedded().unwrap();
        for (flag, expected) in [
            ("true", manifests.development()),
            ("false", manifests.production()),
            ("", manifests.production()),
            ("yes", manifests.production()),
        ] {
            let selected = manifests.select(Environment::from_flag(flag));
            assert!(Arc::ptr_eq(&selected, expected), "flag {flag:?}");
        }
    }
}
