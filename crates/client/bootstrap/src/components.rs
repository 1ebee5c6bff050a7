//! Contract component bindings derived from the component registry.
use std::sync::Arc;

use crate::world::{ComponentRegistry, ComponentSchema, RegistryError};

/// Components mirrored from the world contract's models.
#[derive(Clone, Debug)]
pub struct ContractComponents {
    pub player: Arc<ComponentSchema>,
    pub tile: Arc<ComponentSchema>,
}

impl ContractComponents {
    pub fn all(&self) -> [&Arc<ComponentSchema>; 2] {
        [&self.player, &self.tile]
    }
}

/// Bind every contract component to its schema in `world`.
///
/// Fails only if `world` lacks a component or holds one whose metadata does
/// not describe its fields.
pub fn define_contract_components(world: &ComponentRegistry) -> Result<ContractComponents, RegistryError> {
    Ok(ContractComponents {
        player: bind(world, "Player")?,
        tile: bind(world, "Tile")?,
    })
}

fn bind(world: &ComponentRegistry, name: &str) -> Result<Arc<ComponentSchema>, RegistryError> {
    let schema = world
        .get(name)
        .ok_or_else(|| RegistryError::MissingComponent(name.to_string()))?;

    if schema.metadata.name != schema.name {
        return Err(RegistryError::Malformed {
            component: name.to_string(),
            reason: format!("metadata names model {}", schema.metadata.name),
        });
    }

    if schema.metadata.types.len() != schema.fields.len() {
        return Err(RegistryError::Malformed {
            component: name.to_string(),
            reason: format!(
                "{} fields but {} metadata types",
                schema.fields.len(),
                schema.metadata.types.len()
            ),
        });
    }

    Ok(Arc::clone(schema))
}
