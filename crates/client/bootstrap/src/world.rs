//! Entity-component registry shared by the client state layer.
//!
//! The registry is assembled once at startup and is immutable afterwards;
//! consumers hold it behind an `Arc` and only read from it.
use std::collections::HashMap;
use std::sync::Arc;

/// Client-side representation of a component field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Fits in a JS-safe number (u8..u32)
    Number,
    /// Wider integers, felts and addresses
    BigInt,
    Boolean,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
}

/// On-chain description of a component: model name plus Cairo member types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub name: String,
    pub types: Vec<String>,
    pub custom_types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentSchema {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub metadata: ComponentMetadata,
}

impl ComponentSchema {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            metadata: ComponentMetadata {
                name: name.clone(),
                types: Vec::new(),
                custom_types: Vec::new(),
            },
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field and its Cairo type.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType, cairo_type: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self.metadata.types.push(cairo_type.into());
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Component registered twice: {0}")]
    Duplicate(String),

    #[error("Component not registered: {0}")]
    MissingComponent(String),

    #[error("Malformed component {component}: {reason}")]
    Malformed { component: String, reason: String },
}

/// Immutable set of component schemas.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: Vec<Arc<ComponentSchema>>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ComponentSchema>> {
        self.by_name.get(name).map(|&index| &self.components[index])
    }

    /// Components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ComponentSchema>> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    components: Vec<ComponentSchema>,
}

impl RegistryBuilder {
    pub fn component(mut self, schema: ComponentSchema) -> Self {
        self.components.push(schema);
        self
    }

    pub fn build(self) -> Result<ComponentRegistry, RegistryError> {
        let mut registry = ComponentRegistry::default();

        for schema in self.components {
            if registry.by_name.contains_key(&schema.name) {
                return Err(RegistryError::Duplicate(schema.name));
            }
            registry
                .by_name
                .insert(schema.name.clone(), registry.components.len());
            registry.components.push(Arc::new(schema));
        }

        Ok(registry)
    }
}

/// Registry holding every Tileworld component.
pub fn tileworld_registry() -> Result<ComponentRegistry, RegistryError> {
    ComponentRegistry::builder()
        .component(
            ComponentSchema::new("Player")
                .field("player", FieldType::BigInt, "ContractAddress")
                .field("score", FieldType::Number, "u32")
                .field("remaining_moves", FieldType::Number, "u8"),
        )
        .component(
            ComponentSchema::new("Tile")
                .field("row", FieldType::Number, "u32")
                .field("col", FieldType::Number, "u32")
                .field("tile_type", FieldType::Number, "u8"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tileworld_registry() {
        let registry = tileworld_registry().unwrap();
        assert_eq!(registry.len(), 2);

        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Player", "Tile"]);

        let tile = registry.get("Tile").unwrap();
        assert_eq!(tile.metadata.types, ["u32", "u32", "u8"]);
        assert_eq!(tile.field_named("tile_type").unwrap().ty, FieldType::Number);
        assert!(registry.get("Moves").is_none());
    }

    #[test]
    fn test_duplicate_components_are_rejected() {
        let result = ComponentRegistry::builder()
            .component(ComponentSchema::new("Tile"))
            .component(ComponentSchema::new("Tile"))
            .build();

        assert!(matches!(result, Err(RegistryError::Duplicate(name)) if name == "Tile"));
    }
}
