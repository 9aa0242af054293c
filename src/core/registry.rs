use crate::core::catalog;
use crate::domain::schema::SchemaDescriptor;
use crate::utils::error::{ModelError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static EPOCH_REGISTRY: Lazy<Registry> = Lazy::new(catalog::epoch_registry);

/// The process-wide table of every Epoch API schema.
///
/// Built on first use and never mutated afterwards, so it can be read from any
/// number of threads without locking.
pub fn registry() -> &'static Registry {
    &EPOCH_REGISTRY
}

/// Schema name -> descriptor table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: HashMap<&'static str, SchemaDescriptor>,
    order: Vec<&'static str>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn lookup(&self, name: &str) -> Result<&SchemaDescriptor> {
        self.schemas
            .get(name)
            .ok_or_else(|| ModelError::UnknownSchema {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Schema names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check that every model reference, union candidate and discriminator
    /// subtype points at a registered schema.
    pub fn check_references(&self) -> Result<()> {
        for name in &self.order {
            let desc = &self.schemas[name];
            for reference in desc.references() {
                if !self.contains(reference) {
                    tracing::error!("Schema {} refers to unregistered {}", desc.name, reference);
                    return Err(ModelError::UnknownSchema {
                        name: reference.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: Vec<SchemaDescriptor>,
}

impl RegistryBuilder {
    pub fn register(mut self, descriptor: SchemaDescriptor) -> Self {
        self.schemas.push(descriptor);
        self
    }

    pub fn build(self) -> Registry {
        let mut registry = Registry::default();
        for desc in self.schemas {
            let name = desc.name;
            if registry.schemas.insert(name, desc).is_some() {
                tracing::warn!("Schema {} registered twice, keeping the last one", name);
            } else {
                registry.order.push(name);
            }
        }
        tracing::debug!("Schema registry built with {} schemas", registry.len());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldSpec, FieldType};

    #[test]
    fn test_lookup_and_unknown_schema() {
        let registry = Registry::builder()
            .register(SchemaDescriptor::object(
                "Balance",
                vec![FieldSpec::optional("balance", FieldType::Integer)],
            ))
            .build();

        assert!(registry.lookup("Balance").is_ok());
        match registry.lookup("Nope") {
            Err(ModelError::UnknownSchema { name }) => assert_eq!(name, "Nope"),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn test_dangling_reference_is_reported() {
        let registry = Registry::builder()
            .register(SchemaDescriptor::array("Pows", FieldType::Model("Pow")))
            .build();

        assert!(matches!(
            registry.check_references(),
            Err(ModelError::UnknownSchema { name }) if name == "Pow"
        ));
    }

    #[test]
    fn test_duplicate_registration_keeps_single_entry() {
        let registry = Registry::builder()
            .register(SchemaDescriptor::array("Pow", FieldType::Integer))
            .register(SchemaDescriptor::array("Pow", FieldType::Float))
            .build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Pow"]);
    }
}
