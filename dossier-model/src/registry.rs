use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult};
use crate::proxy::EntityProxy;
use crate::schema::Schema;

/// Capability trait for resolving schema names and binding raw data.
///
/// The store is constructed with a `SchemaRegistry` rather than a concrete
/// schema set, so entity persistence never hard-codes schema shapes.
pub trait SchemaRegistry: Send + Sync {
    /// Resolves a schema by name.
    fn resolve(&self, name: &str) -> ModelResult<&Schema>;

    /// Builds a normalized proxy from a raw entity payload.
    ///
    /// The payload's `schema` key selects the schema; `properties` holds the
    /// raw values. When `cleaned` is false every value is checked against
    /// its property type and silently dropped if it does not fit. When
    /// `cleaned` is true values are trusted as-is (used when re-reading
    /// already-persisted state).
    fn get_proxy(&self, data: &Value, cleaned: bool) -> ModelResult<EntityProxy> {
        let name = data
            .get("schema")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or(ModelError::MissingSchema)?;
        let schema = self.resolve(name)?;
        Ok(EntityProxy::from_raw(schema, data, cleaned))
    }
}

/// In-memory schema registry.
///
/// Production deployments load their schema vocabulary from configuration;
/// this implementation simply holds whatever schemata it was given.
#[derive(Debug, Default, Clone)]
pub struct Model {
    schemata: BTreeMap<String, Schema>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema to the registry.
    pub fn insert(&mut self, schema: Schema) {
        self.schemata.insert(schema.name.clone(), schema);
    }

    /// Builder-style variant of [`Model::insert`].
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.insert(schema);
        self
    }
}

impl SchemaRegistry for Model {
    fn resolve(&self, name: &str) -> ModelResult<&Schema> {
        self.schemata
            .get(name)
            .ok_or_else(|| ModelError::UnknownSchema {
                name: name.to_string(),
            })
    }
}
