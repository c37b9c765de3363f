use dossier_types::RoleId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::schema::{scalar_text, value_list, Schema};

/// A normalized, schema-typed view of an entity's properties, independent of
/// storage representation.
///
/// Property values are lists of strings keyed by property name; building a
/// proxy drops anything the schema cannot represent (unknown properties,
/// non-scalar values, and — unless the input is already clean — values that
/// fail their property type's shape check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProxy {
    pub id: Option<String>,
    pub schema: String,
    pub properties: BTreeMap<String, Vec<String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub role_id: Option<RoleId>,
    /// Marks a proxy that may be further edited, as opposed to read-only
    /// views derived elsewhere (e.g. from indexed documents).
    pub mutable: bool,
}

impl EntityProxy {
    /// Builds a proxy for `schema` from a raw entity payload.
    #[must_use]
    pub fn from_raw(schema: &Schema, data: &Value, cleaned: bool) -> Self {
        let mut properties: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(raw_props) = data.get("properties").and_then(Value::as_object) {
            for (name, raw) in raw_props {
                let Some(prop) = schema.property(name) else {
                    continue;
                };
                let mut values = Vec::new();
                for value in value_list(raw) {
                    let Some(text) = scalar_text(value) else {
                        continue;
                    };
                    if cleaned {
                        values.push(text);
                    } else if let Some(clean) = prop.prop_type.clean(&text) {
                        values.push(clean);
                    }
                }
                if !values.is_empty() {
                    properties.insert(name.clone(), values);
                }
            }
        }

        Self {
            id: data
                .get("id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            schema: schema.name.clone(),
            properties,
            created_at: string_field(data, "created_at"),
            updated_at: string_field(data, "updated_at"),
            role_id: data.get("role_id").and_then(Value::as_i64).map(RoleId::new),
            mutable: data
                .get("mutable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Returns all values of a property.
    #[must_use]
    pub fn get(&self, prop: &str) -> &[String] {
        self.properties.get(prop).map_or(&[], Vec::as_slice)
    }

    /// Returns the first value of a property.
    #[must_use]
    pub fn first(&self, prop: &str) -> Option<&str> {
        self.get(prop).first().map(String::as_str)
    }

    /// Replaces all values of a property. Empty values unset it.
    pub fn set(&mut self, prop: &str, values: Vec<String>) {
        if values.is_empty() {
            self.properties.remove(prop);
        } else {
            self.properties.insert(prop.to_string(), values);
        }
    }

    /// Removes a property entirely.
    pub fn unset(&mut self, prop: &str) {
        self.properties.remove(prop);
    }
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
