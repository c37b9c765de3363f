use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult};

/// The declared type of a schema property.
///
/// Drives value cleaning when a proxy is built and strict validation when a
/// caller requests it. [`PropertyType::Checksum`] additionally marks a
/// property as system-assigned: its value can never be overwritten through
/// an update once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Name,
    Text,
    Identifier,
    Country,
    Date,
    Number,
    Url,
    Email,
    /// A reference to another entity; values are entity ids and get re-keyed
    /// into the collection namespace alongside the entity's own id.
    Entity,
    /// A content hash. Immutable after first set.
    Checksum,
}

impl PropertyType {
    /// Checks a single raw value against this type's shape, returning the
    /// violated constraint on failure.
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        let value = value.trim();
        if value.is_empty() {
            return Err("value is empty");
        }
        match self {
            Self::Name | Self::Text | Self::Identifier => Ok(()),
            Self::Country => {
                if value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic()) {
                    Ok(())
                } else {
                    Err("not a two-letter country code")
                }
            }
            Self::Date => check_date(value),
            Self::Number => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| "not a number"),
            Self::Url => {
                if value.starts_with("http://") || value.starts_with("https://") {
                    Ok(())
                } else {
                    Err("not an http(s) URL")
                }
            }
            Self::Email => {
                let mut parts = value.splitn(2, '@');
                match (parts.next(), parts.next()) {
                    (Some(local), Some(domain))
                        if !local.is_empty() && domain.contains('.') =>
                    {
                        Ok(())
                    }
                    _ => Err("not an email address"),
                }
            }
            Self::Entity => {
                if dossier_types::is_valid_entity_id(value) {
                    Ok(())
                } else {
                    Err("not a valid entity id")
                }
            }
            Self::Checksum => {
                if value.len() >= 6 && value.bytes().all(|b| b.is_ascii_hexdigit()) {
                    Ok(())
                } else {
                    Err("not a hex digest")
                }
            }
        }
    }

    /// Cleans a raw value into its canonical form, or `None` when the value
    /// does not fit this type and must be dropped.
    #[must_use]
    pub fn clean(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if self.check(value).is_err() {
            return None;
        }
        match self {
            Self::Country | Self::Checksum => Some(value.to_ascii_lowercase()),
            _ => Some(value.to_string()),
        }
    }
}

// Accepts YYYY, YYYY-MM and YYYY-MM-DD prefixes of ISO dates.
fn check_date(value: &str) -> Result<(), &'static str> {
    const ERR: &str = "not an ISO date";
    let date = value.get(..10).unwrap_or(value);
    match date.len() {
        4 => date.parse::<i32>().map(|_| ()).map_err(|_| ERR),
        7 => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| ERR),
        10 => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| ERR),
        _ => Err(ERR),
    }
}

/// A single typed property of a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub label: String,
    pub prop_type: PropertyType,
}

impl Property {
    #[must_use]
    pub fn new(name: &str, prop_type: PropertyType) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            prop_type,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Whether this property is a content hash, immutable once set.
    #[must_use]
    pub const fn is_checksum(&self) -> bool {
        matches!(self.prop_type, PropertyType::Checksum)
    }
}

/// A named set of typed properties an entity can conform to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub label: String,
    pub properties: BTreeMap<String, Property>,
}

impl Schema {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.properties.insert(prop.name.clone(), prop);
        self
    }

    /// Looks up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Iterates the checksum-typed properties of this schema.
    pub fn checksum_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values().filter(|p| p.is_checksum())
    }

    /// Validates a raw entity payload against this schema.
    ///
    /// This runs over the raw `properties` object, not the cleaned proxy:
    /// proxy building already drops unrepresentable values, so the only job
    /// here is to turn a silently-dropped value into an error the caller can
    /// report. Unknown property names are ignored, as they are during
    /// cleaning.
    pub fn validate(&self, data: &Value) -> ModelResult<()> {
        let Some(props) = data.get("properties").and_then(Value::as_object) else {
            return Ok(());
        };
        for (name, raw) in props {
            let Some(prop) = self.property(name) else {
                continue;
            };
            for value in value_list(raw) {
                let constraint = match scalar_text(value) {
                    Some(text) => match prop.prop_type.check(&text) {
                        Ok(()) => continue,
                        Err(c) => c.to_string(),
                    },
                    None => "value is not a scalar".to_string(),
                };
                return Err(ModelError::Validation {
                    schema: self.name.clone(),
                    property: name.clone(),
                    constraint,
                });
            }
        }
        Ok(())
    }
}

/// Flattens a raw property value into a list of candidate values.
pub(crate) fn value_list(raw: &Value) -> Vec<&Value> {
    match raw {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Renders a scalar JSON value as text; `None` for nulls, objects and
/// nested arrays, which have no property representation.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
