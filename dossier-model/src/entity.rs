use chrono::{DateTime, Utc};
use dossier_types::{is_valid_entity_id, make_textid, CollectionId, RoleId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::collection::Collection;
use crate::error::{ModelError, ModelResult};
use crate::lifecycle::{Dated, SoftDelete};
use crate::proxy::EntityProxy;
use crate::registry::SchemaRegistry;

/// A typed record conforming to a schema, owned by a collection.
///
/// The stored `id` is always the namespaced form produced by the owning
/// collection — never a raw caller-supplied id. The property map in `data`
/// is whatever the schema proxy normalized, with checksum-typed properties
/// pinned to their previously persisted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub schema: String,
    pub data: BTreeMap<String, Vec<String>>,
    pub role_id: Option<RoleId>,
    pub collection_id: CollectionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity {
    pub const THING: &'static str = "Thing";
    pub const LEGAL_ENTITY: &'static str = "LegalEntity";

    /// Builds a new entity from a raw payload.
    ///
    /// The candidate id is `data.id` when present, otherwise freshly
    /// generated; a caller-supplied id that fails format validation is
    /// rejected with [`ModelError::InvalidId`]. The id is then signed into
    /// the collection namespace and the rest delegated to
    /// [`Entity::apply_update`]. Persistence is the store's job.
    pub fn make(
        data: &Value,
        collection: &Collection,
        role_id: Option<RoleId>,
        registry: &dyn SchemaRegistry,
        validate: bool,
    ) -> ModelResult<Self> {
        let candidate = match data.get("id") {
            None | Some(Value::Null) => make_textid(),
            Some(Value::String(s)) if s.is_empty() => make_textid(),
            Some(Value::String(s)) => s.clone(),
            // numeric ids arrive from callers that treat ids as opaque;
            // their decimal form is the id
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(ModelError::InvalidId(other.to_string())),
        };
        if !is_valid_entity_id(&candidate) {
            return Err(ModelError::InvalidId(candidate));
        }
        let now = Utc::now();
        let mut entity = Self {
            id: collection.ns().sign(&candidate),
            schema: String::new(),
            data: BTreeMap::new(),
            role_id,
            collection_id: collection.id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        entity.apply_update(data, collection, registry, validate)?;
        Ok(entity)
    }

    /// Applies a raw payload to this entity.
    ///
    /// The ordered steps: build the schema proxy (unclean input), optionally
    /// run strict validation over the raw payload, re-key the proxy and
    /// re-sign the id into the collection namespace, then merge protected
    /// fields against the previous state before persisting the normalized
    /// properties. Refreshes `updated_at` and clears `deleted_at` — an
    /// update implicitly undeletes.
    pub fn apply_update(
        &mut self,
        data: &Value,
        collection: &Collection,
        registry: &dyn SchemaRegistry,
        validate: bool,
    ) -> ModelResult<()> {
        let mut proxy = registry.get_proxy(data, false)?;
        let schema = registry.resolve(&proxy.schema)?;
        if validate {
            // The proxy already contains only values representable under the
            // schema; this turns anything it dropped into a caller-visible
            // error instead of a silent omission.
            schema.validate(data)?;
        }
        let ns = collection.ns();
        ns.apply(&mut proxy, schema);
        self.id = ns.sign(&self.id);
        self.schema = proxy.schema.clone();

        // Checksum-typed properties are never caller-settable: whatever the
        // payload carried is replaced with the previously persisted value,
        // silently, for every such property the schema declares.
        let previous = self.to_proxy(registry)?;
        for prop in schema.checksum_properties() {
            let prev = previous.get(&prop.name).to_vec();
            proxy.set(&prop.name, prev);
        }

        self.data = std::mem::take(&mut proxy.properties);
        self.touch();
        self.deleted_at = None;
        Ok(())
    }

    /// A proxy of the current column state, flagged as mutable.
    pub fn to_proxy(&self, registry: &dyn SchemaRegistry) -> ModelResult<EntityProxy> {
        let value = json!({
            "id": self.id,
            "schema": self.schema,
            "properties": self.data,
            "created_at": iso_text(Some(self.created_at)),
            "updated_at": iso_text(Some(self.updated_at)),
            "role_id": self.role_id,
            "mutable": true,
        });
        registry.get_proxy(&value, true)
    }

    /// Clears the soft-delete marker without touching `updated_at`.
    pub fn undelete(&mut self) {
        self.mark_active();
    }
}

impl Dated for Entity {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl SoftDelete for Entity {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
        self.deleted_at = at;
    }
}

/// ISO text for an optional timestamp, `None` rendered as JSON null.
fn iso_text(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(|t| t.to_rfc3339())
}
