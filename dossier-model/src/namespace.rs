use sha2::{Digest, Sha256};

use crate::proxy::EntityProxy;
use crate::schema::{PropertyType, Schema};

/// Length of the hex signature appended to a signed id.
const SIGNATURE_LEN: usize = 12;

/// Separator between the plain id and its signature.
const SEPARATOR: char = '.';

/// Per-collection transformation of entity identifiers.
///
/// Signing appends a keyed digest of the plain id, so the same caller id
/// lands on different stored ids in different collections. Signing is
/// deterministic and idempotent: an already-signed id is stripped back to
/// its plain form before being re-signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    secret: String,
}

impl Namespace {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Strips a namespace signature, returning the plain id.
    ///
    /// Only the last dot-separated segment is a signature candidate; dots
    /// earlier in the id belong to the id itself.
    #[must_use]
    pub fn strip(id: &str) -> &str {
        match id.rsplit_once(SEPARATOR) {
            Some((plain, _)) => plain,
            None => id,
        }
    }

    /// Signs an entity id into this namespace.
    ///
    /// Empty ids and empty-secret namespaces pass through unchanged.
    #[must_use]
    pub fn sign(&self, id: &str) -> String {
        let plain = Self::strip(id);
        if plain.is_empty() || self.secret.is_empty() {
            return plain.to_string();
        }
        format!("{plain}{SEPARATOR}{}", self.signature(plain))
    }

    fn signature(&self, plain: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update([SEPARATOR as u8]);
        hasher.update(plain.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..SIGNATURE_LEN].to_string()
    }

    /// Re-keys a proxy into this namespace: signs the proxy's own id and
    /// every value of every entity-typed property.
    pub fn apply(&self, proxy: &mut EntityProxy, schema: &Schema) {
        if let Some(id) = proxy.id.take() {
            proxy.id = Some(self.sign(&id));
        }
        for (name, values) in &mut proxy.properties {
            let Some(prop) = schema.property(name) else {
                continue;
            };
            if prop.prop_type == PropertyType::Entity {
                for value in values.iter_mut() {
                    *value = self.sign(value);
                }
            }
        }
    }
}
