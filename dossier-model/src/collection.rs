use chrono::{DateTime, Utc};
use dossier_types::CollectionId;
use serde::{Deserialize, Serialize};

use crate::namespace::Namespace;

/// The owning collection of a set of entities.
///
/// Collections are managed elsewhere; the model only needs enough of one to
/// namespace entity ids. The `foreign_id` doubles as the namespace secret,
/// so every collection signs ids differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub foreign_id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    /// The namespace this collection signs entity ids into.
    #[must_use]
    pub fn ns(&self) -> Namespace {
        Namespace::new(self.foreign_id.clone())
    }
}
