use chrono::{DateTime, Utc};
use dossier_model::Dated;
use dossier_types::{DocumentId, ReferenceId};
use rusqlite::{Connection, Row};
use tracing::debug;

use crate::entity_store::parse_timestamp;
use crate::error::StoreResult;

/// A weighted association between an entity and a source document.
///
/// Owned by the pair: the store cascades deletion of references when either
/// the entity or the document row is deleted. Unlike entities, references
/// are hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: ReferenceId,
    pub document_id: DocumentId,
    pub entity_id: String,
    pub weight: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dated for Reference {
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

impl Reference {
    fn read(row: &Row<'_>) -> rusqlite::Result<(i64, i64, String, i64, String, String)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn from_raw(raw: (i64, i64, String, i64, String, String)) -> StoreResult<Self> {
        let (id, document_id, entity_id, weight, created_at, updated_at) = raw;
        Ok(Self {
            id: ReferenceId::new(id),
            document_id: DocumentId::new(document_id),
            entity_id,
            weight,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

pub(crate) fn insert(
    conn: &Connection,
    entity_id: &str,
    document_id: DocumentId,
    weight: i64,
) -> StoreResult<Reference> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO reference (document_id, entity_id, weight, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            document_id.as_i64(),
            entity_id,
            weight,
            now.to_rfc3339(),
            now.to_rfc3339(),
        ],
    )?;
    Ok(Reference {
        id: ReferenceId::new(conn.last_insert_rowid()),
        document_id,
        entity_id: entity_id.to_string(),
        weight,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) fn by_document(conn: &Connection, document_id: DocumentId) -> StoreResult<Vec<Reference>> {
    let mut stmt = conn.prepare(
        "SELECT id, document_id, entity_id, weight, created_at, updated_at
         FROM reference WHERE document_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map([document_id.as_i64()], Reference::read)?;
    let mut references = Vec::new();
    for raw in rows {
        references.push(Reference::from_raw(raw?)?);
    }
    Ok(references)
}

/// Deletes all references mentioning a document. Returns the affected count
/// so callers holding reference values know to re-read.
pub(crate) fn delete_by_document(conn: &Connection, document_id: DocumentId) -> StoreResult<usize> {
    let count = conn.execute(
        "DELETE FROM reference WHERE document_id = ?1",
        [document_id.as_i64()],
    )?;
    debug!(document_id = document_id.as_i64(), count, "deleted references");
    Ok(count)
}
