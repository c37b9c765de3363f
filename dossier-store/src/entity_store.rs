use chrono::{DateTime, Utc};
use dossier_model::{Collection, Entity};
use dossier_types::{CollectionId, RoleId};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use std::collections::VecDeque;
use tracing::debug;

use crate::error::StoreResult;

/// Rows fetched per batch when scanning a collection.
///
/// Bounds memory and lock duration for large collections; each batch runs in
/// its own read, so a scan never pins one transaction open.
pub const ENTITY_BATCH_SIZE: usize = 5000;

const ENTITY_COLUMNS: &str =
    "id, schema, data, role_id, collection_id, created_at, updated_at, deleted_at";

pub(crate) fn save(conn: &Connection, entity: &Entity) -> StoreResult<()> {
    let data = serde_json::to_string(&entity.data)?;
    conn.execute(
        "INSERT INTO entity (id, schema, data, role_id, collection_id, created_at, updated_at, deleted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
             schema = excluded.schema,
             data = excluded.data,
             role_id = excluded.role_id,
             collection_id = excluded.collection_id,
             updated_at = excluded.updated_at,
             deleted_at = excluded.deleted_at",
        rusqlite::params![
            entity.id,
            entity.schema,
            data,
            entity.role_id.map(|r| r.as_i64()),
            entity.collection_id.as_i64(),
            entity.created_at.to_rfc3339(),
            entity.updated_at.to_rfc3339(),
            entity.deleted_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

pub(crate) fn by_id(
    conn: &Connection,
    entity_id: &str,
    collection: Option<&Collection>,
    include_deleted: bool,
) -> StoreResult<Option<Entity>> {
    let mut sql = format!("SELECT {ENTITY_COLUMNS} FROM entity WHERE id = ?1");
    let mut params: Vec<&dyn ToSql> = vec![&entity_id];
    let collection_id;
    if let Some(collection) = collection {
        collection_id = collection.id.as_i64();
        sql.push_str(" AND collection_id = ?2");
        params.push(&collection_id);
    }
    if !include_deleted {
        sql.push_str(" AND deleted_at IS NULL");
    }
    sql.push_str(" LIMIT 1");

    let raw = conn
        .prepare(&sql)?
        .query_row(params.as_slice(), RawEntityRow::read)
        .optional()?;
    raw.map(RawEntityRow::into_entity).transpose()
}

/// Marks every currently-active entity of a collection deleted in a single
/// set-based UPDATE, bypassing per-row loading. Returns the affected count.
pub(crate) fn delete_by_collection(
    conn: &Connection,
    collection_id: CollectionId,
    deleted_at: DateTime<Utc>,
) -> StoreResult<usize> {
    let count = conn.execute(
        "UPDATE entity SET deleted_at = ?2 WHERE collection_id = ?1 AND deleted_at IS NULL",
        rusqlite::params![collection_id.as_i64(), deleted_at.to_rfc3339()],
    )?;
    debug!(collection_id = collection_id.as_i64(), count, "bulk soft-deleted entities");
    Ok(count)
}

/// Persists an undelete: clears `deleted_at` and nothing else.
pub(crate) fn persist_undelete(conn: &Connection, entity_id: &str) -> StoreResult<()> {
    conn.execute(
        "UPDATE entity SET deleted_at = NULL WHERE id = ?1",
        rusqlite::params![entity_id],
    )?;
    Ok(())
}

fn fetch_batch(
    conn: &Connection,
    collection_id: CollectionId,
    after: Option<&str>,
    limit: usize,
) -> StoreResult<Vec<Entity>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTITY_COLUMNS} FROM entity
         WHERE collection_id = ?1 AND deleted_at IS NULL AND (?2 IS NULL OR id > ?2)
         ORDER BY id LIMIT ?3"
    ))?;
    let rows = stmt.query_map(
        rusqlite::params![collection_id.as_i64(), after, limit as i64],
        RawEntityRow::read,
    )?;
    let mut batch = Vec::new();
    for raw in rows {
        batch.push(raw?.into_entity()?);
    }
    Ok(batch)
}

/// Lazy scan over the non-deleted entities of a collection.
///
/// Fetches [`ENTITY_BATCH_SIZE`] rows at a time (tunable via
/// [`EntityIter::with_batch_size`]), ordered by id. Each call to the scan
/// starts over from the beginning of the collection.
pub struct EntityIter<'a> {
    conn: &'a Connection,
    collection_id: CollectionId,
    batch_size: usize,
    last_id: Option<String>,
    buf: VecDeque<Entity>,
    done: bool,
}

impl<'a> EntityIter<'a> {
    pub(crate) fn new(conn: &'a Connection, collection_id: CollectionId) -> Self {
        Self {
            conn,
            collection_id,
            batch_size: ENTITY_BATCH_SIZE,
            last_id: None,
            buf: VecDeque::new(),
            done: false,
        }
    }

    /// Overrides the batch size for this scan.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Iterator for EntityIter<'_> {
    type Item = StoreResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() && !self.done {
            match fetch_batch(
                self.conn,
                self.collection_id,
                self.last_id.as_deref(),
                self.batch_size,
            ) {
                Ok(batch) => {
                    if batch.len() < self.batch_size {
                        self.done = true;
                    }
                    if let Some(last) = batch.last() {
                        self.last_id = Some(last.id.clone());
                    }
                    self.buf.extend(batch);
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.buf.pop_front().map(Ok)
    }
}

struct RawEntityRow {
    id: String,
    schema: String,
    data: String,
    role_id: Option<i64>,
    collection_id: i64,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl RawEntityRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            schema: row.get(1)?,
            data: row.get(2)?,
            role_id: row.get(3)?,
            collection_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            deleted_at: row.get(7)?,
        })
    }

    fn into_entity(self) -> StoreResult<Entity> {
        Ok(Entity {
            id: self.id,
            schema: self.schema,
            data: serde_json::from_str(&self.data)?,
            role_id: self.role_id.map(RoleId::new),
            collection_id: CollectionId::new(self.collection_id),
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at: self.deleted_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}
