use chrono::{DateTime, Utc};
use dossier_model::{Collection, Entity, SchemaRegistry};
use dossier_types::{CollectionId, DocumentId, RoleId};
use rusqlite::{Connection, Transaction};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::entity_store::{self, EntityIter};
use crate::error::StoreResult;
use crate::reference_store::{self, Reference};

// Idempotent; runs on every open. Cascade on the reference FKs is the
// store-enforced ownership rule: a reference dies with its entity or its
// document.
const MIGRATIONS: &str = "
CREATE TABLE IF NOT EXISTS role (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS collection (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    foreign_id  TEXT NOT NULL UNIQUE,
    label       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS document (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    collection_id INTEGER NOT NULL REFERENCES collection(id),
    created_at    TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS entity (
    id            TEXT PRIMARY KEY,
    schema        TEXT NOT NULL,
    data          TEXT NOT NULL,
    role_id       INTEGER REFERENCES role(id),
    collection_id INTEGER NOT NULL REFERENCES collection(id),
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    deleted_at    TEXT
);
CREATE INDEX IF NOT EXISTS idx_entity_collection ON entity(collection_id);
CREATE INDEX IF NOT EXISTS idx_entity_schema ON entity(schema);
CREATE TABLE IF NOT EXISTS reference (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES document(id) ON DELETE CASCADE,
    entity_id   TEXT NOT NULL REFERENCES entity(id) ON DELETE CASCADE,
    weight      INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reference_document ON reference(document_id);
CREATE INDEX IF NOT EXISTS idx_reference_entity ON reference(entity_id);
";

/// The dossier database: one SQLite connection plus the schema registry the
/// store was constructed with.
///
/// Reads run in autocommit mode; mutations go through a [`Session`]. The
/// connection is the only shared resource and is not internally threaded —
/// callers own concurrency, and every operation may block on the database.
pub struct Database {
    conn: Connection,
    registry: Arc<dyn SchemaRegistry>,
}

impl Database {
    /// Opens (or creates) a database file and runs migrations.
    pub fn open<P: AsRef<Path>>(path: P, registry: Arc<dyn SchemaRegistry>) -> StoreResult<Self> {
        Self::init(Connection::open(path)?, registry)
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory(registry: Arc<dyn SchemaRegistry>) -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, registry)
    }

    fn init(conn: Connection, registry: Arc<dyn SchemaRegistry>) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(MIGRATIONS)?;
        debug!("database opened, migrations applied");
        Ok(Self { conn, registry })
    }

    /// The schema registry this store binds entities against.
    #[must_use]
    pub fn registry(&self) -> &dyn SchemaRegistry {
        self.registry.as_ref()
    }

    /// Begins a unit of work. All mutations issued through the returned
    /// session become visible together at [`Session::commit`]; dropping the
    /// session rolls them back.
    pub fn session(&mut self) -> StoreResult<Session<'_>> {
        let registry = Arc::clone(&self.registry);
        let tx = self.conn.transaction()?;
        Ok(Session { tx, registry })
    }

    /// Looks an entity up by id, optionally restricted to a collection.
    /// Soft-deleted rows are excluded unless `include_deleted` is set.
    pub fn entity_by_id(
        &self,
        entity_id: &str,
        collection: Option<&Collection>,
        include_deleted: bool,
    ) -> StoreResult<Option<Entity>> {
        entity_store::by_id(&self.conn, entity_id, collection, include_deleted)
    }

    /// Lazily scans all non-deleted entities of a collection in bounded
    /// batches. The scan restarts per call and never holds one transaction
    /// across batches.
    #[must_use]
    pub fn entities_by_collection(&self, collection_id: CollectionId) -> EntityIter<'_> {
        EntityIter::new(&self.conn, collection_id)
    }

    /// All references mentioning a document.
    pub fn references_by_document(&self, document_id: DocumentId) -> StoreResult<Vec<Reference>> {
        reference_store::by_document(&self.conn, document_id)
    }
}

/// A unit of work over the dossier database.
///
/// Wraps one transaction; mutations are applied in caller-issued order and
/// committed atomically. There is no optimistic locking: two sessions
/// updating the same entity race, last committer wins.
pub struct Session<'a> {
    tx: Transaction<'a>,
    registry: Arc<dyn SchemaRegistry>,
}

impl Session<'_> {
    /// Creates a new entity from a raw payload and stages its row.
    ///
    /// The candidate id (`data.id` or freshly generated) must pass format
    /// validation; it is then signed into the collection namespace. Not
    /// durable until [`Session::commit`].
    pub fn create_entity(
        &self,
        data: &Value,
        collection: &Collection,
        role_id: Option<RoleId>,
        validate: bool,
    ) -> StoreResult<Entity> {
        let entity = Entity::make(data, collection, role_id, self.registry.as_ref(), validate)?;
        entity_store::save(&self.tx, &entity)?;
        debug!(entity_id = %entity.id, schema = %entity.schema, "created entity");
        Ok(entity)
    }

    /// Applies a raw payload to an existing entity and stages the row.
    /// Refreshes `updated_at` and clears `deleted_at` — updating implicitly
    /// undeletes.
    pub fn update_entity(
        &self,
        entity: &mut Entity,
        data: &Value,
        collection: &Collection,
        validate: bool,
    ) -> StoreResult<()> {
        entity.apply_update(data, collection, self.registry.as_ref(), validate)?;
        entity_store::save(&self.tx, entity)
    }

    /// Clears the soft-delete marker, leaving `updated_at` untouched.
    pub fn undelete_entity(&self, entity: &mut Entity) -> StoreResult<()> {
        entity.undelete();
        entity_store::persist_undelete(&self.tx, &entity.id)
    }

    /// Soft-deletes every active entity of a collection with one set-based
    /// UPDATE. Returns the affected count.
    ///
    /// Contract: `Entity` values loaded before this call are NOT refreshed;
    /// callers must re-read rather than rely on them.
    pub fn delete_entities_by_collection(
        &self,
        collection_id: CollectionId,
        deleted_at: DateTime<Utc>,
    ) -> StoreResult<usize> {
        entity_store::delete_by_collection(&self.tx, collection_id, deleted_at)
    }

    /// Read-your-writes lookup within this unit of work.
    pub fn entity_by_id(
        &self,
        entity_id: &str,
        collection: Option<&Collection>,
        include_deleted: bool,
    ) -> StoreResult<Option<Entity>> {
        entity_store::by_id(&self.tx, entity_id, collection, include_deleted)
    }

    /// Records an entity↔document association (ingestion hook).
    pub fn add_reference(
        &self,
        entity_id: &str,
        document_id: DocumentId,
        weight: i64,
    ) -> StoreResult<Reference> {
        reference_store::insert(&self.tx, entity_id, document_id, weight)
    }

    /// Hard-deletes all references mentioning a document. Returns the
    /// affected count so callers re-read instead of trusting stale values.
    pub fn delete_references_by_document(&self, document_id: DocumentId) -> StoreResult<usize> {
        reference_store::delete_by_document(&self.tx, document_id)
    }

    /// Hard-deletes a document row; the store cascades its references.
    pub fn delete_document(&self, document_id: DocumentId) -> StoreResult<()> {
        self.tx.execute(
            "DELETE FROM document WHERE id = ?1",
            [document_id.as_i64()],
        )?;
        Ok(())
    }

    /// Inserts a collection row and returns it with its namespace intact.
    pub fn create_collection(&self, foreign_id: &str, label: &str) -> StoreResult<Collection> {
        let created_at = Utc::now();
        self.tx.execute(
            "INSERT INTO collection (foreign_id, label, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![foreign_id, label, created_at.to_rfc3339()],
        )?;
        Ok(Collection {
            id: CollectionId::new(self.tx.last_insert_rowid()),
            foreign_id: foreign_id.to_string(),
            label: label.to_string(),
            created_at,
        })
    }

    /// Inserts a document row owned by a collection.
    pub fn create_document(&self, collection_id: CollectionId) -> StoreResult<DocumentId> {
        self.tx.execute(
            "INSERT INTO document (collection_id, created_at) VALUES (?1, ?2)",
            rusqlite::params![collection_id.as_i64(), Utc::now().to_rfc3339()],
        )?;
        Ok(DocumentId::new(self.tx.last_insert_rowid()))
    }

    /// Inserts a role row (an acting principal).
    pub fn create_role(&self, name: &str) -> StoreResult<RoleId> {
        self.tx.execute(
            "INSERT INTO role (name, created_at) VALUES (?1, ?2)",
            rusqlite::params![name, Utc::now().to_rfc3339()],
        )?;
        Ok(RoleId::new(self.tx.last_insert_rowid()))
    }

    /// Commits the unit of work, making all staged mutations durable.
    pub fn commit(self) -> StoreResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}
