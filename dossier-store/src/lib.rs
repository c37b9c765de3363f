//! SQLite storage layer for dossier.
//!
//! Persists schema-bound entities and the entity↔document reference join
//! table over a single relational database.
//!
//! # Architecture
//!
//! - [`Database`] owns the connection, runs idempotent migrations on open
//!   and hands out unit-of-work [`Session`]s (one transaction each; commit
//!   is the caller's decision, dropping a session rolls back)
//! - Entity rows carry their schema name and a JSON property map; all
//!   schema binding happens in `dossier-model` before a row is written
//! - Reference rows are hard-deleted, either in bulk by document or via the
//!   store-enforced cascade when their entity or document row goes away
//! - Collection scans fetch in bounded batches and never pin a transaction
//!   across batches

mod db;
mod entity_store;
mod error;
mod reference_store;

pub use db::{Database, Session};
pub use entity_store::{EntityIter, ENTITY_BATCH_SIZE};
pub use error::{StoreError, StoreResult};
pub use reference_store::Reference;
