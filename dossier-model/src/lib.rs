//! Entity model for the dossier core.
//!
//! Defines the types every other subsystem depends on:
//! - [`Entity`] — the persisted record (id, schema, property map, lifecycle
//!   timestamps) and its pure update logic, including checksum protection
//! - [`EntityProxy`] — a normalized, schema-typed view of an entity's
//!   properties, independent of storage representation
//! - [`Schema`] / [`Property`] / [`PropertyType`] — the pluggable schema
//!   vocabulary, with [`PropertyType::Checksum`] marking properties that are
//!   system-assigned and immutable once set
//! - [`SchemaRegistry`] — the capability trait the store is constructed
//!   with; [`Model`] is the in-memory reference implementation
//! - [`Namespace`] — per-collection signing of entity ids and
//!   cross-referencing values, so identical ids in different collections
//!   never collide
//! - [`SoftDelete`] / [`Dated`] — lifecycle mixins shared by entity-like
//!   records
//!
//! Everything here is store-independent: the update pipeline
//! (build proxy → validate → re-key → merge protected fields) is a sequence
//! of pure steps that `dossier-store` persists afterwards.

mod collection;
mod entity;
mod error;
mod lifecycle;
mod namespace;
mod proxy;
mod registry;
mod schema;

pub use collection::Collection;
pub use entity::Entity;
pub use error::{ModelError, ModelResult};
pub use lifecycle::{Dated, SoftDelete};
pub use namespace::Namespace;
pub use proxy::EntityProxy;
pub use registry::{Model, SchemaRegistry};
pub use schema::{Property, PropertyType, Schema};
