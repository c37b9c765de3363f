//! Identifier types used throughout the dossier core.
//!
//! Entities carry textual ids (generated or caller-supplied, then signed into
//! a collection namespace); the surrounding relational rows — collections,
//! roles, documents, references — use integer ids wrapped in newtypes so
//! they cannot be confused with one another.

mod ids;
mod textid;

pub use ids::{CollectionId, DocumentId, ReferenceId, RoleId};
pub use textid::{is_valid_entity_id, make_textid, ENTITY_ID_MAX_LEN};
