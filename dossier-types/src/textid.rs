//! Textual entity identifiers.
//!
//! Entity ids are free-form text: either generated here (32 hex chars) or
//! supplied by the caller and checked against the format below before the
//! owning collection signs them into its namespace.

use uuid::Uuid;

/// Maximum length of an entity identifier, signed or plain.
pub const ENTITY_ID_MAX_LEN: usize = 128;

/// Generates a fresh textual entity id (32 lowercase hex characters).
#[must_use]
pub fn make_textid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Checks whether `id` is acceptable as an entity identifier.
///
/// Accepts ASCII alphanumerics plus `.`, `-` and `_`, up to
/// [`ENTITY_ID_MAX_LEN`] characters. The `.` is significant: namespace
/// signing appends `.<signature>` to the plain id, and signed ids must
/// themselves remain valid.
#[must_use]
pub fn is_valid_entity_id(id: &str) -> bool {
    if id.is_empty() || id.len() > ENTITY_ID_MAX_LEN {
        return false;
    }
    id.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_')
}
