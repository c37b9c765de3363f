//! Integer identifier newtypes for the relational rows around an entity.
//!
//! These mirror the foreign keys of the persisted layout. Keeping them as
//! distinct types means a `DocumentId` can never be passed where a
//! `CollectionId` is expected, even though both are plain integers on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! int_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw integer id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying integer.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

int_id! {
    /// Identifier of the collection (namespace) an entity belongs to.
    CollectionId
}

int_id! {
    /// Identifier of an acting principal (creator/owner of an entity).
    RoleId
}

int_id! {
    /// Identifier of a source document referenced by entities.
    DocumentId
}

int_id! {
    /// Synthetic identifier of an entity↔document reference row.
    ReferenceId
}
