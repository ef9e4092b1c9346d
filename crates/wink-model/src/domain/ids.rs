//! Entity identifiers.
//!
//! Identifiers are opaque UUIDs assigned by the persistence layer on first
//! save. They serialise as hyphenated strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::IdValidationError;

macro_rules! define_entity_id {
    ($(#[$outer:meta])* $name:ident => $entity:literal) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            ///
            /// # Errors
            ///
            /// Returns [`IdValidationError`] when the input is empty, padded
            /// with whitespace, or not a UUID.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::EmptyId { entity: $entity });
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::InvalidId { entity: $entity });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::InvalidId { entity: $entity })
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_entity_id! {
    /// Stable course identifier.
    CourseId => "course"
}

define_entity_id! {
    /// Stable user identifier.
    UserId => "user"
}

define_entity_id! {
    /// Identifier of a branch (field of study) a user belongs to.
    ///
    /// Branches are referenced, never owned, by this model.
    BranchId => "branch"
}
