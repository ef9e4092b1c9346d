//! Domain-level error types.
//!
//! Setters report a single failure kind, [`ModelError::InvalidArgument`].
//! Raising it guarantees the entity is unchanged. Nothing here logs or
//! swallows errors; callers decide what to do with them.

use thiserror::Error;

/// Errors raised when mutating an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A candidate value violated the constraint declared for its field.
    #[error("invalid argument for {entity}.{field}: {reason}")]
    InvalidArgument {
        /// Entity that rejected the value.
        entity: &'static str,
        /// Wire name of the field, such as `firstName`.
        field: String,
        /// Description of the violated constraint.
        reason: String,
    },
    /// The entity already carries a persistence identifier.
    #[error("{entity} already has an identifier")]
    IdAlreadyAssigned {
        /// Entity whose identifier was already set.
        entity: &'static str,
    },
}

impl ModelError {
    pub(crate) fn invalid(
        entity: &'static str,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            entity,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`ModelError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Field named by an [`ModelError::InvalidArgument`], if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { field, .. } => Some(field.as_str()),
            Self::IdAlreadyAssigned { .. } => None,
        }
    }
}

/// Errors returned when parsing an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// The identifier was an empty string.
    #[error("{entity} id must not be empty")]
    EmptyId {
        /// Entity the identifier belongs to.
        entity: &'static str,
    },
    /// The identifier was padded with whitespace or was not a UUID.
    #[error("{entity} id must be a valid UUID")]
    InvalidId {
        /// Entity the identifier belongs to.
        entity: &'static str,
    },
}
