//! Controlled vocabularies for enumerated entity fields.
//!
//! Each vocabulary is a closed set of wire values declared exactly once.
//! Setters, field rules, entity descriptors and the `available_*` lookups
//! all read [`Vocabulary::VALUES`]. No other module spells out the literals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::error::ModelError;

/// A closed, named set of permitted string values.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Human-readable vocabulary name used in error messages.
    const NAME: &'static str;
    /// Every permitted wire value, in declaration order.
    const VALUES: &'static [&'static str];

    /// Parse a wire value, returning `None` for non-members.
    fn parse(value: &str) -> Option<Self>;

    /// Wire value for this term.
    fn as_str(self) -> &'static str;
}

/// Parse error for vocabulary terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid {vocabulary}; expected one of: {}", .expected.join(", "))]
pub struct UnknownTerm {
    /// Vocabulary the input was checked against.
    pub vocabulary: &'static str,
    /// Rejected input.
    pub input: String,
    /// Values the vocabulary accepts.
    pub expected: &'static [&'static str],
}

/// Resolve `value` against `V`, mapping failures to an invalid-argument
/// error for `entity.field`.
pub(crate) fn parse_term<V: Vocabulary>(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<V, ModelError> {
    V::parse(value).ok_or_else(|| {
        ModelError::invalid(
            entity,
            field,
            format!("expected one of: {}", V::VALUES.join(", ")),
        )
    })
}

macro_rules! define_vocabulary {
    (
        $(#[$outer:meta])*
        pub enum $name:ident as $label:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every term, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl Vocabulary for $name {
            const NAME: &'static str = $label;
            const VALUES: &'static [&'static str] = &[$($value),+];

            fn parse(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                Vocabulary::as_str(*self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Vocabulary::as_str(*self))
            }
        }

        impl FromStr for $name {
            type Err = UnknownTerm;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                <Self as Vocabulary>::parse(value).ok_or_else(|| UnknownTerm {
                    vocabulary: $label,
                    input: value.to_owned(),
                    expected: <Self as Vocabulary>::VALUES,
                })
            }
        }
    };
}

define_vocabulary! {
    /// Teaching format of a course session.
    pub enum CourseType as "course type" {
        /// Lecture (cours magistral).
        Lecture => "c",
        /// Tutorial (travaux dirigés).
        Tutorial => "td",
        /// Practical lab (travaux pratiques).
        Practical => "tp",
    }
}

define_vocabulary! {
    /// Gender of a user.
    pub enum Gender as "gender" {
        /// Female.
        Female => "female",
        /// Male.
        Male => "male",
        /// Any other gender identity.
        Other => "other",
    }
}

define_vocabulary! {
    /// Current relationship status of a user.
    #[derive(Default)]
    pub enum RelationshipStatus as "relationship status" {
        /// In a relationship.
        Taken => "taken",
        /// It's complicated.
        Complicated => "complicated",
        /// Not in a relationship.
        #[default]
        Single => "single",
    }
}

define_vocabulary! {
    /// Gender a user is searching for.
    #[derive(Default)]
    pub enum SearchingPreference as "searching preference" {
        /// Searching for men.
        Male => "male",
        /// Searching for women.
        Female => "female",
        /// No preference.
        #[default]
        Open => "open",
    }
}

define_vocabulary! {
    /// Kind of relationship a user is searching for.
    #[derive(Default)]
    pub enum SearchingType as "searching type" {
        /// Short-term ("contrat à durée déterminée").
        ShortTerm => "cdd",
        /// Long-term ("contrat à durée indéterminée").
        #[default]
        LongTerm => "cdi",
    }
}

/// Values accepted by `Course.type`.
#[must_use]
pub const fn available_course_types() -> &'static [&'static str] {
    CourseType::VALUES
}

/// Values accepted by `User.gender`.
#[must_use]
pub const fn available_genders() -> &'static [&'static str] {
    Gender::VALUES
}

/// Values accepted by `User.relationshipStatus`.
#[must_use]
pub const fn available_status() -> &'static [&'static str] {
    RelationshipStatus::VALUES
}

/// Values accepted by `User.searchedRelationPreference`.
#[must_use]
pub const fn available_searching_preferences() -> &'static [&'static str] {
    SearchingPreference::VALUES
}

/// Values accepted by `User.searchedRelationType`.
#[must_use]
pub const fn available_searching_types() -> &'static [&'static str] {
    SearchingType::VALUES
}
