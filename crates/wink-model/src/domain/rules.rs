//! Declarative field rules checked before any mutation.
//!
//! Every assignable field declares one [`Constraint`] in its entity
//! descriptor. The dynamic `assign` path checks candidates against these
//! rules before dispatching to the typed setter. The typed setters share the
//! length and vocabulary helpers below, so both paths enforce the same
//! limits.

use chrono::NaiveDate;
use serde_json::Value;

use super::error::ModelError;

/// Shape constraint for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any string.
    Text,
    /// A string whose character count lies in `min..=max`.
    BoundedText {
        /// Minimum character count.
        min: usize,
        /// Maximum character count.
        max: usize,
    },
    /// A string or `null`.
    OptionalText,
    /// An integer in `min..=max`.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// An integer in `min..=max`, or `null`.
    OptionalInteger {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// One of the listed vocabulary values.
    OneOf(&'static [&'static str]),
    /// An ISO-8601 calendar date (`YYYY-MM-DD`), or `null`.
    OptionalDate,
    /// A UUID string, or `null`.
    OptionalReference,
}

impl Constraint {
    /// Returns `true` when `null` is an accepted value.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(
            self,
            Self::OptionalText
                | Self::OptionalInteger { .. }
                | Self::OptionalDate
                | Self::OptionalReference
        )
    }

    /// Check `value` against this constraint, returning a description of
    /// the violation on failure.
    ///
    /// # Errors
    ///
    /// Returns the reason the value was rejected.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return if self.is_nullable() {
                Ok(())
            } else {
                Err("must not be null".to_owned())
            };
        }

        match *self {
            Self::Text | Self::OptionalText => expect_text(value).map(|_| ()),
            Self::BoundedText { min, max } => {
                let text = expect_text(value)?;
                check_length(text, min, max)
            }
            Self::Integer { min, max } | Self::OptionalInteger { min, max } => {
                expect_integer(value, min, max).map(|_| ())
            }
            Self::OneOf(values) => {
                let text = expect_text(value)?;
                if values.contains(&text) {
                    Ok(())
                } else {
                    Err(format!("expected one of: {}", values.join(", ")))
                }
            }
            Self::OptionalDate => expect_date(value).map(|_| ()),
            Self::OptionalReference => {
                let text = expect_text(value)?;
                uuid::Uuid::parse_str(text)
                    .map(|_| ())
                    .map_err(|_| "must be a UUID".to_owned())
            }
        }
    }
}

/// A field name paired with its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Wire name of the field.
    pub field: &'static str,
    /// Constraint candidates must satisfy.
    pub constraint: Constraint,
}

impl FieldRule {
    /// Check `value`, reporting violations as [`ModelError::InvalidArgument`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] naming `entity` and this
    /// rule's field when the value is rejected.
    pub fn check(&self, entity: &'static str, value: &Value) -> Result<(), ModelError> {
        self.constraint
            .check(value)
            .map_err(|reason| ModelError::invalid(entity, self.field, reason))
    }
}

fn check_length(text: &str, min: usize, max: usize) -> Result<(), String> {
    let length = text.chars().count();
    if length < min {
        return Err(format!("must be at least {min} characters"));
    }
    if length > max {
        return Err(format!("must be at most {max} characters"));
    }
    Ok(())
}

/// Enforce a character-count range on a typed setter argument.
pub(crate) fn ensure_length(
    entity: &'static str,
    field: &'static str,
    text: &str,
    min: usize,
    max: usize,
) -> Result<(), ModelError> {
    check_length(text, min, max).map_err(|reason| ModelError::invalid(entity, field, reason))
}

pub(crate) fn expect_text(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "must be textual".to_owned())
}

pub(crate) fn expect_integer(value: &Value, min: i64, max: i64) -> Result<i64, String> {
    let number = value
        .as_i64()
        .ok_or_else(|| "must be an integer".to_owned())?;
    if !(min..=max).contains(&number) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(number)
}

pub(crate) fn expect_date(value: &Value) -> Result<NaiveDate, String> {
    let text = expect_text(value)?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| "must be a YYYY-MM-DD date".to_owned())
}
