//! Course entity with a derived composite key.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use super::constraints::{ConstraintViolations, Violations};
use super::descriptor::{
    AssociationDescriptor, AssociationKind, Describe, EntityDescriptor, FieldDescriptor,
    PersistedType, SemanticType,
};
use super::error::ModelError;
use super::ids::{CourseId, UserId};
use super::rules::{Constraint, expect_integer, expect_text};
use super::vocabulary::{CourseType, Vocabulary, parse_term};

const ENTITY: &str = "Course";

/// Separator placed between the parts of a derived course key.
pub const KEY_SEPARATOR: &str = "-";
/// Maximum stored length of a course name.
pub const NAME_MAX_LENGTH: usize = 100;
/// Maximum stored length of a course-unit code.
pub const UV_MAX_LENGTH: usize = 20;
/// Maximum stored length of a course key.
pub const KEY_MAX_LENGTH: usize = 20;

const NUMBER_MIN: i64 = 0;
const NUMBER_MAX: i64 = u16::MAX as i64;

/// Persistence and transport description of [`Course`].
pub static COURSE_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: ENTITY,
    iri: "http://schema.org/Organization",
    table: "wink_courses",
    identity: "id",
    fields: &[
        FieldDescriptor {
            name: "id",
            column: "id",
            semantic: Some(SemanticType::Identifier),
            persisted: PersistedType::Uuid,
            nullable: false,
            constraint: None,
        },
        FieldDescriptor {
            name: "name",
            column: "name",
            semantic: Some(SemanticType::Name),
            persisted: PersistedType::String {
                length: NAME_MAX_LENGTH,
            },
            nullable: true,
            constraint: Some(Constraint::OptionalText),
        },
        FieldDescriptor {
            name: "uv",
            column: "uv",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::String {
                length: UV_MAX_LENGTH,
            },
            nullable: false,
            constraint: Some(Constraint::Text),
        },
        FieldDescriptor {
            name: "type",
            column: "type",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::Enumerated {
                length: 20,
                values: CourseType::VALUES,
            },
            nullable: false,
            constraint: Some(Constraint::OneOf(CourseType::VALUES)),
        },
        FieldDescriptor {
            name: "number",
            column: "number",
            semantic: Some(SemanticType::Integer),
            persisted: PersistedType::SmallInt,
            nullable: false,
            constraint: Some(Constraint::Integer {
                min: NUMBER_MIN,
                max: NUMBER_MAX,
            }),
        },
        FieldDescriptor {
            name: "key",
            column: "key",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::String {
                length: KEY_MAX_LENGTH,
            },
            nullable: false,
            constraint: None,
        },
    ],
    associations: &[AssociationDescriptor {
        name: "users",
        target: "User",
        kind: AssociationKind::ManyToMany {
            join_table: "wink_users_courses",
            inverse: "courses",
        },
    }],
};

/// Whether a course key still mirrors its source fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// `key == uv-type-number`.
    #[default]
    Consistent,
    /// The key was imposed through [`Course::set_key`] and may differ from
    /// its source fields until the next key-field mutation.
    Overridden,
}

/// A course unit session (lecture, tutorial or lab) users enrol in.
///
/// ## Invariants
/// - `type` is always a member of [`CourseType`].
/// - After construction and after every successful call to
///   [`Course::set_uv`], [`Course::set_type`] or [`Course::set_number`],
///   `key == uv + "-" + type + "-" + number`.
/// - [`Course::set_key`] deliberately breaks the previous invariant; the key
///   may be desynchronized if set directly. [`Course::key_state`] reports
///   which state applies.
///
/// Adding a user here does not add the course to that user. Use
/// [`crate::domain::enrolment`] to update both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CourseDto", into = "CourseDto")]
pub struct Course {
    id: Option<CourseId>,
    name: Option<String>,
    uv: String,
    course_type: CourseType,
    number: u16,
    key: String,
    key_state: KeyState,
    users: BTreeSet<UserId>,
}

impl Course {
    /// Create a course and compute its key.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when `course_type` is not
    /// one of `c`, `td` or `tp`.
    ///
    /// # Examples
    /// ```
    /// use wink_model::domain::Course;
    ///
    /// let course = Course::new("MATH101", "td", 2).expect("valid course");
    /// assert_eq!(course.key(), "MATH101-td-2");
    /// assert!(Course::new("MATH101", "lab", 2).is_err());
    /// ```
    pub fn new(
        uv: impl Into<String>,
        course_type: impl AsRef<str>,
        number: u16,
    ) -> Result<Self, ModelError> {
        let parsed_type = parse_term::<CourseType>(ENTITY, "type", course_type.as_ref())?;
        let mut course = Self {
            id: None,
            name: None,
            uv: uv.into(),
            course_type: parsed_type,
            number,
            key: String::new(),
            key_state: KeyState::Consistent,
            users: BTreeSet::new(),
        };
        course.refresh_key();
        Ok(course)
    }

    /// Persistence identifier, once assigned.
    #[must_use]
    pub const fn id(&self) -> Option<&CourseId> {
        self.id.as_ref()
    }

    /// Record the identifier assigned by the persistence layer.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IdAlreadyAssigned`] when the course already has
    /// an identifier.
    pub fn assign_id(&mut self, id: CourseId) -> Result<&mut Self, ModelError> {
        if self.id.is_some() {
            return Err(ModelError::IdAlreadyAssigned { entity: ENTITY });
        }
        self.id = Some(id);
        Ok(self)
    }

    /// Free-text course name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the course name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Remove the course name.
    pub fn clear_name(&mut self) -> &mut Self {
        self.name = None;
        self
    }

    /// Course-unit code, such as `MATH101`.
    #[must_use]
    pub fn uv(&self) -> &str {
        self.uv.as_str()
    }

    /// Set the course-unit code and recompute the key.
    pub fn set_uv(&mut self, uv: impl Into<String>) -> &mut Self {
        self.uv = uv.into();
        self.refresh_key();
        self
    }

    /// Teaching format.
    #[must_use]
    pub const fn course_type(&self) -> CourseType {
        self.course_type
    }

    /// Set the teaching format and recompute the key.
    ///
    /// Accepts a [`CourseType`] or its wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for values outside
    /// `c`, `td`, `tp`. The type and key are left unchanged.
    pub fn set_type(&mut self, course_type: impl AsRef<str>) -> Result<&mut Self, ModelError> {
        self.course_type = parse_term::<CourseType>(ENTITY, "type", course_type.as_ref())?;
        self.refresh_key();
        Ok(self)
    }

    /// Session number within the course unit.
    #[must_use]
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// Set the session number and recompute the key.
    pub fn set_number(&mut self, number: u16) -> &mut Self {
        self.number = number;
        self.refresh_key();
        self
    }

    /// Current key. See [`Course::key_state`] for whether it is derived.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Whether the key mirrors `uv-type-number` or was overridden.
    #[must_use]
    pub const fn key_state(&self) -> KeyState {
        self.key_state
    }

    /// Key computed from the current `uv`, `type` and `number`, regardless
    /// of any override.
    #[must_use]
    pub fn derived_key(&self) -> String {
        format!(
            "{uv}{KEY_SEPARATOR}{course_type}{KEY_SEPARATOR}{number}",
            uv = self.uv,
            course_type = self.course_type,
            number = self.number,
        )
    }

    /// Impose an arbitrary key, bypassing derivation.
    ///
    /// Intended for bulk loads of precomputed keys. The key may be
    /// desynchronized if set directly. The next call to
    /// [`Course::set_uv`], [`Course::set_type`] or [`Course::set_number`]
    /// recomputes it.
    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        let previous = std::mem::replace(&mut self.key, key.into());
        debug!(
            previous_key = %previous,
            course_key = %self.key,
            derived_key = %self.derived_key(),
            "course key overridden"
        );
        self.key_state = KeyState::Overridden;
        self
    }

    /// Users enrolled in this course, as seen from this side.
    #[must_use]
    pub const fn users(&self) -> &BTreeSet<UserId> {
        &self.users
    }

    /// Add a user to this side of the association only.
    pub fn add_user(&mut self, user: UserId) -> &mut Self {
        self.users.insert(user);
        self
    }

    /// Remove a user from this side of the association only. Returns
    /// `true` if the user was present.
    pub fn remove_user(&mut self, user: &UserId) -> bool {
        self.users.remove(user)
    }

    /// Assign a field from an untyped transport value.
    ///
    /// The value is checked against the field's declared rule before the
    /// typed setter runs, so a rejected value leaves the course untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for unknown or read-only
    /// fields and for values that break the field's rule.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wink_model::domain::Course;
    ///
    /// let mut course = Course::new("MATH101", "td", 2).expect("valid course");
    /// course.assign("number", &json!(4)).expect("integer accepted");
    /// assert_eq!(course.key(), "MATH101-td-4");
    /// assert!(course.assign("number", &json!("four")).is_err());
    /// ```
    pub fn assign(&mut self, field: &str, value: &Value) -> Result<&mut Self, ModelError> {
        let rule = COURSE_DESCRIPTOR
            .rule(field)
            .ok_or_else(|| ModelError::invalid(ENTITY, field, "not an assignable field"))?;
        rule.check(ENTITY, value)?;
        let invalid = |reason: String| ModelError::invalid(ENTITY, rule.field, reason);

        match rule.field {
            "name" => match value.as_str() {
                Some(name) => {
                    self.set_name(name);
                }
                None => {
                    self.clear_name();
                }
            },
            "uv" => {
                self.set_uv(expect_text(value).map_err(invalid)?);
            }
            "type" => {
                self.set_type(expect_text(value).map_err(invalid)?)?;
            }
            "number" => {
                let raw = expect_integer(value, NUMBER_MIN, NUMBER_MAX).map_err(invalid)?;
                let number = u16::try_from(raw).map_err(|_| invalid("out of range".to_owned()))?;
                self.set_number(number);
            }
            _ => return Err(ModelError::invalid(ENTITY, field, "not an assignable field")),
        }
        Ok(self)
    }

    /// Check stored lengths and required values before persistence.
    ///
    /// # Errors
    ///
    /// Returns every [`ConstraintViolations`] entry found, such as
    /// `course.key.tooLong`.
    pub fn validate(&self) -> Result<(), ConstraintViolations> {
        let mut violations = Violations::new("course");
        violations.max_length("name", self.name(), NAME_MAX_LENGTH);
        violations.required_text("uv", Some(self.uv()), 1, UV_MAX_LENGTH);
        violations.max_length("key", Some(self.key()), KEY_MAX_LENGTH);
        violations.finish()
    }

    fn refresh_key(&mut self) {
        let derived = self.derived_key();
        let previous = std::mem::replace(&mut self.key, derived);
        self.key_state = KeyState::Consistent;
        debug!(previous_key = %previous, course_key = %self.key, "course key refreshed");
    }
}

impl Describe for Course {
    fn descriptor() -> &'static EntityDescriptor {
        &COURSE_DESCRIPTOR
    }
}

/// Wire representation of a [`Course`].
///
/// Deserialising replays the constructor and setters, so every field rule
/// applies. A `key` that differs from the derived key is applied as an
/// override.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[schema(as = Course)]
pub struct CourseDto {
    /// Persistence identifier, absent until first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: Option<CourseId>,
    /// Free-text course name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Linear algebra")]
    name: Option<String>,
    /// Course-unit code.
    #[schema(example = "MATH101")]
    uv: String,
    /// Teaching format.
    #[serde(rename = "type")]
    course_type: CourseType,
    /// Session number within the course unit.
    #[schema(example = 2)]
    number: u16,
    /// Course key; derived from `uv`, `type` and `number` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "MATH101-td-2")]
    key: Option<String>,
    /// Identifiers of enrolled users.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    users: Vec<UserId>,
}

impl From<Course> for CourseDto {
    fn from(value: Course) -> Self {
        let Course {
            id,
            name,
            uv,
            course_type,
            number,
            key,
            users,
            ..
        } = value;
        Self {
            id,
            name,
            uv,
            course_type,
            number,
            key: Some(key),
            users: users.into_iter().collect(),
        }
    }
}

impl TryFrom<CourseDto> for Course {
    type Error = ModelError;

    fn try_from(value: CourseDto) -> Result<Self, Self::Error> {
        let CourseDto {
            id,
            name,
            uv,
            course_type,
            number,
            key,
            users,
        } = value;

        let mut course = Self::new(uv, course_type, number)?;
        if let Some(stored_id) = id {
            course.assign_id(stored_id)?;
        }
        if let Some(text) = name {
            course.set_name(text);
        }
        for user in users {
            course.add_user(user);
        }
        if let Some(imposed) = key.filter(|candidate| *candidate != course.key) {
            course.set_key(imposed);
        }
        Ok(course)
    }
}

#[cfg(test)]
#[path = "course_tests.rs"]
mod tests;
