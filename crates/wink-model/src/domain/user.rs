//! User data model.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::constraints::{ConstraintViolations, ViolationKind, Violations, looks_like_email};
use super::descriptor::{
    AssociationDescriptor, AssociationKind, Describe, EntityDescriptor, FieldDescriptor,
    PersistedType, SemanticType,
};
use super::error::ModelError;
use super::ids::{BranchId, CourseId, UserId};
use super::rules::{Constraint, ensure_length, expect_date, expect_integer, expect_text};
use super::vocabulary::{
    Gender, RelationshipStatus, SearchingPreference, SearchingType, Vocabulary, parse_term,
};
use crate::config::ValidationSettings;

const ENTITY: &str = "User";

/// Minimum allowed length for a first or last name.
pub const NAME_MIN_LENGTH: usize = 2;
/// Maximum allowed length for a first or last name.
pub const NAME_MAX_LENGTH: usize = 30;
/// Maximum stored length of an email address.
pub const EMAIL_MAX_LENGTH: usize = 200;
/// Maximum stored length of an image reference.
pub const IMAGE_MAX_LENGTH: usize = 255;

const NAME_CONSTRAINT: Constraint = Constraint::BoundedText {
    min: NAME_MIN_LENGTH,
    max: NAME_MAX_LENGTH,
};
const SEMESTER_MIN: i64 = i32::MIN as i64;
const SEMESTER_MAX: i64 = i32::MAX as i64;

/// Persistence and transport description of [`User`].
pub static USER_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: ENTITY,
    iri: "http://schema.org/Person",
    table: "wink_users",
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
            name: "email",
            column: "email",
            semantic: Some(SemanticType::Email),
            persisted: PersistedType::String {
                length: EMAIL_MAX_LENGTH,
            },
            nullable: false,
            constraint: Some(Constraint::Text),
        },
        FieldDescriptor {
            name: "firstName",
            column: "first_name",
            semantic: Some(SemanticType::GivenName),
            persisted: PersistedType::String {
                length: NAME_MAX_LENGTH,
            },
            nullable: false,
            constraint: Some(NAME_CONSTRAINT),
        },
        FieldDescriptor {
            name: "lastName",
            column: "last_name",
            semantic: Some(SemanticType::FamilyName),
            persisted: PersistedType::String {
                length: NAME_MAX_LENGTH,
            },
            nullable: false,
            constraint: Some(NAME_CONSTRAINT),
        },
        FieldDescriptor {
            name: "birthDate",
            column: "birth_date",
            semantic: Some(SemanticType::BirthDate),
            persisted: PersistedType::Date,
            nullable: true,
            constraint: Some(Constraint::OptionalDate),
        },
        FieldDescriptor {
            name: "gender",
            column: "gender",
            semantic: Some(SemanticType::Gender),
            persisted: PersistedType::Enumerated {
                length: 20,
                values: Gender::VALUES,
            },
            nullable: false,
            constraint: Some(Constraint::OneOf(Gender::VALUES)),
        },
        FieldDescriptor {
            name: "image",
            column: "image",
            semantic: Some(SemanticType::Image),
            persisted: PersistedType::String {
                length: IMAGE_MAX_LENGTH,
            },
            nullable: true,
            constraint: Some(Constraint::OptionalText),
        },
        FieldDescriptor {
            name: "branch",
            column: "branch_id",
            semantic: None,
            persisted: PersistedType::Reference { target: "Branch" },
            nullable: true,
            constraint: Some(Constraint::OptionalReference),
        },
        FieldDescriptor {
            name: "semester",
            column: "semester",
            semantic: Some(SemanticType::Integer),
            persisted: PersistedType::Integer,
            nullable: true,
            constraint: Some(Constraint::OptionalInteger {
                min: SEMESTER_MIN,
                max: SEMESTER_MAX,
            }),
        },
        FieldDescriptor {
            name: "relationshipStatus",
            column: "relationship_status",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::Enumerated {
                length: 20,
                values: RelationshipStatus::VALUES,
            },
            nullable: false,
            constraint: Some(Constraint::OneOf(RelationshipStatus::VALUES)),
        },
        FieldDescriptor {
            name: "searchedRelationPreference",
            column: "searched_relation_preference",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::Enumerated {
                length: 20,
                values: SearchingPreference::VALUES,
            },
            nullable: false,
            constraint: Some(Constraint::OneOf(SearchingPreference::VALUES)),
        },
        FieldDescriptor {
            name: "searchedRelationType",
            column: "searched_relation_type",
            semantic: Some(SemanticType::Text),
            persisted: PersistedType::Enumerated {
                length: 10,
                values: SearchingType::VALUES,
            },
            nullable: false,
            constraint: Some(Constraint::OneOf(SearchingType::VALUES)),
        },
    ],
    associations: &[
        AssociationDescriptor {
            name: "courses",
            target: "Course",
            kind: AssociationKind::ManyToMany {
                join_table: "wink_users_courses",
                inverse: "users",
            },
        },
        AssociationDescriptor {
            name: "branch",
            target: "Branch",
            kind: AssociationKind::ManyToOne,
        },
    ],
};

/// A student profile.
///
/// ## Invariants
/// - Enumerated fields always hold a member of their vocabulary.
/// - `first_name` and `last_name`, once set, are 2 to 30 characters long.
///
/// A new user has no names, email or gender yet. [`User::validate`] reports
/// the missing ones before the user is persisted.
///
/// Adding a course here does not add the user to that course. Use
/// [`crate::domain::enrolment`] to update both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: Option<UserId>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    birth_date: Option<NaiveDate>,
    gender: Option<Gender>,
    image: Option<String>,
    branch: Option<BranchId>,
    semester: Option<i32>,
    relationship_status: RelationshipStatus,
    searched_relation_preference: SearchingPreference,
    searched_relation_type: SearchingType,
    courses: BTreeSet<CourseId>,
}

impl User {
    /// Create an empty user with default relationship settings.
    ///
    /// # Examples
    /// ```
    /// use wink_model::domain::{RelationshipStatus, SearchingPreference, SearchingType, User};
    ///
    /// let user = User::new();
    /// assert_eq!(user.relationship_status(), RelationshipStatus::Single);
    /// assert_eq!(user.searched_relation_preference(), SearchingPreference::Open);
    /// assert_eq!(user.searched_relation_type(), SearchingType::LongTerm);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persistence identifier, once assigned.
    #[must_use]
    pub const fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// Record the identifier assigned by the persistence layer.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IdAlreadyAssigned`] when the user already has
    /// an identifier.
    pub fn assign_id(&mut self, id: UserId) -> Result<&mut Self, ModelError> {
        if self.id.is_some() {
            return Err(ModelError::IdAlreadyAssigned { entity: ENTITY });
        }
        self.id = Some(id);
        Ok(self)
    }

    /// Email address, as entered.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Set the email address. Format is checked by [`User::validate`].
    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = Some(email.into());
        self
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Set the given name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] unless the name is 2 to 30
    /// characters long.
    pub fn set_first_name(
        &mut self,
        first_name: impl Into<String>,
    ) -> Result<&mut Self, ModelError> {
        let name = first_name.into();
        ensure_length(ENTITY, "firstName", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?;
        self.first_name = Some(name);
        Ok(self)
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Set the family name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] unless the name is 2 to 30
    /// characters long.
    pub fn set_last_name(
        &mut self,
        last_name: impl Into<String>,
    ) -> Result<&mut Self, ModelError> {
        let name = last_name.into();
        ensure_length(ENTITY, "lastName", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?;
        self.last_name = Some(name);
        Ok(self)
    }

    /// Date of birth.
    #[must_use]
    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Set or clear the date of birth.
    pub fn set_birth_date(&mut self, birth_date: Option<NaiveDate>) -> &mut Self {
        self.birth_date = birth_date;
        self
    }

    /// Gender, once chosen.
    #[must_use]
    pub const fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Set the gender from a [`Gender`] or its wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for values outside
    /// `female`, `male`, `other`. The gender is left unchanged.
    pub fn set_gender(&mut self, gender: impl AsRef<str>) -> Result<&mut Self, ModelError> {
        self.gender = Some(parse_term::<Gender>(ENTITY, "gender", gender.as_ref())?);
        Ok(self)
    }

    /// Picture reference, typically a URL.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Set the picture reference.
    pub fn set_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.image = Some(image.into());
        self
    }

    /// Remove the picture reference.
    pub fn clear_image(&mut self) -> &mut Self {
        self.image = None;
        self
    }

    /// Branch (field of study) the user belongs to.
    #[must_use]
    pub const fn branch(&self) -> Option<&BranchId> {
        self.branch.as_ref()
    }

    /// Set or clear the branch reference.
    pub fn set_branch(&mut self, branch: Option<BranchId>) -> &mut Self {
        self.branch = branch;
        self
    }

    /// Current semester of study.
    #[must_use]
    pub const fn semester(&self) -> Option<i32> {
        self.semester
    }

    /// Set or clear the semester.
    pub fn set_semester(&mut self, semester: Option<i32>) -> &mut Self {
        self.semester = semester;
        self
    }

    /// Relationship status.
    #[must_use]
    pub const fn relationship_status(&self) -> RelationshipStatus {
        self.relationship_status
    }

    /// Set the relationship status from a [`RelationshipStatus`] or its
    /// wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for values outside
    /// `single`, `taken`, `complicated`.
    pub fn set_relationship_status(
        &mut self,
        status: impl AsRef<str>,
    ) -> Result<&mut Self, ModelError> {
        self.relationship_status =
            parse_term::<RelationshipStatus>(ENTITY, "relationshipStatus", status.as_ref())?;
        Ok(self)
    }

    /// Gender the user is searching for.
    #[must_use]
    pub const fn searched_relation_preference(&self) -> SearchingPreference {
        self.searched_relation_preference
    }

    /// Set the searched gender from a [`SearchingPreference`] or its wire
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for values outside
    /// `male`, `female`, `open`.
    pub fn set_searched_relation_preference(
        &mut self,
        preference: impl AsRef<str>,
    ) -> Result<&mut Self, ModelError> {
        self.searched_relation_preference = parse_term::<SearchingPreference>(
            ENTITY,
            "searchedRelationPreference",
            preference.as_ref(),
        )?;
        Ok(self)
    }

    /// Kind of relationship the user is searching for.
    #[must_use]
    pub const fn searched_relation_type(&self) -> SearchingType {
        self.searched_relation_type
    }

    /// Set the searched relationship kind from a [`SearchingType`] or its
    /// wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for values outside
    /// `cdi`, `cdd`.
    pub fn set_searched_relation_type(
        &mut self,
        kind: impl AsRef<str>,
    ) -> Result<&mut Self, ModelError> {
        self.searched_relation_type =
            parse_term::<SearchingType>(ENTITY, "searchedRelationType", kind.as_ref())?;
        Ok(self)
    }

    /// Courses the user is enrolled in, as seen from this side.
    #[must_use]
    pub const fn courses(&self) -> &BTreeSet<CourseId> {
        &self.courses
    }

    /// Add a course to this side of the association only.
    pub fn add_course(&mut self, course: CourseId) -> &mut Self {
        self.courses.insert(course);
        self
    }

    /// Remove a course from this side of the association only. Returns
    /// `true` if the course was present.
    pub fn remove_course(&mut self, course: &CourseId) -> bool {
        self.courses.remove(course)
    }

    /// Assign a field from an untyped transport value.
    ///
    /// The value is checked against the field's declared rule before the
    /// typed setter runs, so a rejected value leaves the user untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for unknown or read-only
    /// fields and for values that break the field's rule.
    pub fn assign(&mut self, field: &str, value: &Value) -> Result<&mut Self, ModelError> {
        let rule = USER_DESCRIPTOR
            .rule(field)
            .ok_or_else(|| ModelError::invalid(ENTITY, field, "not an assignable field"))?;
        rule.check(ENTITY, value)?;
        let invalid = |reason: String| ModelError::invalid(ENTITY, rule.field, reason);

        match rule.field {
            "email" => {
                self.set_email(expect_text(value).map_err(invalid)?);
            }
            "firstName" => {
                self.set_first_name(expect_text(value).map_err(invalid)?)?;
            }
            "lastName" => {
                self.set_last_name(expect_text(value).map_err(invalid)?)?;
            }
            "birthDate" => {
                let birth_date = if value.is_null() {
                    None
                } else {
                    Some(expect_date(value).map_err(invalid)?)
                };
                self.set_birth_date(birth_date);
            }
            "gender" => {
                self.set_gender(expect_text(value).map_err(invalid)?)?;
            }
            "image" => match value.as_str() {
                Some(image) => {
                    self.set_image(image);
                }
                None => {
                    self.clear_image();
                }
            },
            "branch" => {
                let branch = match value.as_str() {
                    Some(raw) => Some(
                        BranchId::new(raw).map_err(|error| invalid(error.to_string()))?,
                    ),
                    None => None,
                };
                self.set_branch(branch);
            }
            "semester" => {
                let semester = if value.is_null() {
                    None
                } else {
                    let raw = expect_integer(value, SEMESTER_MIN, SEMESTER_MAX).map_err(invalid)?;
                    Some(i32::try_from(raw).map_err(|_| invalid("out of range".to_owned()))?)
                };
                self.set_semester(semester);
            }
            "relationshipStatus" => {
                self.set_relationship_status(expect_text(value).map_err(invalid)?)?;
            }
            "searchedRelationPreference" => {
                self.set_searched_relation_preference(expect_text(value).map_err(invalid)?)?;
            }
            "searchedRelationType" => {
                self.set_searched_relation_type(expect_text(value).map_err(invalid)?)?;
            }
            _ => return Err(ModelError::invalid(ENTITY, field, "not an assignable field")),
        }
        Ok(self)
    }

    /// Check the whole profile before persistence.
    ///
    /// Reports missing required fields, column overflows and, when
    /// `settings.check_email_format()` holds, malformed email addresses.
    ///
    /// # Errors
    ///
    /// Returns every [`ConstraintViolations`] entry found, such as
    /// `user.email.invalid` or `user.gender.invalid`.
    pub fn validate(&self, settings: &ValidationSettings) -> Result<(), ConstraintViolations> {
        let mut violations = Violations::new("user");

        violations.required_text("email", self.email(), 1, EMAIL_MAX_LENGTH);
        if let Some(email) = self.email()
            && settings.check_email_format()
            && !email.trim().is_empty()
            && !looks_like_email(email)
        {
            violations.push("email", ViolationKind::Invalid);
        }
        violations.required_text("firstName", self.first_name(), NAME_MIN_LENGTH, NAME_MAX_LENGTH);
        violations.required_text("lastName", self.last_name(), NAME_MIN_LENGTH, NAME_MAX_LENGTH);
        if self.gender.is_none() {
            violations.push("gender", ViolationKind::Invalid);
        }
        violations.max_length("image", self.image(), IMAGE_MAX_LENGTH);

        violations.finish()
    }
}

impl Describe for User {
    fn descriptor() -> &'static EntityDescriptor {
        &USER_DESCRIPTOR
    }
}

/// Wire representation of a [`User`].
///
/// Deserialising replays the setters, so every field rule applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default, deny_unknown_fields)]
#[schema(as = User)]
pub struct UserDto {
    /// Persistence identifier, absent until first save.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: Option<UserId>,
    /// Email address.
    #[schema(example = "ada@example.org")]
    email: Option<String>,
    /// Given name, 2 to 30 characters.
    #[schema(example = "Ada")]
    first_name: Option<String>,
    /// Family name, 2 to 30 characters.
    #[schema(example = "Lovelace")]
    last_name: Option<String>,
    /// Date of birth.
    #[schema(value_type = Option<String>, format = Date, example = "1815-12-10")]
    birth_date: Option<NaiveDate>,
    /// Gender.
    gender: Option<Gender>,
    /// Picture reference.
    image: Option<String>,
    /// Branch identifier.
    #[schema(value_type = Option<String>)]
    branch: Option<BranchId>,
    /// Semester of study.
    semester: Option<i32>,
    /// Relationship status.
    relationship_status: RelationshipStatus,
    /// Gender the user is searching for.
    searched_relation_preference: SearchingPreference,
    /// Kind of relationship the user is searching for.
    searched_relation_type: SearchingType,
    /// Identifiers of courses the user is enrolled in.
    #[schema(value_type = Vec<String>)]
    courses: Vec<CourseId>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            email,
            first_name,
            last_name,
            birth_date,
            gender,
            image,
            branch,
            semester,
            relationship_status,
            searched_relation_preference,
            searched_relation_type,
            courses,
        } = value;
        Self {
            id,
            email,
            first_name,
            last_name,
            birth_date,
            gender,
            image,
            branch,
            semester,
            relationship_status,
            searched_relation_preference,
            searched_relation_type,
            courses: courses.into_iter().collect(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = ModelError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let mut user = Self::new();
        if let Some(id) = value.id {
            user.assign_id(id)?;
        }
        if let Some(email) = value.email {
            user.set_email(email);
        }
        if let Some(first_name) = value.first_name {
            user.set_first_name(first_name)?;
        }
        if let Some(last_name) = value.last_name {
            user.set_last_name(last_name)?;
        }
        if let Some(gender) = value.gender {
            user.set_gender(gender)?;
        }
        if let Some(image) = value.image {
            user.set_image(image);
        }
        user.set_birth_date(value.birth_date)
            .set_branch(value.branch)
            .set_semester(value.semester)
            .set_relationship_status(value.relationship_status)?
            .set_searched_relation_preference(value.searched_relation_preference)?
            .set_searched_relation_type(value.searched_relation_type)?;
        for course in value.courses {
            user.add_course(course);
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
