//! Domain entities and the rules that guard them.
//!
//! Purpose: define the `Course` and `User` entities, keep the course key in
//! step with its parts, and restrict enumerated fields to their controlled
//! vocabularies. Document invariants and serialisation contracts (serde) in
//! each type's Rustdoc.
//!
//! Public surface:
//! - `Course`, `CourseDto`, `KeyState`: courses and their derived key.
//! - `User`, `UserDto`: student profiles.
//! - `CourseId`, `UserId`, `BranchId`: validated identifiers.
//! - Vocabulary enums and `available_*` lookups.
//! - `FieldRule`, `EntityDescriptor`, `Describe`: the field rule registry.
//! - `ConstraintViolations`: entity-level validation results.
//! - `enrolment`: symmetric association helpers.
//! - `ports`: repository traits.

pub mod constraints;
pub mod course;
pub mod descriptor;
pub mod enrolment;
pub mod error;
pub mod ids;
pub mod ports;
pub mod rules;
pub mod user;
pub mod vocabulary;

pub use self::constraints::{
    ConstraintViolation, ConstraintViolations, ViolationKind, looks_like_email,
};
pub use self::course::{COURSE_DESCRIPTOR, Course, CourseDto, KeyState};
pub use self::descriptor::{
    AssociationDescriptor, AssociationKind, Describe, EntityDescriptor, FieldDescriptor,
    PersistedType, SemanticType,
};
pub use self::enrolment::{AssociationError, EnrolmentError, EnrolmentService, enrol, withdraw};
pub use self::error::{IdValidationError, ModelError};
pub use self::ids::{BranchId, CourseId, UserId};
pub use self::rules::{Constraint, FieldRule};
pub use self::user::{USER_DESCRIPTOR, User, UserDto};
pub use self::vocabulary::{
    CourseType, Gender, RelationshipStatus, SearchingPreference, SearchingType, UnknownTerm,
    Vocabulary, available_course_types, available_genders, available_searching_preferences,
    available_searching_types, available_status,
};
