//! OpenAPI component schemas for the entity DTOs.
//!
//! The model has no HTTP surface of its own. [`ModelDoc`] registers the
//! entity and vocabulary schemas so API crates can merge them into their
//! documents, and `schema-dump` exports them for external tooling.

use utoipa::OpenApi;

use crate::domain::{
    CourseDto, CourseType, Gender, RelationshipStatus, SearchingPreference, SearchingType, UserDto,
};

/// OpenAPI document listing the Wink model schemas.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wink data model",
        description = "Component schemas for courses, users and their vocabularies."
    ),
    components(schemas(
        CourseDto,
        UserDto,
        CourseType,
        Gender,
        RelationshipStatus,
        SearchingPreference,
        SearchingType
    ))
)]
pub struct ModelDoc;
