//! Port abstraction for course persistence adapters and their errors.

use crate::domain::{Course, CourseId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-specific detail.
            message: String,
        } => "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-specific detail.
            message: String,
        } => "course repository query failed: {message}",
        /// Another course already holds the same key.
        Conflict {
            /// Adapter-specific detail.
            message: String,
        } => "course repository conflict: {message}",
    }
}

/// Port for storing and loading courses.
///
/// Adapters own identity: `save` assigns a fresh [`CourseId`] to a course
/// that has none and writes it back through [`Course::assign_id`].
#[cfg_attr(test, mockall::automock)]
pub trait CourseRepository: Send + Sync {
    /// Insert or update a course, returning its identifier.
    fn save(&self, course: &mut Course) -> Result<CourseId, CourseRepositoryError>;

    /// Fetch a course by identifier.
    fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// Fetch a course by its current key, such as `MATH101-td-2`.
    fn find_by_key(&self, key: &str) -> Result<Option<Course>, CourseRepositoryError>;

    /// Remove a course. Returns `true` when a record was deleted.
    fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError>;
}
