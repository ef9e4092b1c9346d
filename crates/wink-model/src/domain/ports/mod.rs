//! Repository ports for the persistence boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod course_repository;
mod user_repository;

#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CourseRepository, CourseRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
