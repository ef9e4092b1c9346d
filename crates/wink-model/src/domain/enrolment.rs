//! Symmetric maintenance of the user/course association.
//!
//! `Course::add_user` and `User::add_course` each touch one side only. The
//! helpers here update both sides together. [`EnrolmentService`] does the
//! same for stored entities through the repository ports. It writes the
//! course first and restores it when the user write fails, so a failed
//! call leaves neither side linked.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::course::Course;
use super::ids::{CourseId, UserId};
use super::ports::{CourseRepository, CourseRepositoryError, UserRepository, UserRepositoryError};
use super::user::User;

/// Errors raised while linking entities in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociationError {
    /// One side has not been persisted and so has no identifier.
    #[error("{entity} must be saved before it can be enrolled")]
    Unsaved {
        /// Entity lacking an identifier.
        entity: &'static str,
    },
}

fn identities(user: &User, course: &Course) -> Result<(UserId, CourseId), AssociationError> {
    let user_id = user
        .id()
        .cloned()
        .ok_or(AssociationError::Unsaved { entity: "User" })?;
    let course_id = course
        .id()
        .cloned()
        .ok_or(AssociationError::Unsaved { entity: "Course" })?;
    Ok((user_id, course_id))
}

/// Add `user` to `course` and `course` to `user`.
///
/// # Errors
///
/// Returns [`AssociationError::Unsaved`] when either entity lacks an
/// identifier. Neither side changes in that case.
pub fn enrol(user: &mut User, course: &mut Course) -> Result<(), AssociationError> {
    let (user_id, course_id) = identities(user, course)?;
    user.add_course(course_id);
    course.add_user(user_id);
    Ok(())
}

/// Remove `user` from `course` and `course` from `user`.
///
/// Returns `true` when either side held the link.
///
/// # Errors
///
/// Returns [`AssociationError::Unsaved`] when either entity lacks an
/// identifier.
pub fn withdraw(user: &mut User, course: &mut Course) -> Result<bool, AssociationError> {
    let (user_id, course_id) = identities(user, course)?;
    let from_user = user.remove_course(&course_id);
    let from_course = course.remove_user(&user_id);
    Ok(from_user || from_course)
}

/// Errors raised by [`EnrolmentService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrolmentError {
    /// No stored user has the identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// No stored course has the identifier.
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    /// The loaded entities could not be linked.
    #[error(transparent)]
    Association(#[from] AssociationError),
    /// The user repository failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
    /// The course repository failed.
    #[error(transparent)]
    CourseRepository(#[from] CourseRepositoryError),
    /// The user write failed after the course was written, and restoring
    /// the course failed too. The stored course is one-sided.
    #[error("user write failed ({user}); course {course_id} could not be restored ({course})")]
    PartialWrite {
        /// Course left with a one-sided link.
        course_id: CourseId,
        /// Failure from the user repository.
        user: UserRepositoryError,
        /// Failure while restoring the course.
        course: CourseRepositoryError,
    },
}

/// Enrols stored users in stored courses.
#[derive(Debug)]
pub struct EnrolmentService<U, C> {
    users: Arc<U>,
    courses: Arc<C>,
}

impl<U, C> Clone for EnrolmentService<U, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            courses: Arc::clone(&self.courses),
        }
    }
}

impl<U, C> EnrolmentService<U, C>
where
    U: UserRepository,
    C: CourseRepository,
{
    /// Create a service over the two repositories.
    pub const fn new(users: Arc<U>, courses: Arc<C>) -> Self {
        Self { users, courses }
    }

    fn load(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<(User, Course), EnrolmentError> {
        let user = self
            .users
            .find_by_id(user_id)?
            .ok_or_else(|| EnrolmentError::UserNotFound(user_id.clone()))?;
        let course = self
            .courses
            .find_by_id(course_id)?
            .ok_or_else(|| EnrolmentError::CourseNotFound(course_id.clone()))?;
        Ok((user, course))
    }

    /// Write the course, then the user. When the user write fails the
    /// course is saved again in its `previous` state.
    fn persist(
        &self,
        user: &mut User,
        course: &mut Course,
        previous: &Course,
        course_id: &CourseId,
    ) -> Result<(), EnrolmentError> {
        self.courses.save(course)?;
        let Err(user_error) = self.users.save(user) else {
            return Ok(());
        };

        let mut restored = previous.clone();
        match self.courses.save(&mut restored) {
            Ok(_) => Err(EnrolmentError::UserRepository(user_error)),
            Err(course_error) => {
                warn!(
                    course = %course_id,
                    error = %course_error,
                    "course restore failed after user write error"
                );
                Err(EnrolmentError::PartialWrite {
                    course_id: course_id.clone(),
                    user: user_error,
                    course: course_error,
                })
            }
        }
    }

    /// Link a stored user and course, saving both sides.
    ///
    /// # Errors
    ///
    /// Returns [`EnrolmentError`] when either entity is missing or a
    /// repository call fails. Neither stored side is linked afterwards
    /// unless the error is [`EnrolmentError::PartialWrite`].
    pub fn enrol(&self, user_id: &UserId, course_id: &CourseId) -> Result<(), EnrolmentError> {
        let (mut user, mut course) = self.load(user_id, course_id)?;
        let previous = course.clone();
        enrol(&mut user, &mut course)?;
        self.persist(&mut user, &mut course, &previous, course_id)?;
        debug!(user = %user_id, course = %course_id, "user enrolled");
        Ok(())
    }

    /// Unlink a stored user and course. Nothing is saved when no link
    /// existed. Returns `true` when a link was removed.
    ///
    /// # Errors
    ///
    /// Returns [`EnrolmentError`] when either entity is missing or a
    /// repository call fails. The stored link is left intact unless the
    /// error is [`EnrolmentError::PartialWrite`].
    pub fn withdraw(&self, user_id: &UserId, course_id: &CourseId) -> Result<bool, EnrolmentError> {
        let (mut user, mut course) = self.load(user_id, course_id)?;
        let previous = course.clone();
        if !withdraw(&mut user, &mut course)? {
            return Ok(false);
        }
        self.persist(&mut user, &mut course, &previous, course_id)?;
        debug!(user = %user_id, course = %course_id, "user withdrawn");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "enrolment_tests.rs"]
mod tests;
