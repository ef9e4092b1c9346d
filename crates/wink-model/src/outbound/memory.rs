//! In-memory repository adapters.
//!
//! Records live in a `BTreeMap` behind an `RwLock`, so iteration order and
//! therefore lookups by key or email are deterministic. A poisoned lock is
//! reported as a connection failure.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::domain::ports::{
    CourseRepository, CourseRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Course, CourseId, User, UserId};

fn poisoned<T>(_: PoisonError<T>) -> String {
    "store lock poisoned".to_owned()
}

/// Course repository backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<BTreeMap<CourseId, Course>>,
}

impl InMemoryCourseRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn save(&self, course: &mut Course) -> Result<CourseId, CourseRepositoryError> {
        let mut courses = self
            .courses
            .write()
            .map_err(|err| CourseRepositoryError::connection(poisoned(err)))?;

        let clash = courses
            .values()
            .any(|stored| stored.key() == course.key() && stored.id() != course.id());
        if clash {
            return Err(CourseRepositoryError::conflict(format!(
                "key {} is already taken",
                course.key()
            )));
        }

        let id = match course.id() {
            Some(id) => id.clone(),
            None => {
                let id = CourseId::random();
                course
                    .assign_id(id.clone())
                    .map_err(|err| CourseRepositoryError::query(err.to_string()))?;
                id
            }
        };
        courses.insert(id.clone(), course.clone());
        debug!(course = %id, key = course.key(), "course saved");
        Ok(id)
    }

    fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let courses = self
            .courses
            .read()
            .map_err(|err| CourseRepositoryError::connection(poisoned(err)))?;
        Ok(courses.get(id).cloned())
    }

    fn find_by_key(&self, key: &str) -> Result<Option<Course>, CourseRepositoryError> {
        let courses = self
            .courses
            .read()
            .map_err(|err| CourseRepositoryError::connection(poisoned(err)))?;
        Ok(courses.values().find(|course| course.key() == key).cloned())
    }

    fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError> {
        let mut courses = self
            .courses
            .write()
            .map_err(|err| CourseRepositoryError::connection(poisoned(err)))?;
        let removed = courses.remove(id).is_some();
        debug!(course = %id, removed, "course deleted");
        Ok(removed)
    }
}

/// User repository backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn save(&self, user: &mut User) -> Result<UserId, UserRepositoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|err| UserRepositoryError::connection(poisoned(err)))?;

        if let Some(email) = user.email() {
            let clash = users
                .values()
                .any(|stored| stored.email() == Some(email) && stored.id() != user.id());
            if clash {
                return Err(UserRepositoryError::conflict(format!(
                    "email {email} is already registered"
                )));
            }
        }

        let id = match user.id() {
            Some(id) => id.clone(),
            None => {
                let id = UserId::random();
                user.assign_id(id.clone())
                    .map_err(|err| UserRepositoryError::query(err.to_string()))?;
                id
            }
        };
        users.insert(id.clone(), user.clone());
        debug!(user = %id, "user saved");
        Ok(id)
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let users = self
            .users
            .read()
            .map_err(|err| UserRepositoryError::connection(poisoned(err)))?;
        Ok(users.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let users = self
            .users
            .read()
            .map_err(|err| UserRepositoryError::connection(poisoned(err)))?;
        Ok(users
            .values()
            .find(|user| user.email() == Some(email))
            .cloned())
    }

    fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|err| UserRepositoryError::connection(poisoned(err)))?;
        let removed = users.remove(id).is_some();
        debug!(user = %id, removed, "user deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the in-memory adapters.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn courses() -> InMemoryCourseRepository {
        InMemoryCourseRepository::new()
    }

    #[fixture]
    fn users() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    fn course(uv: &str, number: u16) -> Course {
        Course::new(uv, "td", number).expect("valid course")
    }

    #[rstest]
    fn save_assigns_an_id_once(courses: InMemoryCourseRepository) {
        let mut math = course("MATH101", 2);
        let first = courses.save(&mut math).expect("first save");
        assert_eq!(math.id(), Some(&first));

        math.set_number(3);
        let second = courses.save(&mut math).expect("update");
        assert_eq!(first, second);

        let stored = courses.find_by_id(&first).expect("lookup").expect("stored");
        assert_eq!(stored.key(), "MATH101-td-3");
    }

    #[rstest]
    fn find_by_key_uses_the_current_key(courses: InMemoryCourseRepository) {
        let mut math = course("MATH101", 2);
        let mut physics = course("PHYS201", 1);
        courses.save(&mut math).expect("save math");
        courses.save(&mut physics).expect("save physics");

        let found = courses
            .find_by_key("PHYS201-td-1")
            .expect("lookup")
            .expect("found");
        assert_eq!(found.id(), physics.id());
        assert!(courses.find_by_key("MATH101-td-9").expect("lookup").is_none());
    }

    #[rstest]
    fn duplicate_course_key_conflicts(courses: InMemoryCourseRepository) {
        courses.save(&mut course("MATH101", 2)).expect("first");
        let err = courses
            .save(&mut course("MATH101", 2))
            .expect_err("same key");
        assert_eq!(
            err,
            CourseRepositoryError::conflict("key MATH101-td-2 is already taken")
        );
    }

    #[rstest]
    fn delete_reports_whether_a_course_existed(courses: InMemoryCourseRepository) {
        let id = courses.save(&mut course("MATH101", 2)).expect("save");
        assert!(courses.delete(&id).expect("delete"));
        assert!(!courses.delete(&id).expect("second delete"));
        assert!(courses.find_by_id(&id).expect("lookup").is_none());
    }

    #[rstest]
    fn users_are_found_by_email(users: InMemoryUserRepository) {
        let mut ada = User::new();
        ada.set_email("ada@example.org");
        let id = users.save(&mut ada).expect("save");

        let found = users
            .find_by_email("ada@example.org")
            .expect("lookup")
            .expect("found");
        assert_eq!(found.id(), Some(&id));
        assert!(users.find_by_email("bob@example.org").expect("lookup").is_none());
    }

    #[rstest]
    fn duplicate_email_conflicts(users: InMemoryUserRepository) {
        let mut ada = User::new();
        ada.set_email("ada@example.org");
        users.save(&mut ada).expect("first");
        users.save(&mut ada).expect("resave keeps identity");

        let mut other = User::new();
        other.set_email("ada@example.org");
        let err = users.save(&mut other).expect_err("taken");
        assert!(matches!(err, UserRepositoryError::Conflict { .. }));
        assert!(other.id().is_none());
    }

    #[rstest]
    fn users_without_email_can_be_saved(users: InMemoryUserRepository) {
        let first = users.save(&mut User::new()).expect("first");
        let second = users.save(&mut User::new()).expect("second");
        assert_ne!(first, second);
        assert!(users.delete(&first).expect("delete"));
    }
}
