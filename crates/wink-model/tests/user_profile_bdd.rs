//! Behavioural tests for user profiles.
//!
//! These scenarios cover vocabulary defaults, setter rejection, email
//! validation toggled by settings, and symmetric enrolment.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use wink_model::ValidationSettings;
use wink_model::domain::ports::{CourseRepository, UserRepository};
use wink_model::domain::{
    ConstraintViolations, Course, CourseId, EnrolmentService, Gender, ModelError, User, UserId,
};
use wink_model::outbound::{InMemoryCourseRepository, InMemoryUserRepository};

/// Scenario state holding the user under test and collaborators.
#[derive(Default, ScenarioState)]
struct World {
    user: Slot<User>,
    course: Slot<Course>,
    error: Slot<ModelError>,
    validation: Slot<Result<(), ConstraintViolations>>,
    users: Slot<Arc<InMemoryUserRepository>>,
    courses: Slot<Arc<InMemoryCourseRepository>>,
    ids: Slot<(UserId, CourseId)>,
}

impl World {
    fn user(&self) -> User {
        self.user.get().expect("user should be set")
    }

    fn update(&self, change: impl FnOnce(&mut User) -> Result<(), ModelError>) {
        let mut user = self.user();
        if let Err(error) = change(&mut user) {
            self.error.set(error);
        }
        self.user.set(user);
    }

    fn validate_with(&self, settings: &ValidationSettings) {
        self.validation.set(self.user().validate(settings));
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a new user")]
fn a_new_user(world: &World) {
    world.user.set(User::new());
}

#[given("a complete user with email \"{email}\"")]
fn a_complete_user(world: &World, email: String) {
    let mut user = User::new();
    user.set_email(email)
        .set_first_name("Ada")
        .and_then(|user| user.set_last_name("Lovelace"))
        .and_then(|user| user.set_gender(Gender::Female))
        .expect("valid profile");
    world.user.set(user);
}

#[given("a course \"{uv}\" of type \"{course_type}\" numbered {number:u16}")]
fn a_course(world: &World, uv: String, course_type: String, number: u16) {
    world
        .course
        .set(Course::new(uv, course_type, number).expect("valid course"));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the gender is set to \"{gender}\"")]
fn the_gender_is_set(world: &World, gender: String) {
    world.update(|user| user.set_gender(gender).map(|_| ()));
}

#[when("the first name is set to \"{name}\"")]
fn the_first_name_is_set(world: &World, name: String) {
    world.update(|user| user.set_first_name(name).map(|_| ()));
}

#[when("the user is validated with the email check enabled")]
fn validated_with_email_check(world: &World) {
    world.validate_with(&ValidationSettings::default());
}

#[when("the user is validated with the email check disabled")]
fn validated_without_email_check(world: &World) {
    world.validate_with(&ValidationSettings::lenient());
}

#[when("both are saved and the user is enrolled in the course")]
fn both_are_saved_and_enrolled(world: &World) {
    let users = Arc::new(InMemoryUserRepository::new());
    let courses = Arc::new(InMemoryCourseRepository::new());
    let mut user = world.user();
    let mut course = world.course.get().expect("course should be set");
    let user_id = users.save(&mut user).expect("user saved");
    let course_id = courses.save(&mut course).expect("course saved");

    let service = EnrolmentService::new(Arc::clone(&users), Arc::clone(&courses));
    service.enrol(&user_id, &course_id).expect("enrolment succeeds");

    world.users.set(users);
    world.courses.set(courses);
    world.ids.set((user_id, course_id));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the relationship status is \"{expected}\"")]
fn the_relationship_status_is(world: &World, expected: String) {
    assert_eq!(world.user().relationship_status().to_string(), expected);
}

#[then("the searched preference is \"{expected}\"")]
fn the_searched_preference_is(world: &World, expected: String) {
    assert_eq!(world.user().searched_relation_preference().to_string(), expected);
}

#[then("the searched relationship type is \"{expected}\"")]
fn the_searched_relationship_type_is(world: &World, expected: String) {
    assert_eq!(world.user().searched_relation_type().to_string(), expected);
}

#[then("the change is rejected as an invalid argument")]
fn the_change_is_rejected(world: &World) {
    let error = world.error.get().expect("an error should be recorded");
    assert!(error.is_invalid_argument(), "unexpected error: {error}");
}

#[then("the user has no gender")]
fn the_user_has_no_gender(world: &World) {
    assert_eq!(world.user().gender(), None);
}

#[then("the first name is \"{expected}\"")]
fn the_first_name_is(world: &World, expected: String) {
    assert_eq!(world.user().first_name(), Some(expected.as_str()));
}

#[then("validation reports \"{code}\"")]
fn validation_reports(world: &World, code: String) {
    let violations = world
        .validation
        .get()
        .expect("validation should run")
        .expect_err("validation should fail");
    assert!(violations.contains(&code), "got {violations}");
}

#[then("validation passes")]
fn validation_passes(world: &World) {
    let result = world.validation.get().expect("validation should run");
    assert!(result.is_ok(), "unexpected violations: {result:?}");
}

#[then("the stored user lists the course")]
fn the_stored_user_lists_the_course(world: &World) {
    let (user_id, course_id) = world.ids.get().expect("ids should be set");
    let users = world.users.get().expect("user repository should be set");
    let user = users
        .find_by_id(&user_id)
        .expect("lookup succeeds")
        .expect("user stored");
    assert!(user.courses().contains(&course_id));
}

#[then("the stored course lists the user")]
fn the_stored_course_lists_the_user(world: &World) {
    let (user_id, course_id) = world.ids.get().expect("ids should be set");
    let courses = world.courses.get().expect("course repository should be set");
    let course = courses
        .find_by_id(&course_id)
        .expect("lookup succeeds")
        .expect("course stored");
    assert!(course.users().contains(&user_id));
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "New profiles use relationship defaults"
)]
fn new_profiles_use_relationship_defaults(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "Genders outside the vocabulary are rejected"
)]
fn genders_outside_the_vocabulary_are_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "First names need at least two characters"
)]
fn first_names_need_at_least_two_characters(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "Malformed emails fail validation when the format check is on"
)]
fn malformed_emails_fail_validation(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "Lenient validation accepts any textual email"
)]
fn lenient_validation_accepts_any_textual_email(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_profile.feature",
    name = "Enrolment links both sides"
)]
fn enrolment_links_both_sides(world: World) {
    let _ = world;
}
