//! Tests for the course entity and its derived key.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn course() -> Course {
    Course::new("MATH101", "td", 2).expect("valid course")
}

#[rstest]
#[case("MATH101", "td", 2, "MATH101-td-2")]
#[case("LO21", "c", 1, "LO21-c-1")]
#[case("NF16", "tp", 12, "NF16-tp-12")]
#[case("", "c", 0, "-c-0")]
fn constructor_derives_key(
    #[case] uv: &str,
    #[case] course_type: &str,
    #[case] number: u16,
    #[case] expected: &str,
) {
    let course = Course::new(uv, course_type, number).expect("valid course");
    assert_eq!(course.key(), expected);
    assert_eq!(course.key_state(), KeyState::Consistent);
    assert!(course.id().is_none());
    assert!(course.users().is_empty());
}

#[rstest]
fn constructor_rejects_unknown_type() {
    let err = Course::new("MATH101", "lab", 2).expect_err("unknown type");
    assert!(err.is_invalid_argument());
    assert_eq!(err.field(), Some("type"));
}

#[rstest]
fn set_number_refreshes_key(mut course: Course) {
    course.set_number(3);
    assert_eq!(course.key(), "MATH101-td-3");
}

#[rstest]
fn setters_chain_and_refresh_key(mut course: Course) {
    course
        .set_uv("PHYS201")
        .set_number(7)
        .set_type(CourseType::Practical)
        .expect("valid type");
    assert_eq!(course.key(), "PHYS201-tp-7");
    assert_eq!(course.course_type(), CourseType::Practical);
}

#[rstest]
#[case("c", "MATH101-c-2")]
#[case("tp", "MATH101-tp-2")]
fn set_type_accepts_wire_values(mut course: Course, #[case] value: &str, #[case] key: &str) {
    course.set_type(value).expect("valid type");
    assert_eq!(course.key(), key);
}

#[rstest]
#[case("TD")]
#[case("lab")]
#[case("")]
#[case(" td")]
fn set_type_rejects_unknown_values_without_mutating(mut course: Course, #[case] value: &str) {
    let before = course.clone();
    let err = course.set_type(value).expect_err("rejected");
    assert!(err.is_invalid_argument());
    assert_eq!(course.course_type(), CourseType::Tutorial);
    assert_eq!(course.key(), "MATH101-td-2");
    assert_eq!(course, before);
}

#[rstest]
fn set_key_overrides_until_next_key_field_mutation(mut course: Course) {
    course.set_key("legacy-0042");
    assert_eq!(course.key(), "legacy-0042");
    assert_eq!(course.key_state(), KeyState::Overridden);
    assert_eq!(course.derived_key(), "MATH101-td-2");

    course.set_name("Linear algebra");
    assert_eq!(course.key(), "legacy-0042", "non-key fields keep the override");

    course.set_uv("MATH102");
    assert_eq!(course.key(), "MATH102-td-2");
    assert_eq!(course.key_state(), KeyState::Consistent);
}

#[rstest]
fn failed_set_type_keeps_overridden_key(mut course: Course) {
    course.set_key("legacy-0042");
    assert!(course.set_type("lab").is_err());
    assert_eq!(course.key(), "legacy-0042");
    assert_eq!(course.key_state(), KeyState::Overridden);
}

#[rstest]
fn assign_id_is_write_once(mut course: Course) {
    let id = CourseId::new(VALID_ID).expect("valid id");
    course.assign_id(id.clone()).expect("first assignment");
    assert_eq!(course.id(), Some(&id));

    let err = course
        .assign_id(CourseId::random())
        .expect_err("second assignment");
    assert_eq!(err, ModelError::IdAlreadyAssigned { entity: "Course" });
    assert_eq!(course.id(), Some(&id));
}

#[rstest]
fn user_association_is_one_sided(mut course: Course) {
    let user = UserId::random();
    course.add_user(user.clone()).add_user(user.clone());
    assert_eq!(course.users().len(), 1);
    assert!(course.remove_user(&user));
    assert!(!course.remove_user(&user));
}

#[rstest]
#[case("uv", json!("CHEM110"), "CHEM110-td-2")]
#[case("type", json!("c"), "MATH101-c-2")]
#[case("number", json!(9), "MATH101-td-9")]
fn assign_dispatches_to_setters(
    mut course: Course,
    #[case] field: &str,
    #[case] value: Value,
    #[case] key: &str,
) {
    course.assign(field, &value).expect("accepted");
    assert_eq!(course.key(), key);
}

#[rstest]
#[case("uv", json!(101))]
#[case("uv", json!(null))]
#[case("type", json!("lab"))]
#[case("type", json!(["td"]))]
#[case("number", json!("3"))]
#[case("number", json!(2.5))]
#[case("number", json!(-1))]
#[case("number", json!(70_000))]
#[case("key", json!("MATH101-td-9"))]
#[case("id", json!(VALID_ID))]
#[case("credits", json!(6))]
fn assign_rejects_bad_candidates_atomically(
    mut course: Course,
    #[case] field: &str,
    #[case] value: Value,
) {
    let before = course.clone();
    let err = course.assign(field, &value).expect_err("rejected");
    assert!(err.is_invalid_argument(), "{err}");
    assert_eq!(course, before);
}

#[rstest]
fn assign_name_accepts_null(mut course: Course) {
    course.set_name("Linear algebra");
    course.assign("name", &json!(null)).expect("nullable");
    assert_eq!(course.name(), None);
}

#[rstest]
fn validate_reports_column_overflow() {
    let course = Course::new("INFORMATIQUE-AVANCEE", "tp", 10).expect("valid course");
    let err = course.validate().expect_err("key too long");
    assert_eq!(err.codes(), vec!["course.key.tooLong"]);
}

#[rstest]
fn validate_reports_blank_uv_and_long_name() {
    let mut course = Course::new("  ", "c", 1).expect("valid course");
    course.set_name("x".repeat(NAME_MAX_LENGTH + 1));
    let err = course.validate().expect_err("two violations");
    assert_eq!(err.codes(), vec!["course.name.tooLong", "course.uv.blank"]);
}

#[rstest]
fn validate_accepts_typical_course(course: Course) {
    assert!(course.validate().is_ok());
}

#[rstest]
fn descriptor_lists_persisted_fields_and_rules() {
    let descriptor = Course::descriptor();
    assert_eq!(descriptor.table, "wink_courses");
    assert_eq!(descriptor.iri, "http://schema.org/Organization");

    let names: Vec<_> = descriptor.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["id", "name", "uv", "type", "number", "key"]);

    let assignable: Vec<_> = descriptor.rules().iter().map(|r| r.field).collect();
    assert_eq!(assignable, ["name", "uv", "type", "number"]);

    assert_eq!(
        descriptor.rule("type").map(|r| r.constraint),
        Some(Constraint::OneOf(CourseType::VALUES))
    );
    assert!(matches!(
        descriptor.association("users").map(|a| a.kind),
        Some(AssociationKind::ManyToMany {
            join_table: "wink_users_courses",
            inverse: "courses",
        })
    ));
}

#[rstest]
fn serialises_camel_case_with_type_and_key(mut course: Course) {
    course.set_name("Linear algebra");
    let value = serde_json::to_value(&course).expect("serialise");
    assert_eq!(
        value,
        json!({
            "name": "Linear algebra",
            "uv": "MATH101",
            "type": "td",
            "number": 2,
            "key": "MATH101-td-2",
            "users": []
        })
    );
}

#[rstest]
fn deserialising_derives_missing_key() {
    let course: Course =
        serde_json::from_value(json!({ "uv": "LO21", "type": "c", "number": 1 }))
            .expect("deserialise");
    assert_eq!(course.key(), "LO21-c-1");
    assert_eq!(course.key_state(), KeyState::Consistent);
}

#[rstest]
fn deserialising_applies_precomputed_key_as_override() {
    let course: Course = serde_json::from_value(json!({
        "id": VALID_ID,
        "uv": "LO21",
        "type": "c",
        "number": 1,
        "key": "LO21-C1"
    }))
    .expect("deserialise");
    assert_eq!(course.key(), "LO21-C1");
    assert_eq!(course.key_state(), KeyState::Overridden);
    assert_eq!(course.id().map(ToString::to_string), Some(VALID_ID.to_owned()));
}

#[rstest]
fn deserialising_rejects_unknown_type() {
    let result = serde_json::from_value::<Course>(json!({
        "uv": "LO21",
        "type": "amphi",
        "number": 1
    }));
    assert!(result.is_err());
}

#[derive(Clone, Default)]
struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().expect("log buffer").clone()).expect("utf-8 log")
    }
}

fn with_captured_debug_log(action: impl FnOnce()) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, action);
    log.text()
}

#[rstest]
fn key_refresh_and_override_are_logged(mut course: Course) {
    let output = with_captured_debug_log(|| {
        course.set_key("legacy-0042");
        course.set_number(3);
    });
    assert!(output.contains("course key overridden"), "{output}");
    assert!(output.contains("course key refreshed"), "{output}");
    assert!(output.contains("previous_key=legacy-0042"), "{output}");
    assert!(output.contains("course_key=MATH101-td-3"), "{output}");
}
