//! Entity-level constraint checks.
//!
//! Setters guard individual assignments. This module checks a whole
//! entity before it is handed to persistence. It covers required fields
//! that a freshly created entity may still lack, column lengths, and email
//! format. Every violation is reported at once, each with a stable message
//! code such as `user.firstName.tooShort`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Kind of constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required value is missing or blank.
    Blank,
    /// The value has the wrong format.
    Invalid,
    /// The value is shorter than the minimum.
    TooShort {
        /// Minimum character count.
        min: usize,
    },
    /// The value is longer than the maximum.
    TooLong {
        /// Maximum character count.
        max: usize,
    },
}

impl ViolationKind {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Invalid => "invalid",
            Self::TooShort { .. } => "tooShort",
            Self::TooLong { .. } => "tooLong",
        }
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    entity: &'static str,
    property_path: &'static str,
    kind: ViolationKind,
}

impl ConstraintViolation {
    /// Entity prefix used in message codes, such as `user`.
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    /// Wire name of the offending field.
    #[must_use]
    pub const fn property_path(&self) -> &'static str {
        self.property_path
    }

    /// Kind of constraint violated.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Stable message code, `<entity>.<field>.<kind>`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}.{}.{}", self.entity, self.property_path, self.kind.suffix())
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// Every violation found while validating an entity.
///
/// ## Invariants
/// - Never empty; validation returns `Ok(())` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolations(Vec<ConstraintViolation>);

impl ConstraintViolations {
    /// Violations in field declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[ConstraintViolation] {
        &self.0
    }

    /// Message codes in field declaration order.
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.0.iter().map(ConstraintViolation::code).collect()
    }

    /// Returns `true` when a violation carries `code`.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|violation| violation.code() == code)
    }
}

impl fmt::Display for ConstraintViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity failed validation: {}", self.codes().join(", "))
    }
}

impl std::error::Error for ConstraintViolations {}

impl IntoIterator for ConstraintViolations {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Accumulates violations for one entity.
pub(crate) struct Violations {
    entity: &'static str,
    found: Vec<ConstraintViolation>,
}

impl Violations {
    pub(crate) const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            found: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, property_path: &'static str, kind: ViolationKind) {
        self.found.push(ConstraintViolation {
            entity: self.entity,
            property_path,
            kind,
        });
    }

    /// Require a non-blank value whose length lies in `min..=max`.
    pub(crate) fn required_text(
        &mut self,
        property_path: &'static str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) {
        match value {
            None => self.push(property_path, ViolationKind::Blank),
            Some(text) if text.trim().is_empty() => {
                self.push(property_path, ViolationKind::Blank);
            }
            Some(text) => self.length(property_path, text, min, max),
        }
    }

    /// Check `text` against `min..=max` characters.
    pub(crate) fn length(
        &mut self,
        property_path: &'static str,
        text: &str,
        min: usize,
        max: usize,
    ) {
        let length = text.chars().count();
        if length < min {
            self.push(property_path, ViolationKind::TooShort { min });
        } else if length > max {
            self.push(property_path, ViolationKind::TooLong { max });
        }
    }

    /// Check an optional value against a column length.
    pub(crate) fn max_length(
        &mut self,
        property_path: &'static str,
        value: Option<&str>,
        max: usize,
    ) {
        if let Some(text) = value {
            self.length(property_path, text, 0, max);
        }
    }

    pub(crate) fn finish(self) -> Result<(), ConstraintViolations> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(ConstraintViolations(self.found))
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Loose check: something, an at sign, then a dotted domain.
        Regex::new(r"^.+@\S+\.\S+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Returns `true` when `value` looks like an email address.
///
/// # Examples
/// ```
/// use wink_model::domain::looks_like_email;
///
/// assert!(looks_like_email("ada@example.org"));
/// assert!(!looks_like_email("ada@localhost"));
/// ```
#[must_use]
pub fn looks_like_email(value: &str) -> bool {
    email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.org", true)]
    #[case("first.last+tag@uni.example.ac.uk", true)]
    #[case("ada@localhost", false)]
    #[case("ada.example.org", false)]
    #[case("@example.org", false)]
    #[case("ada@exa mple.org", false)]
    fn email_format(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(looks_like_email(input), expected);
    }

    #[rstest]
    fn collects_violations_in_order() {
        let mut violations = Violations::new("user");
        violations.required_text("firstName", Some("A"), 2, 30);
        violations.required_text("lastName", None, 2, 30);
        violations.max_length("image", Some("abcdef"), 5);
        violations.max_length("email", None, 5);

        let err = violations.finish().expect_err("three violations");
        assert_eq!(
            err.codes(),
            vec!["user.firstName.tooShort", "user.lastName.blank", "user.image.tooLong"]
        );
        assert!(err.contains("user.lastName.blank"));
        assert_eq!(
            err.to_string(),
            concat!(
                "entity failed validation: ",
                "user.firstName.tooShort, user.lastName.blank, user.image.tooLong"
            )
        );
    }

    #[rstest]
    fn whitespace_only_counts_as_blank() {
        let mut violations = Violations::new("user");
        violations.required_text("firstName", Some("   "), 2, 30);
        let err = violations.finish().expect_err("blank");
        assert_eq!(err.as_slice()[0].kind(), ViolationKind::Blank);
    }

    #[rstest]
    fn no_violations_is_ok() {
        let mut violations = Violations::new("course");
        violations.max_length("name", Some("Algebra"), 100);
        assert!(violations.finish().is_ok());
    }
}
