//! Rule-table validation for entity writes.
//!
//! # Responsibility
//! - Check entity fields against their declared `Rule` lists.
//! - Report every failing field in one pass.
//!
//! # Invariants
//! - Values are trimmed before any rule is applied.
//! - Each field reports at most one error (its first failing rule).
//! - Validation never touches storage.

use crate::model::entity::{field_values, present_fields, Entity, FieldSpec, Rule};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Column name, or `_` for record-level problems.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Validates every declared field of `entity`.
///
/// Returns an empty list when the entity is valid.
pub fn validate<E: Entity>(entity: &E) -> Vec<FieldError> {
    field_values(entity)
        .into_iter()
        .filter_map(|(spec, value)| check_field(spec, value))
        .collect()
}

/// Validates only the fields present (non-empty) in a partial update.
///
/// Absent fields are skipped, so `Rule::Required` never fails here.
pub fn validate_partial<E: Entity>(partial: &E) -> Vec<FieldError> {
    present_fields(partial)
        .into_iter()
        .filter_map(|(spec, value)| check_field(spec, value))
        .collect()
}

/// Joins field errors into one human-readable line.
pub fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_field(spec: &FieldSpec, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return spec
            .rules
            .contains(&Rule::Required)
            .then(|| FieldError::new(spec.column, "is required"));
    }

    spec.rules
        .iter()
        .find_map(|rule| check_rule(*rule, value))
        .map(|message| FieldError::new(spec.column, message))
}

fn check_rule(rule: Rule, value: &str) -> Option<String> {
    match rule {
        Rule::Required => None,
        Rule::Length { min, max } => {
            let count = value.chars().count();
            (count < min || count > max)
                .then(|| format!("must be between {min} and {max} characters"))
        }
        Rule::Digits(len) => (value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()))
            .then(|| format!("must be exactly {len} digits")),
        Rule::Email => (!EMAIL_RE.is_match(value)).then(|| "must be a valid email".to_string()),
        Rule::OneOf(allowed) => {
            (!allowed.contains(&value)).then(|| format!("must be one of: {}", allowed.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{describe, validate, validate_partial, FieldError};
    use crate::model::entity::Status;
    use crate::model::organisation::Organisation;
    use crate::model::user::User;

    fn ann() -> User {
        User::new("Ann", "ann1", "9876543210", "a@x.com", Status::Active)
    }

    #[test]
    fn valid_user_has_no_errors() {
        assert!(validate(&ann()).is_empty());
    }

    #[test]
    fn empty_user_reports_every_required_field() {
        let errors = validate(&User::default());
        let fields: Vec<_> = errors.iter().map(|err| err.field).collect();
        assert_eq!(
            fields,
            ["name", "handle", "mobile_number", "email", "status"]
        );
        assert!(errors.iter().all(|err| err.message == "is required"));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut user = ann();
        user.name = "   ".to_string();
        assert_eq!(
            validate(&user),
            vec![FieldError::new("name", "is required")]
        );
    }

    #[test]
    fn mobile_number_requires_exactly_ten_digits() {
        for bad in ["12345", "12345678901", "12345abcde", "١٢٣٤٥٦٧٨٩٠"] {
            let mut user = ann();
            user.mobile_number = bad.to_string();
            let errors = validate(&user);
            assert_eq!(errors.len(), 1, "expected rejection for {bad}");
            assert_eq!(errors[0].field, "mobile_number");
        }

        let mut user = ann();
        user.mobile_number = "1234567890".to_string();
        assert!(validate(&user).is_empty());
    }

    #[test]
    fn name_length_counts_characters() {
        let mut user = ann();
        user.name = "A".to_string();
        assert_eq!(validate(&user)[0].message, "must be between 2 and 100 characters");

        user.name = "é".repeat(100);
        assert!(validate(&user).is_empty());

        user.name = "x".repeat(101);
        assert_eq!(validate(&user).len(), 1);
    }

    #[test]
    fn email_and_status_rules_apply() {
        let mut org = Organisation::new("Acme", "1234567890", "not-an-email", Status::Active);
        org.status = "archived".to_string();

        let errors = validate(&org);
        assert_eq!(
            errors,
            vec![
                FieldError::new("email", "must be a valid email"),
                FieldError::new("status", "must be one of: active, inactive"),
            ]
        );
        assert_eq!(
            describe(&errors),
            "email must be a valid email; status must be one of: active, inactive"
        );
    }

    #[test]
    fn partial_validation_ignores_absent_fields() {
        let partial = User {
            email: "still@valid.io".to_string(),
            ..User::default()
        };
        assert!(validate_partial(&partial).is_empty());

        let partial = User {
            mobile_number: "123".to_string(),
            ..User::default()
        };
        let errors = validate_partial(&partial);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "mobile_number");
    }
}
