//! Per-field and whole-form validation.
//!
//! A field is checked in a fixed order and the first failure wins:
//! 1. `required` and empty: the custom `error` or [`REQUIRED_MESSAGE`].
//! 2. A `validator` pattern and a non-empty value that does not match: the
//!    custom `error` or [`INVALID_MESSAGE`].
//!
//! Patterns are searched, not anchored, so `"@"` accepts any value containing
//! an at sign. A pattern that does not compile fails the field instead of
//! aborting the form.

use regex::Regex;

use crate::engine::diagnostics::Diagnostic;
use crate::model::field::{FieldDescriptor, FieldKind};
use crate::model::value::{FieldErrors, FieldValue, FormValues};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_MESSAGE: &str = "Invalid input";
pub const MALFORMED_PATTERN_MESSAGE: &str = "Invalid validation pattern";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Pass,
    Fail(String),
}

impl ValidationResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationResult::Pass)
    }
}

/// Validates one value-holding field. `None` is treated as empty.
pub fn validate(descriptor: &FieldDescriptor, value: Option<&FieldValue>) -> ValidationResult {
    let empty = value.is_none_or(FieldValue::is_empty);
    let message = |default: &str| descriptor.error.clone().unwrap_or_else(|| default.to_string());

    if descriptor.required && empty {
        return ValidationResult::Fail(message(REQUIRED_MESSAGE));
    }

    if let (Some(pattern), Some(value)) = (&descriptor.validator, value) {
        if empty {
            return ValidationResult::Pass;
        }
        match Regex::new(pattern) {
            Ok(re) if re.is_match(&value.to_string()) => {}
            Ok(_) => return ValidationResult::Fail(message(INVALID_MESSAGE)),
            Err(e) => {
                Diagnostic::MalformedValidator {
                    name: descriptor.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                }
                .report();
                return ValidationResult::Fail(message(MALFORMED_PATTERN_MESSAGE));
            }
        }
    }

    ValidationResult::Pass
}

/// Validates every field of `schema` against `values` and returns a fresh
/// error mapping with exactly one entry per failing field.
///
/// Cards are never validated themselves; their children are, at any depth,
/// and report under their own names.
pub fn validate_form(schema: &[FieldDescriptor], values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    collect_errors(schema, values, &mut errors);
    errors
}

fn collect_errors(fields: &[FieldDescriptor], values: &FormValues, errors: &mut FieldErrors) {
    for field in fields {
        if let FieldKind::Card(children) = &field.kind {
            collect_errors(children, values, errors);
        } else if let ValidationResult::Fail(message) = validate(field, values.get(&field.name)) {
            errors.insert(field.name.clone(), message);
        }
    }
}
