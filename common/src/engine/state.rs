//! Form state: current values and current validation errors, keyed by field
//! name.
//!
//! Every value-holding field of the schema (cards excluded, their children
//! included) has an entry in `values` from initialization on. `errors` only
//! holds entries while a validation failure is outstanding; it is never touched
//! by [`FormState::set`], only replaced wholesale after a validation pass.

use crate::model::field::{FieldDescriptor, FieldKind, leaves};
use crate::model::value::{FieldErrors, FieldValue, FormValues};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: FormValues,
    errors: FieldErrors,
}

impl FormState {
    /// Creates the state for a freshly mounted form.
    pub fn new(schema: &[FieldDescriptor]) -> Self {
        Self {
            values: Self::initialize(schema),
            errors: FieldErrors::new(),
        }
    }

    /// Initial values derived from the schema: an empty list for
    /// `multiselect`, otherwise the declared value or an empty string.
    pub fn initialize(schema: &[FieldDescriptor]) -> FormValues {
        leaves(schema)
            .into_iter()
            .map(|field| {
                let value = match &field.kind {
                    FieldKind::MultiSelect(_) => FieldValue::empty_list(),
                    _ => FieldValue::Text(field.value.clone().unwrap_or_default()),
                };
                (field.name.clone(), value)
            })
            .collect()
    }

    /// Replaces the value of `name`. Errors are left as they are.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    /// Replaces all values with freshly derived initial values.
    pub fn reset(&mut self, schema: &[FieldDescriptor]) {
        self.values = Self::initialize(schema);
    }

    pub fn replace_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }
}
