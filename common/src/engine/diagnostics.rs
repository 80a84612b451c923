//! The single channel for non-fatal problems that are not validation failures.
//!
//! Validation failures live in the form's error mapping and are shown inline.
//! Everything else (a schema that breaks the flat-namespace rule, a field type
//! nobody renders, a pattern that does not compile, an upload that did not
//! produce a reference) is reported as a [`Diagnostic`]. The engine logs each
//! one through the `log` facade; front ends may additionally surface them.

use std::collections::HashSet;

use log::warn;
use regex::Regex;
use thiserror::Error;

use crate::model::field::{FieldDescriptor, FieldKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Two value-holding fields share a name, so they share one state slot.
    #[error("duplicate field name `{0}`: fields share one state entry")]
    DuplicateName(String),
    /// The field's type tag is not in the registry; it renders nothing.
    #[error("field `{name}` has unknown type `{kind}` and will not be rendered")]
    UnknownFieldType { name: String, kind: String },
    /// The validator pattern does not compile; the field always fails.
    #[error("field `{name}` has an invalid validator pattern `{pattern}`: {reason}")]
    MalformedValidator {
        name: String,
        pattern: String,
        reason: String,
    },
    /// An upload ended without a stored reference; the value is unchanged.
    #[error("upload for field `{name}` failed: {reason}")]
    UploadFailed { name: String, reason: String },
    /// The form was submitted before this field's upload completed.
    #[error("field `{0}` was submitted while its upload was still in flight")]
    SubmittedWithPendingUpload(String),
}

impl Diagnostic {
    /// Name of the field the diagnostic is about.
    pub fn field(&self) -> &str {
        match self {
            Diagnostic::DuplicateName(name)
            | Diagnostic::SubmittedWithPendingUpload(name)
            | Diagnostic::UnknownFieldType { name, .. }
            | Diagnostic::MalformedValidator { name, .. }
            | Diagnostic::UploadFailed { name, .. } => name,
        }
    }

    /// Writes the diagnostic to the log.
    pub fn report(&self) {
        warn!("{}", self);
    }
}

/// Checks a schema once, before it is used, and returns every problem found.
///
/// Reports duplicate names across the flat namespace (cards included), unknown
/// field types and validator patterns that fail to compile.
pub fn audit_schema(schema: &[FieldDescriptor]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    audit_level(schema, &mut seen, &mut diagnostics);
    diagnostics
}

fn audit_level<'a>(
    fields: &'a [FieldDescriptor],
    seen: &mut HashSet<&'a str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for field in fields {
        match &field.kind {
            FieldKind::Card(children) => {
                audit_level(children, seen, diagnostics);
                continue;
            }
            FieldKind::Unknown(kind) => diagnostics.push(Diagnostic::UnknownFieldType {
                name: field.name.clone(),
                kind: kind.clone(),
            }),
            _ => {}
        }

        if !seen.insert(field.name.as_str()) {
            diagnostics.push(Diagnostic::DuplicateName(field.name.clone()));
        }

        if let Some(pattern) = &field.validator {
            if let Err(e) = Regex::new(pattern) {
                diagnostics.push(Diagnostic::MalformedValidator {
                    name: field.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}
