//! Submission controller: the single owner of a form instance's state.
//!
//! The host feeds discrete events into a [`FormController`] (value changes,
//! upload start and completion, submit, the success timer firing) and each one
//! completes before the next. Submission validates everything, then either
//! publishes the fresh error mapping or hands the values to the caller,
//! resets the form and shows the success signal.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::engine::diagnostics::{Diagnostic, audit_schema};
use crate::engine::render::{FieldView, plan_form};
use crate::engine::state::FormState;
use crate::engine::upload::UploadOutcome;
use crate::engine::validation::validate_form;
use crate::model::field::FieldDescriptor;
use crate::model::value::{FieldErrors, FieldValue, FormValues};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// How long the success message stays visible, in milliseconds.
pub const SUCCESS_DISPLAY_MS: u32 = 3000;

/// Transient confirmation shown after a successful submission.
///
/// Each [`SuccessSignal::show`] hands out a new token; only the timer holding
/// the latest token may clear the message, so a resubmission restarts the
/// display window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessSignal {
    message: Option<String>,
    generation: u64,
}

impl SuccessSignal {
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.message = Some(SUCCESS_MESSAGE.to_string());
        self.generation
    }

    /// Clears the message if `token` belongs to the latest `show`.
    pub fn expire(&mut self, token: u64) -> bool {
        if token != self.generation || self.message.is_none() {
            return false;
        }
        self.message = None;
        true
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; these errors are now published.
    Rejected { errors: FieldErrors },
    /// Values were handed over and the form was reset. `token` must be passed
    /// to [`FormController::expire_success`] when the display window ends.
    /// `diagnostics` names every field whose upload was still in flight.
    Accepted {
        token: u64,
        diagnostics: Vec<Diagnostic>,
    },
}

pub struct FormController {
    schema: Vec<FieldDescriptor>,
    state: FormState,
    success: SuccessSignal,
    schema_diagnostics: Vec<Diagnostic>,
    /// Field name to the token of its latest upload still in flight.
    pending_uploads: BTreeMap<String, u64>,
    upload_seq: u64,
}

impl FormController {
    /// Mounts a form for `schema`. Schema problems are logged, never fatal.
    pub fn new(schema: Vec<FieldDescriptor>) -> Self {
        let schema_diagnostics = audit_schema(&schema);
        for diagnostic in &schema_diagnostics {
            diagnostic.report();
        }
        let state = FormState::new(&schema);
        Self {
            schema,
            state,
            success: SuccessSignal::default(),
            schema_diagnostics,
            pending_uploads: BTreeMap::new(),
            upload_seq: 0,
        }
    }

    pub fn schema(&self) -> &[FieldDescriptor] {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Problems found in the schema when the form was mounted.
    pub fn schema_diagnostics(&self) -> &[Diagnostic] {
        &self.schema_diagnostics
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.message()
    }

    pub fn is_uploading(&self, name: &str) -> bool {
        self.pending_uploads.contains_key(name)
    }

    /// Records a user change. Validation waits for the next submit.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.state.set(name, value);
    }

    /// Marks an upload for `name` as in flight and returns its token. A newer
    /// upload for the same field supersedes any earlier one.
    pub fn begin_upload(&mut self, name: &str) -> u64 {
        self.upload_seq += 1;
        self.pending_uploads.insert(name.to_string(), self.upload_seq);
        self.upload_seq
    }

    /// Applies a finished upload started under `token`. Outcomes of superseded
    /// uploads are dropped. A failure leaves the value as it was and comes
    /// back as a diagnostic for the caller to surface.
    pub fn finish_upload(&mut self, token: u64, outcome: UploadOutcome) -> Option<Diagnostic> {
        let field = match &outcome {
            UploadOutcome::Skipped => return None,
            UploadOutcome::Committed { field, .. } | UploadOutcome::Failed { field, .. } => field,
        };
        if self.pending_uploads.get(field) != Some(&token) {
            debug!("discarding superseded upload {} for {}", token, field);
            return None;
        }
        self.pending_uploads.remove(field);

        match outcome {
            UploadOutcome::Skipped => None,
            UploadOutcome::Committed { field, reference } => {
                debug!("stored upload reference {} for {}", reference, field);
                self.state.set(&field, FieldValue::Text(reference));
                None
            }
            UploadOutcome::Failed { field, error } => {
                let diagnostic = Diagnostic::UploadFailed {
                    name: field,
                    reason: error.to_string(),
                };
                diagnostic.report();
                Some(diagnostic)
            }
        }
    }

    /// Validates the whole form and, when it passes, calls `on_submit` with the
    /// current values before resetting the form.
    ///
    /// Uploads still in flight are not awaited; their fields submit whatever
    /// was last committed and each one is returned as a diagnostic.
    pub fn submit<F: FnOnce(FormValues)>(&mut self, on_submit: F) -> SubmitOutcome {
        let errors = validate_form(&self.schema, self.state.values());
        if !errors.is_empty() {
            debug!("submission blocked by {} field error(s)", errors.len());
            self.state.replace_errors(errors.clone());
            return SubmitOutcome::Rejected { errors };
        }

        let diagnostics: Vec<Diagnostic> = self
            .pending_uploads
            .keys()
            .map(|name| Diagnostic::SubmittedWithPendingUpload(name.clone()))
            .collect();
        for diagnostic in &diagnostics {
            diagnostic.report();
        }

        self.state.clear_errors();
        on_submit(self.state.values().clone());
        self.state.reset(&self.schema);
        let token = self.success.show();
        info!("form submitted");
        SubmitOutcome::Accepted { token, diagnostics }
    }

    pub fn expire_success(&mut self, token: u64) -> bool {
        self.success.expire(token)
    }

    pub fn plan(&self, upload_base: &str) -> Vec<FieldView> {
        plan_form(&self.schema, &self.state, upload_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::upload::UploadError;
    use crate::engine::validation::REQUIRED_MESSAGE;
    use crate::model::field::{FieldKind, SelectOption, parse_schema};

    fn username_form() -> FormController {
        FormController::new(vec![
            FieldDescriptor::new("username", FieldKind::Text).required(),
        ])
    }

    #[test]
    fn test_required_empty_blocks_submission() {
        let mut form = username_form();
        let mut calls = 0;

        let outcome = form.submit(|_| calls += 1);

        let mut expected = FieldErrors::new();
        expected.insert("username".to_string(), REQUIRED_MESSAGE.to_string());
        assert_eq!(outcome, SubmitOutcome::Rejected { errors: expected.clone() });
        assert_eq!(form.state().errors(), &expected);
        assert_eq!(calls, 0);
        assert_eq!(form.success_message(), None);
    }

    #[test]
    fn test_valid_submission_hands_over_values_and_resets() {
        let mut form = username_form();
        form.set("username", FieldValue::from("alice"));
        let mut submitted = Vec::new();

        let outcome = form.submit(|values| submitted.push(values));

        let SubmitOutcome::Accepted { token, diagnostics } = outcome else {
            panic!("expected submission to be accepted");
        };
        assert!(diagnostics.is_empty());
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0]["username"], FieldValue::from("alice"));
        assert_eq!(form.state().value("username"), Some(&FieldValue::empty_text()));
        assert!(form.state().errors().is_empty());
        assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));

        assert!(form.expire_success(token));
        assert_eq!(form.success_message(), None);
    }

    #[test]
    fn test_fixed_field_clears_previous_error() {
        let mut form = FormController::new(vec![
            FieldDescriptor::new("username", FieldKind::Text).required(),
            FieldDescriptor::new("email", FieldKind::Email)
                .required()
                .with_validator("@"),
        ]);
        form.set("email", FieldValue::from("bad"));
        form.submit(|_| {});
        assert_eq!(form.state().errors().len(), 2);

        form.set("email", FieldValue::from("a@b.c"));
        let outcome = form.submit(|_| {});

        let SubmitOutcome::Rejected { errors } = outcome else {
            panic!("username is still empty");
        };
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["username"]);
        assert_eq!(form.state().error("email"), None);
    }

    #[test]
    fn test_resubmission_rearms_success_window() {
        let mut form = username_form();
        form.set("username", FieldValue::from("alice"));
        let SubmitOutcome::Accepted { token: first, .. } = form.submit(|_| {}) else {
            panic!("first submission rejected");
        };
        form.set("username", FieldValue::from("bob"));
        let SubmitOutcome::Accepted { token: second, .. } = form.submit(|_| {}) else {
            panic!("second submission rejected");
        };

        assert!(!form.expire_success(first));
        assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));
        assert!(form.expire_success(second));
        assert_eq!(form.success_message(), None);
    }

    #[test]
    fn test_empty_optional_multiselect_submits_empty_list() {
        let mut form = FormController::new(vec![FieldDescriptor::new(
            "tags",
            FieldKind::MultiSelect(vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")]),
        )]);
        let mut submitted = None;

        form.submit(|values| submitted = Some(values));

        let values = submitted.expect("submission should be accepted");
        assert_eq!(values["tags"], FieldValue::empty_list());
    }

    #[test]
    fn test_card_with_one_empty_child_reports_that_child_only() {
        let schema = parse_schema(
            r#"[{"name": "contact", "title": "Contact", "type": "card", "data": [
                {"name": "phone", "title": "Phone", "type": "text", "required": true},
                {"name": "mobile", "title": "Mobile", "type": "text", "required": true}
            ]}]"#,
        )
        .unwrap();
        let mut form = FormController::new(schema);
        form.set("phone", FieldValue::from("555-0100"));
        let mut calls = 0;

        let outcome = form.submit(|_| calls += 1);

        let SubmitOutcome::Rejected { errors } = outcome else {
            panic!("mobile is empty");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("mobile"));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_upload_commit_and_failure() {
        let mut form = FormController::new(vec![FieldDescriptor::new("avatar", FieldKind::File)]);

        let token = form.begin_upload("avatar");
        assert!(form.is_uploading("avatar"));
        let diagnostic = form.finish_upload(token, UploadOutcome::Committed {
            field: "avatar".to_string(),
            reference: "uploads/x.png".to_string(),
        });
        assert_eq!(diagnostic, None);
        assert!(!form.is_uploading("avatar"));
        assert_eq!(form.state().value("avatar"), Some(&FieldValue::from("uploads/x.png")));

        let token = form.begin_upload("avatar");
        let diagnostic = form.finish_upload(token, UploadOutcome::Failed {
            field: "avatar".to_string(),
            error: UploadError::Rejected,
        });
        assert!(matches!(diagnostic, Some(Diagnostic::UploadFailed { ref name, .. }) if name == "avatar"));
        assert_eq!(form.state().value("avatar"), Some(&FieldValue::from("uploads/x.png")));
        assert!(form.state().errors().is_empty());
    }

    #[test]
    fn test_submit_does_not_wait_for_pending_upload() {
        let mut form = FormController::new(vec![FieldDescriptor::new("avatar", FieldKind::File)]);
        form.begin_upload("avatar");
        let mut submitted = None;

        let outcome = form.submit(|values| submitted = Some(values));

        assert_eq!(submitted.unwrap()["avatar"], FieldValue::empty_text());
        let SubmitOutcome::Accepted { diagnostics, .. } = outcome else {
            panic!("expected submission to be accepted");
        };
        assert_eq!(
            diagnostics,
            vec![Diagnostic::SubmittedWithPendingUpload("avatar".to_string())]
        );
    }

    #[test]
    fn test_reselecting_a_file_supersedes_the_upload_in_flight() {
        let mut form = FormController::new(vec![FieldDescriptor::new("avatar", FieldKind::File)]);
        let first = form.begin_upload("avatar");
        let second = form.begin_upload("avatar");

        let diagnostic = form.finish_upload(second, UploadOutcome::Committed {
            field: "avatar".to_string(),
            reference: "uploads/second.png".to_string(),
        });
        assert_eq!(diagnostic, None);
        assert!(!form.is_uploading("avatar"));

        let diagnostic = form.finish_upload(first, UploadOutcome::Committed {
            field: "avatar".to_string(),
            reference: "uploads/first.png".to_string(),
        });
        assert_eq!(diagnostic, None);
        assert_eq!(
            form.state().value("avatar"),
            Some(&FieldValue::from("uploads/second.png"))
        );
    }

    #[test]
    fn test_earlier_upload_finishing_first_keeps_field_uploading() {
        let mut form = FormController::new(vec![FieldDescriptor::new("avatar", FieldKind::File)]);
        let first = form.begin_upload("avatar");
        let second = form.begin_upload("avatar");

        let diagnostic = form.finish_upload(first, UploadOutcome::Failed {
            field: "avatar".to_string(),
            error: UploadError::Rejected,
        });
        assert_eq!(diagnostic, None);
        assert!(form.is_uploading("avatar"));

        let SubmitOutcome::Accepted { diagnostics, .. } = form.submit(|_| {}) else {
            panic!("expected submission to be accepted");
        };
        assert_eq!(diagnostics.len(), 1);

        form.finish_upload(second, UploadOutcome::Committed {
            field: "avatar".to_string(),
            reference: "uploads/second.png".to_string(),
        });
        assert!(!form.is_uploading("avatar"));
    }

    #[test]
    fn test_schema_diagnostics_are_kept_from_mount() {
        let form = FormController::new(vec![
            FieldDescriptor::new("city", FieldKind::Text),
            FieldDescriptor::new("city", FieldKind::Text),
        ]);
        assert_eq!(
            form.schema_diagnostics(),
            &[Diagnostic::DuplicateName("city".to_string())]
        );
    }
}
