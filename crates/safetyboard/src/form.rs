//! Incident submission form.
//!
//! The form holds the three input fields, validates them on submit, and
//! either records per-field errors or commits a new incident to the store.
//! A successful submit raises a success notice tagged with its
//! [`SubmissionId`]; only an expiry carrying that same id can clear it, so a
//! late timer from an earlier submit never touches newer state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::incident::{IncidentDraft, IncidentId, Severity};
use crate::store::IncidentStore;

/// A form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Incident title.
    Title,
    /// Incident description.
    Description,
    /// Severity selection.
    Severity,
}

impl Field {
    /// Form label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Incident Title",
            Self::Description => "Description",
            Self::Severity => "Severity Level",
        }
    }

    /// Message shown when the field is missing.
    #[must_use]
    pub fn required_message(self) -> &'static str {
        match self {
            Self::Title => "Title is required",
            Self::Description => "Description is required",
            Self::Severity => "Severity level is required",
        }
    }
}

/// Identity of one successful submission within a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Accepting input, nothing to report.
    Editing,
    /// The last submit failed validation.
    Invalid,
    /// The last submit succeeded and its notice is still showing.
    Succeeded(SubmissionId),
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the store was not touched.
    Invalid(FieldErrors),
    /// The incident was added.
    Submitted {
        /// Id assigned by the store.
        id: IncidentId,
        /// Identity to use when expiring the success notice.
        submission: SubmissionId,
    },
}

/// Field errors keyed by field.
pub type FieldErrors = BTreeMap<Field, &'static str>;

/// The incident submission form.
#[derive(Debug, Clone, Default)]
pub struct IncidentForm {
    title: String,
    description: String,
    severity: Option<Severity>,
    errors: FieldErrors,
    success: Option<SubmissionId>,
    submissions: u64,
}

impl IncidentForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title input.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current description input.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current severity selection.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Replace the title input.
    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
    }

    /// Replace the description input.
    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    /// Select a severity.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = Some(severity);
    }

    /// Errors from the last submit attempt.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The error for one field, if any.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Whether the success notice is showing.
    #[must_use]
    pub fn show_success(&self) -> bool {
        self.success.is_some()
    }

    /// The form's current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        if !self.errors.is_empty() {
            FormState::Invalid
        } else if let Some(submission) = self.success {
            FormState::Succeeded(submission)
        } else {
            FormState::Editing
        }
    }

    /// Check every field. Blank means empty after trimming whitespace.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, Field::Title.required_message());
        }
        if self.description.trim().is_empty() {
            errors.insert(Field::Description, Field::Description.required_message());
        }
        if self.severity.is_none() {
            errors.insert(Field::Severity, Field::Severity.required_message());
        }
        errors
    }

    /// Submit the form, reporting the incident as of now.
    pub fn submit(&mut self, store: &mut IncidentStore) -> SubmitOutcome {
        self.submit_at(store, Utc::now())
    }

    /// Submit the form with an explicit report time.
    ///
    /// On failure the errors are recorded, any success notice is hidden, and
    /// the store is left alone. On success the errors are cleared, the
    /// incident is added, every field is reset, and a new success notice is
    /// raised.
    pub fn submit_at(&mut self, store: &mut IncidentStore, now: DateTime<Utc>) -> SubmitOutcome {
        let errors = self.validate();
        let severity = match self.severity {
            Some(severity) if errors.is_empty() => severity,
            _ => {
                debug!(fields = errors.len(), "Incident form failed validation");
                self.errors.clone_from(&errors);
                self.success = None;
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.errors.clear();
        let draft = IncidentDraft {
            title: std::mem::take(&mut self.title),
            description: std::mem::take(&mut self.description),
            severity,
        };
        self.severity = None;

        let id = store.add_incident_at(draft, now);
        self.submissions += 1;
        let submission = SubmissionId(self.submissions);
        self.success = Some(submission);
        debug!(id = %id, submission = submission.0, "Incident form submitted");

        SubmitOutcome::Submitted { id, submission }
    }

    /// Hide the success notice raised by `submission`.
    ///
    /// Returns `false` and changes nothing if a different (or no) notice is
    /// showing.
    pub fn expire_success(&mut self, submission: SubmissionId) -> bool {
        if self.success == Some(submission) {
            self.success = None;
            true
        } else {
            debug!(submission = submission.0, "Ignoring stale success expiry");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_form() -> IncidentForm {
        let mut form = IncidentForm::new();
        form.set_title("Test A");
        form.set_description("Desc A");
        form.set_severity(Severity::Low);
        form
    }

    #[test]
    fn test_new_form_is_editing() {
        let form = IncidentForm::new();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.errors().is_empty());
        assert!(!form.show_success());
    }

    #[test]
    fn test_submit_empty_form() {
        let mut store = IncidentStore::with_builtin_seed();
        let mut form = IncidentForm::new();

        let outcome = form.submit(&mut store);

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[&Field::Title], "Title is required");
        assert_eq!(errors[&Field::Description], "Description is required");
        assert_eq!(errors[&Field::Severity], "Severity level is required");
        assert_eq!(store.len(), 5);
        assert_eq!(form.state(), FormState::Invalid);
    }

    #[test]
    fn test_whitespace_only_fields_are_blank() {
        let mut store = IncidentStore::with_builtin_seed();
        let mut form = filled_form();
        form.set_title("   ");
        form.set_description("\t\n ");

        let outcome = form.submit(&mut store);

        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.len() == 2));
        assert_eq!(form.error(Field::Title), Some("Title is required"));
        assert_eq!(form.error(Field::Description), Some("Description is required"));
        assert_eq!(form.error(Field::Severity), None);
        assert_eq!(store.len(), 5);
        // Inputs are kept for correction
        assert_eq!(form.title(), "   ");
    }

    #[test]
    fn test_missing_severity_only() {
        let mut store = IncidentStore::new();
        let mut form = IncidentForm::new();
        form.set_title("t");
        form.set_description("d");

        let outcome = form.submit(&mut store);

        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.len() == 1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_valid_submit() {
        let mut store = IncidentStore::with_builtin_seed();
        let mut form = filled_form();
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();

        let outcome = form.submit_at(&mut store, now);

        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                id: IncidentId(6),
                submission: SubmissionId(1)
            }
        );
        assert_eq!(store.len(), 6);
        let added = &store.incidents()[0];
        assert_eq!(added.title, "Test A");
        assert_eq!(added.description, "Desc A");
        assert_eq!(added.severity, Severity::Low);
        assert_eq!(added.reported_at, now);

        assert_eq!(form.title(), "");
        assert_eq!(form.description(), "");
        assert_eq!(form.severity(), None);
        assert!(form.errors().is_empty());
        assert!(form.show_success());
        assert_eq!(form.state(), FormState::Succeeded(SubmissionId(1)));
    }

    #[test]
    fn test_failed_submit_hides_success() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        form.submit(&mut store);
        assert!(form.show_success());

        form.submit(&mut store);
        assert!(!form.show_success());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_valid_submit_clears_previous_errors() {
        let mut store = IncidentStore::new();
        let mut form = IncidentForm::new();
        form.submit(&mut store);
        assert_eq!(form.errors().len(), 3);

        form.set_title("t");
        form.set_description("d");
        form.set_severity(Severity::High);
        form.submit(&mut store);

        assert!(form.errors().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expire_success() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        let SubmitOutcome::Submitted { submission, .. } = form.submit(&mut store) else {
            panic!("expected submit");
        };

        assert!(form.expire_success(submission));
        assert!(!form.show_success());
        assert_eq!(form.state(), FormState::Editing);
        assert!(!form.expire_success(submission));
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        let SubmitOutcome::Submitted { submission: first, .. } = form.submit(&mut store) else {
            panic!("expected submit");
        };

        form.set_title("Second");
        form.set_description("Second desc");
        form.set_severity(Severity::Medium);
        let SubmitOutcome::Submitted { submission: second, .. } = form.submit(&mut store) else {
            panic!("expected submit");
        };

        assert_ne!(first, second);
        assert!(!form.expire_success(first));
        assert!(form.show_success());
        assert!(form.expire_success(second));
    }

    #[test]
    fn test_resubmit_after_success() {
        let mut store = IncidentStore::with_builtin_seed();
        let mut form = filled_form();
        form.submit(&mut store);

        form.set_title("Again");
        form.set_description("More");
        form.set_severity(Severity::High);
        let outcome = form.submit(&mut store);

        assert!(matches!(outcome, SubmitOutcome::Submitted { id: IncidentId(7), .. }));
        assert_eq!(store.incidents()[0].title, "Again");
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(Field::Title.label(), "Incident Title");
        assert_eq!(Field::Severity.label(), "Severity Level");
    }
}
