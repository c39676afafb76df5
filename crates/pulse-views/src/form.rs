//! Update Form state machine.
//!
//! Synchronous and side-effect free: the async driver in
//! [`update_form`](crate::update_form) performs the mutation and runs the
//! success-message timer, feeding results back through
//! [`FormState::complete`] and [`FormState::clear_success`].
//!
//! ```text
//!            submit() ok                    complete(Ok)
//!   Idle ─────────────────▶ Submitting ─────────────────▶ Idle + Success
//!    ▲  │ submit() invalid                │ complete(Err)
//!    │  └──▶ Idle + Error                 └──────────────▶ Idle + Error
//!    └── clear_success() (timer) ◀── Idle + Success
//! ```

use pulse_core::entities::Record;
use pulse_core::ids::RecordId;
use pulse_core::patch::RecordPatch;
use pulse_core::snapshot::{LoadState, Snapshot};
use serde::Serialize;
use thiserror::Error;

use crate::LOADING_MESSAGE;

/// Empty-state wording of the Update Form.
pub const EMPTY_MESSAGE: &str = "No records available to update.";

pub const SUCCESS_MESSAGE: &str =
    "Record updated successfully! Changes will appear in real time on the view page.";

pub const FAILURE_PREFIX: &str = "Failed to update record: ";

/// Client-side rejections, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a record to update.")]
    NoSelection,
    #[error("Name cannot be empty.")]
    EmptyName,
    #[error("Value must be a valid number.")]
    InvalidValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    #[default]
    Idle,
    Submitting,
}

/// Inline feedback shown under the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Message {
    Success(String),
    Error(String),
}

impl Message {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Result of asking the form to submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed; the caller must run the mutation and report back.
    Started(RecordPatch),
    /// Validation failed; the error message is already set.
    Rejected(ValidationError),
    /// A submission is already in flight; nothing changed.
    Busy,
}

/// Parse an edited value. Blank and non-finite input is rejected.
#[must_use]
pub fn parse_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One entry of the record selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: RecordId,
    pub label: String,
}

impl From<&Record> for SelectOption {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            label: format!("{} ({})", record.name, record.value_text()),
        }
    }
}

/// What the form's selector area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectorState {
    Loading { message: &'static str },
    Empty { message: &'static str },
    Ready { options: Vec<SelectOption> },
}

/// Everything needed to render the form at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub selector: SelectorState,
    pub selected_id: Option<RecordId>,
    /// The selected record is no longer in the latest delivery.
    pub selection_stale: bool,
    pub name: String,
    pub value: String,
    pub submission: Submission,
    pub selector_enabled: bool,
    pub inputs_enabled: bool,
    pub submit_enabled: bool,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    records: Snapshot,
    selected_id: Option<RecordId>,
    name_draft: String,
    value_draft: String,
    submission: Submission,
    message: Option<Message>,
}

impl FormState {
    #[must_use]
    pub fn new(records: Snapshot) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Refresh the selector's source list. Drafts and selection are left alone.
    pub fn apply_snapshot(&mut self, records: Snapshot) {
        self.records = records;
    }

    /// Select a record from the current delivery and load its fields.
    ///
    /// Returns `false` (and changes nothing) while submitting, while the feed
    /// is pending or empty, or when `id` is not in the current delivery.
    pub fn select(&mut self, id: &RecordId) -> bool {
        if self.is_submitting() {
            return false;
        }
        let Some(record) = self.records.find(id) else {
            return false;
        };
        self.name_draft.clone_from(&record.name);
        self.value_draft = record.value_text();
        self.selected_id = Some(record.id.clone());
        self.message = None;
        true
    }

    /// Returns `false` when the name field is disabled.
    pub fn edit_name(&mut self, text: impl Into<String>) -> bool {
        if !self.inputs_enabled() {
            return false;
        }
        self.name_draft = text.into();
        true
    }

    /// Returns `false` when the value field is disabled.
    pub fn edit_value(&mut self, text: impl Into<String>) -> bool {
        if !self.inputs_enabled() {
            return false;
        }
        self.value_draft = text.into();
        true
    }

    /// Validate the drafts and, if they pass, enter `Submitting`.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Busy;
        }
        match self.validate() {
            Ok(patch) => {
                self.submission = Submission::Submitting;
                self.message = None;
                SubmitOutcome::Started(patch)
            }
            Err(error) => {
                self.message = Some(Message::Error(error.to_string()));
                SubmitOutcome::Rejected(error)
            }
        }
    }

    fn validate(&self) -> Result<RecordPatch, ValidationError> {
        let id = self.selected_id.clone().ok_or(ValidationError::NoSelection)?;
        let name = self.name_draft.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let value = parse_value(&self.value_draft).ok_or(ValidationError::InvalidValue)?;
        Ok(RecordPatch::new(id, name, value))
    }

    /// Settle the in-flight submission. Ignored when nothing is in flight.
    ///
    /// Returns `true` if the outcome was applied.
    pub fn complete(&mut self, result: Result<RecordId, String>) -> bool {
        if !self.is_submitting() {
            return false;
        }
        self.submission = Submission::Idle;
        self.message = Some(match result {
            Ok(_) => Message::Success(SUCCESS_MESSAGE.to_string()),
            Err(reason) => Message::Error(format!("{FAILURE_PREFIX}{reason}")),
        });
        true
    }

    /// Drop a success message. Error messages stay until replaced.
    pub fn clear_success(&mut self) -> bool {
        if matches!(self.message, Some(Message::Success(_))) {
            self.message = None;
            return true;
        }
        false
    }

    #[must_use]
    pub const fn submission(&self) -> Submission {
        self.submission
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.submission, Submission::Submitting)
    }

    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn selected_id(&self) -> Option<&RecordId> {
        self.selected_id.as_ref()
    }

    #[must_use]
    pub fn name_draft(&self) -> &str {
        &self.name_draft
    }

    #[must_use]
    pub fn value_draft(&self) -> &str {
        &self.value_draft
    }

    #[must_use]
    pub const fn records(&self) -> &Snapshot {
        &self.records
    }

    fn inputs_enabled(&self) -> bool {
        self.selected_id.is_some() && !self.is_submitting()
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        let selector = match self.records.load_state() {
            LoadState::Loading => SelectorState::Loading {
                message: LOADING_MESSAGE,
            },
            LoadState::Empty => SelectorState::Empty {
                message: EMPTY_MESSAGE,
            },
            LoadState::Populated(records) => SelectorState::Ready {
                options: records.iter().map(SelectOption::from).collect(),
            },
        };
        let selector_ready = matches!(selector, SelectorState::Ready { .. });
        let selection_stale = self
            .selected_id
            .as_ref()
            .is_some_and(|id| self.records.find(id).is_none());
        let inputs_enabled = self.inputs_enabled();

        FormView {
            selector,
            selected_id: self.selected_id.clone(),
            selection_stale,
            name: self.name_draft.clone(),
            value: self.value_draft.clone(),
            submission: self.submission,
            selector_enabled: selector_ready && !self.is_submitting(),
            inputs_enabled,
            submit_enabled: inputs_enabled,
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn record(id: &str, name: &str, value: f64) -> Record {
        Record {
            id: RecordId::from(id),
            name: name.into(),
            value,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn loaded() -> FormState {
        FormState::new(Snapshot::from(vec![
            record("abc123", "Alpha", 100.0),
            record("def456", "Beta", 2.5),
        ]))
    }

    #[rstest]
    #[case("250", Some(250.0))]
    #[case(" 2.5 ", Some(2.5))]
    #[case("-7", Some(-7.0))]
    #[case("1e3", Some(1000.0))]
    #[case("abc", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("12abc", None)]
    fn parse_value_cases(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_value(input), expected);
    }

    #[test]
    fn initial_state_is_blank_and_idle() {
        let form = FormState::default();
        assert!(form.selected_id().is_none());
        assert_eq!(form.name_draft(), "");
        assert_eq!(form.value_draft(), "");
        assert_eq!(form.submission(), Submission::Idle);
        assert!(form.message().is_none());
    }

    #[test]
    fn select_loads_exact_fields_and_clears_message() {
        let mut form = loaded();
        form.submit();
        assert!(form.message().is_some());

        assert!(form.select(&RecordId::from("abc123")));
        assert_eq!(form.name_draft(), "Alpha");
        assert_eq!(form.value_draft(), "100");
        assert!(form.message().is_none());

        assert!(form.select(&RecordId::from("def456")));
        assert_eq!(form.name_draft(), "Beta");
        assert_eq!(form.value_draft(), "2.5");
    }

    #[test]
    fn select_is_unavailable_while_pending_or_empty() {
        let mut pending = FormState::new(Snapshot::Pending);
        assert!(!pending.select(&RecordId::from("abc123")));

        let mut empty = FormState::new(Snapshot::Available(Vec::new()));
        assert!(!empty.select(&RecordId::from("abc123")));
        assert!(empty.selected_id().is_none());
    }

    #[test]
    fn select_unknown_id_changes_nothing() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.edit_name("draft");

        assert!(!form.select(&RecordId::from("nope")));
        assert_eq!(form.selected_id().map(RecordId::as_str), Some("abc123"));
        assert_eq!(form.name_draft(), "draft");
    }

    #[test]
    fn edits_require_a_selection() {
        let mut form = loaded();
        assert!(!form.edit_name("x"));
        assert!(!form.edit_value("1"));
        assert_eq!(form.name_draft(), "");

        form.select(&RecordId::from("abc123"));
        assert!(form.edit_name("   "));
        assert!(form.edit_value("abc"));
        assert_eq!(form.name_draft(), "   ");
        assert_eq!(form.value_draft(), "abc");
        assert!(form.message().is_none(), "edits never validate");
    }

    #[rstest]
    #[case(None, "Name", "1", ValidationError::NoSelection)]
    #[case(Some("abc123"), "   ", "1", ValidationError::EmptyName)]
    #[case(Some("abc123"), "Name", "abc", ValidationError::InvalidValue)]
    #[case(Some("abc123"), "", "abc", ValidationError::EmptyName)]
    fn validation_order_and_messages(
        #[case] selection: Option<&str>,
        #[case] name: &str,
        #[case] value: &str,
        #[case] expected: ValidationError,
    ) {
        let mut form = loaded();
        if let Some(id) = selection {
            form.select(&RecordId::from(id));
            form.edit_name(name);
            form.edit_value(value);
        }

        assert_eq!(form.submit(), SubmitOutcome::Rejected(expected));
        assert_eq!(form.submission(), Submission::Idle);
        assert_eq!(form.message(), Some(&Message::Error(expected.to_string())));
    }

    #[test]
    fn validation_messages_are_exact() {
        assert_eq!(
            ValidationError::NoSelection.to_string(),
            "Please select a record to update."
        );
        assert_eq!(ValidationError::EmptyName.to_string(), "Name cannot be empty.");
        assert_eq!(
            ValidationError::InvalidValue.to_string(),
            "Value must be a valid number."
        );
    }

    #[test]
    fn rejected_submit_keeps_drafts() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.edit_value("abc");
        form.submit();
        assert_eq!(form.name_draft(), "Alpha");
        assert_eq!(form.value_draft(), "abc");
        assert_eq!(form.selected_id().map(RecordId::as_str), Some("abc123"));
    }

    #[test]
    fn valid_submit_trims_name_and_parses_value() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.edit_name("  Updated Name  ");
        form.edit_value("250");

        assert_eq!(
            form.submit(),
            SubmitOutcome::Started(RecordPatch::new(
                RecordId::from("abc123"),
                "Updated Name",
                250.0
            ))
        );
        assert_eq!(form.submission(), Submission::Submitting);
        assert!(form.message().is_none());
    }

    #[test]
    fn submitting_disables_everything_and_blocks_changes() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.submit();

        let view = form.view();
        assert!(!view.selector_enabled);
        assert!(!view.inputs_enabled);
        assert!(!view.submit_enabled);

        assert_eq!(form.submit(), SubmitOutcome::Busy);
        assert!(!form.edit_name("other"));
        assert!(!form.select(&RecordId::from("def456")));
        assert_eq!(form.name_draft(), "Alpha");
    }

    #[test]
    fn completion_success_sets_message_and_idles() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.submit();

        assert!(form.complete(Ok(RecordId::from("abc123"))));
        assert_eq!(form.submission(), Submission::Idle);
        assert_eq!(
            form.message(),
            Some(&Message::Success(SUCCESS_MESSAGE.to_string()))
        );
        assert!(form.view().inputs_enabled);
    }

    #[test]
    fn completion_failure_wraps_reason() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.submit();

        form.complete(Err("Network error".into()));
        assert_eq!(form.submission(), Submission::Idle);
        assert_eq!(
            form.message().map(Message::text),
            Some("Failed to update record: Network error")
        );
    }

    #[test]
    fn completion_without_submission_is_ignored() {
        let mut form = loaded();
        assert!(!form.complete(Ok(RecordId::from("abc123"))));
        assert!(form.message().is_none());
    }

    #[test]
    fn clear_success_leaves_errors() {
        let mut form = loaded();
        form.submit();
        assert!(!form.clear_success());
        assert!(form.message().is_some_and(Message::is_error));

        form.select(&RecordId::from("abc123"));
        form.submit();
        form.complete(Ok(RecordId::from("abc123")));
        assert!(form.clear_success());
        assert!(form.message().is_none());
    }

    #[test]
    fn snapshot_refresh_never_overwrites_drafts() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.edit_name("my draft");

        form.apply_snapshot(Snapshot::from(vec![
            record("abc123", "Changed Elsewhere", 999.0),
            record("def456", "Beta", 2.5),
        ]));

        assert_eq!(form.name_draft(), "my draft");
        assert_eq!(form.value_draft(), "100");
        let view = form.view();
        let SelectorState::Ready { options } = view.selector else {
            panic!("expected options");
        };
        assert_eq!(options[0].label, "Changed Elsewhere (999)");
        assert!(!view.selection_stale);
    }

    #[test]
    fn removed_selection_is_flagged_stale_but_kept() {
        let mut form = loaded();
        form.select(&RecordId::from("abc123"));
        form.apply_snapshot(Snapshot::from(vec![record("def456", "Beta", 2.5)]));

        let view = form.view();
        assert!(view.selection_stale);
        assert_eq!(view.selected_id.as_ref().map(RecordId::as_str), Some("abc123"));
        assert!(view.inputs_enabled);
    }

    #[test]
    fn pending_and_empty_views_are_distinct() {
        let pending = FormState::new(Snapshot::Pending).view();
        assert_eq!(
            pending.selector,
            SelectorState::Loading {
                message: LOADING_MESSAGE
            }
        );
        assert!(!pending.selector_enabled);

        let empty = FormState::new(Snapshot::Available(Vec::new())).view();
        assert_eq!(
            empty.selector,
            SelectorState::Empty {
                message: EMPTY_MESSAGE
            }
        );
        assert!(!empty.selector_enabled);
        assert!(!empty.inputs_enabled);
        assert!(!empty.submit_enabled);
    }

    #[test]
    fn nothing_selected_disables_inputs_only() {
        let view = loaded().view();
        assert!(view.selector_enabled);
        assert!(!view.inputs_enabled);
        assert!(!view.submit_enabled);
    }
}
