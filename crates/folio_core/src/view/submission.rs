//! Write-only form submission model.
//!
//! # Responsibility
//! - Hold local form field values and submit them as one inserted row.
//! - Report a user-facing success/failure message per attempt.
//!
//! # Invariants
//! - Fields are cleared only after a successful insert.
//! - `submitting` is false whenever `submit` returns.
//! - Field values never leave the process except in the single insert call.

use crate::model::contact::{format_timestamp, CONTACT_FIELDS, TIME_FIELD};
use crate::model::record::Collection;
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

/// Outcome of the last submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
}

impl SubmissionResult {
    fn success() -> Self {
        Self {
            success: true,
            message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        }
    }

    fn failure() -> Self {
        Self {
            success: false,
            message: SUBMIT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Observable form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub fields: BTreeMap<String, String>,
    pub submitting: bool,
    pub result: Option<SubmissionResult>,
}

/// Submission rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Required fields are empty or whitespace-only.
    MissingFields(Vec<String>),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields(names) => {
                write!(f, "required fields are empty: {}", names.join(", "))
            }
        }
    }
}

impl Error for SubmitError {}

/// Form model inserting into one collection.
pub struct SubmissionModel<S: RecordStore> {
    store: S,
    collection: Collection,
    required: Vec<String>,
    state: SubmissionState,
}

impl<S: RecordStore> SubmissionModel<S> {
    /// Creates an idle model whose fields all start empty.
    pub fn new<I, N>(store: S, collection: impl Into<Collection>, required: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let required: Vec<String> = required.into_iter().map(Into::into).collect();
        let state = SubmissionState {
            fields: empty_fields(&required),
            ..SubmissionState::default()
        };
        Self {
            store,
            collection: collection.into(),
            required,
            state,
        }
    }

    /// Creates the contact form model (`name, number, email, type, message`).
    pub fn contact_form(store: S, collection: impl Into<Collection>) -> Self {
        Self::new(store, collection, CONTACT_FIELDS)
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.state.fields.get(name).map(String::as_str)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.submitting
    }

    /// Merges one field value into local state.
    pub fn update_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.state.fields.insert(name.into(), value.into());
    }

    /// Returns required fields that are still empty, in declaration order.
    ///
    /// Whitespace counts as a value.
    pub fn missing_fields(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| {
                self.state
                    .fields
                    .get(name.as_str())
                    .map_or(true, String::is_empty)
            })
            .cloned()
            .collect()
    }

    /// Submits the form stamped with the current UTC time.
    pub async fn submit(&mut self) -> Result<&SubmissionResult, SubmitError> {
        self.submit_at(Utc::now()).await
    }

    /// Submits the form stamped with `time`.
    ///
    /// # Errors
    /// - `MissingFields` when a required field is empty; no insert is made
    ///   and state is left untouched.
    pub async fn submit_at(
        &mut self,
        time: DateTime<Utc>,
    ) -> Result<&SubmissionResult, SubmitError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            warn!(
                "event=form_submit module=view status=rejected collection={} missing={}",
                self.collection,
                missing.join(",")
            );
            return Err(SubmitError::MissingFields(missing));
        }

        let started_at = Instant::now();
        self.state.submitting = true;
        self.state.result = None;
        info!(
            "event=form_submit module=view status=start collection={}",
            self.collection
        );

        let row = self.build_row(&time);
        let result = match self.store.insert(&self.collection, &row).await {
            Ok(()) => {
                info!(
                    "event=form_submit module=view status=ok collection={} duration_ms={}",
                    self.collection,
                    started_at.elapsed().as_millis()
                );
                self.state.fields = empty_fields(&self.required);
                SubmissionResult::success()
            }
            Err(err) => {
                error!(
                    "event=form_submit module=view status=error collection={} duration_ms={} error={}",
                    self.collection,
                    started_at.elapsed().as_millis(),
                    err
                );
                SubmissionResult::failure()
            }
        };

        self.state.submitting = false;
        let result = &*self.state.result.insert(result);
        Ok(result)
    }

    fn build_row(&self, time: &DateTime<Utc>) -> Map<String, Value> {
        let mut row: Map<String, Value> = self
            .state
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        row.insert(TIME_FIELD.to_string(), Value::String(format_timestamp(time)));
        row
    }
}

fn empty_fields(required: &[String]) -> BTreeMap<String, String> {
    required
        .iter()
        .map(|name| (name.clone(), String::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{SubmissionModel, SubmitError};
    use crate::model::record::Collection;
    use crate::store::MemoryRecordStore;

    #[test]
    fn contact_form_starts_with_empty_fields() {
        let model = SubmissionModel::contact_form(MemoryRecordStore::new(), "contact-form");
        assert_eq!(model.state().fields.len(), 5);
        assert!(model.state().fields.values().all(String::is_empty));
        assert!(model.state().result.is_none());
        assert!(model.can_submit());
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_without_insert() {
        let mut model = SubmissionModel::contact_form(MemoryRecordStore::new(), "contact-form");
        model.update_field("name", "Jane");
        model.update_field("email", "   ");

        let err = model.submit().await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::MissingFields(vec![
                "number".to_string(),
                "type".to_string(),
                "message".to_string(),
            ])
        );
        assert!(model
            .store()
            .inserted(&Collection::new("contact-form"))
            .is_empty());
        assert_eq!(model.field("name"), Some("Jane"));
        assert!(!model.state().submitting);
    }

    #[tokio::test]
    async fn whitespace_only_values_are_submitted_as_given() {
        let mut model = SubmissionModel::contact_form(MemoryRecordStore::new(), "contact-form");
        for name in ["name", "number", "email", "type", "message"] {
            model.update_field(name, "x");
        }
        model.update_field("name", " ");

        assert!(model.missing_fields().is_empty());
        assert!(model.submit().await.unwrap().success);

        let inserted = model.store().inserted(&Collection::new("contact-form"));
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0]["name"], " ");
    }

    #[test]
    fn update_field_merges_extra_names() {
        let mut model = SubmissionModel::new(MemoryRecordStore::new(), "notes", ["body"]);
        model.update_field("body", "text");
        model.update_field("extra", "kept");
        assert_eq!(model.field("body"), Some("text"));
        assert_eq!(model.field("extra"), Some("kept"));
        assert!(model.missing_fields().is_empty());
    }
}
