//! Public submission path backed by a [`KeyValueStore`].
//!
//! Each collection lives under one key as a JSON array. Reads never fail:
//! a missing or unreadable payload is an empty collection. Writes replace
//! the whole array.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::custom_solution::{
    CustomSolutionForm, CustomSolutionPatch, CustomSolutionRequest, RequestId, RequestStatus,
};
use storefront_core::template::Template;
use storefront_core::types::Timestamp;
use storefront_core::validation::ValidationResult;

use crate::error::StoreError;
use crate::local::KeyValueStore;

/// Key holding submitted custom-solution requests.
pub const CUSTOM_SOLUTIONS_KEY: &str = "customSolutions";

/// Key holding the legacy locally managed template list.
pub const TEMPLATES_KEY: &str = "templates";

/// Length of the random suffix of a local request id.
const ID_SUFFIX_LEN: usize = 9;

/// Result of a public submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Stored; carries the request as saved.
    Submitted(CustomSolutionRequest),
    /// Rejected by validation; nothing was written.
    Invalid(ValidationResult),
    /// Validation passed but the write failed.
    Failed { error: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted(_))
    }
}

// ---------------------------------------------------------------------------
// Collection helpers
// ---------------------------------------------------------------------------

fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read local collection");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable local collection");
            Vec::new()
        }
    }
}

fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    store.set_item(key, &serde_json::to_string(items)?)
}

/// `"<unix millis>-<9 base-36 chars>"`.
pub fn generate_request_id(now: Timestamp) -> RequestId {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect();
    RequestId::Local(format!("{}-{suffix}", now.timestamp_millis()))
}

// ---------------------------------------------------------------------------
// Custom solutions
// ---------------------------------------------------------------------------

pub fn get_stored_custom_solutions(store: &dyn KeyValueStore) -> Vec<CustomSolutionRequest> {
    read_collection(store, CUSTOM_SOLUTIONS_KEY)
}

/// Validate a public form and append it to the stored collection.
pub fn save_custom_solution(
    store: &dyn KeyValueStore,
    form: CustomSolutionForm,
    now: Timestamp,
) -> SubmissionOutcome {
    let submission = match form.into_submission() {
        Ok(submission) => submission,
        Err(result) => return SubmissionOutcome::Invalid(result),
    };

    let request = CustomSolutionRequest::from_submission(generate_request_id(now), submission, now);
    let mut items = get_stored_custom_solutions(store);
    items.push(request.clone());

    match write_collection(store, CUSTOM_SOLUTIONS_KEY, &items) {
        Ok(()) => {
            tracing::info!(id = %request.id, service = %request.service(), "Custom solution request stored");
            SubmissionOutcome::Submitted(request)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store custom solution request");
            SubmissionOutcome::Failed {
                error: e.user_message(),
            }
        }
    }
}

/// Apply a patch to one stored request. Returns `false` if the id is unknown.
pub fn update_stored_custom_solution(
    store: &dyn KeyValueStore,
    id: &RequestId,
    patch: &CustomSolutionPatch,
    now: Timestamp,
) -> Result<bool, StoreError> {
    let items = get_stored_custom_solutions(store);
    if !items.iter().any(|r| &r.id == id) {
        return Ok(false);
    }
    let next: Vec<CustomSolutionRequest> = items
        .iter()
        .map(|r| if &r.id == id { r.patched(patch, now) } else { r.clone() })
        .collect();
    write_collection(store, CUSTOM_SOLUTIONS_KEY, &next)?;
    Ok(true)
}

pub fn update_stored_custom_solution_status(
    store: &dyn KeyValueStore,
    id: &RequestId,
    status: RequestStatus,
    now: Timestamp,
) -> Result<bool, StoreError> {
    update_stored_custom_solution(store, id, &CustomSolutionPatch::status(status), now)
}

/// Remove one stored request. Returns `false` if the id is unknown.
pub fn delete_stored_custom_solution(
    store: &dyn KeyValueStore,
    id: &RequestId,
) -> Result<bool, StoreError> {
    let mut items = get_stored_custom_solutions(store);
    let before = items.len();
    items.retain(|r| &r.id != id);
    if items.len() == before {
        return Ok(false);
    }
    write_collection(store, CUSTOM_SOLUTIONS_KEY, &items)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Legacy templates
// ---------------------------------------------------------------------------

pub fn get_stored_templates(store: &dyn KeyValueStore) -> Vec<Template> {
    read_collection(store, TEMPLATES_KEY)
}

pub fn save_stored_templates(
    store: &dyn KeyValueStore,
    templates: &[Template],
) -> Result<(), StoreError> {
    write_collection(store, TEMPLATES_KEY, templates)
}
