//! Custom-solution requests submitted from the public site.
//!
//! The service-dependent fields are a closed sum ([`ServiceDetails`]) so a
//! request can only carry the fields its service requires.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};
use crate::validation::{validate_custom_solution_request, ValidationResult};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

define_string_enum! {
    /// Kind of work requested.
    Service ("service") {
        UiUxDesign = "ui-ux-design",
        FrontendDevelopment = "frontend-development",
    }
}

define_string_enum! {
    /// Admin workflow status of a request.
    RequestStatus ("request status") {
        Pending = "pending",
        InProgress = "in-progress",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

define_string_enum! {
    /// Admin-assigned priority.
    Priority ("priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
        Urgent = "urgent",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Request identity: a server id for remote rows, or a generated
/// `"<millis>-<suffix>"` string for locally stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Server(DbId),
    Local(String),
}

impl RequestId {
    pub fn as_server(&self) -> Option<DbId> {
        match self {
            RequestId::Server(id) => Some(*id),
            RequestId::Local(_) => None,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Server(id) => write!(f, "{id}"),
            RequestId::Local(id) => f.write_str(id),
        }
    }
}

impl From<DbId> for RequestId {
    fn from(id: DbId) -> Self {
        RequestId::Server(id)
    }
}

// ---------------------------------------------------------------------------
// Service details
// ---------------------------------------------------------------------------

/// Fields that exist only for one kind of service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service")]
pub enum ServiceDetails {
    #[serde(rename = "ui-ux-design", rename_all = "camelCase")]
    UiUxDesign { design_type: String },
    #[serde(rename = "frontend-development", rename_all = "camelCase")]
    FrontendDevelopment {
        website_type: String,
        technologies: Vec<String>,
    },
}

impl ServiceDetails {
    pub fn service(&self) -> Service {
        match self {
            ServiceDetails::UiUxDesign { .. } => Service::UiUxDesign,
            ServiceDetails::FrontendDevelopment { .. } => Service::FrontendDevelopment,
        }
    }

    /// Requested technologies; empty for design work.
    pub fn technologies(&self) -> &[String] {
        match self {
            ServiceDetails::UiUxDesign { .. } => &[],
            ServiceDetails::FrontendDevelopment { technologies, .. } => technologies,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored custom-solution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSolutionRequest {
    pub id: RequestId,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub details: ServiceDetails,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CustomSolutionRequest {
    pub fn service(&self) -> Service {
        self.details.service()
    }

    /// Build a locally stored request from a validated submission.
    pub fn from_submission(id: RequestId, submission: NewCustomSolution, now: Timestamp) -> Self {
        Self {
            id,
            name: submission.name,
            email: submission.email,
            details: submission.details,
            message: submission.message,
            status: RequestStatus::Pending,
            priority: Priority::Medium,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch, refreshing `updated_at`.
    pub fn patched(&self, patch: &CustomSolutionPatch, now: Timestamp) -> Self {
        let mut next = self.clone();
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(notes) = &patch.notes {
            next.notes = Some(notes.clone());
        }
        next.updated_at = now;
        next
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// A validated submission ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomSolution {
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub details: ServiceDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Admin-side partial update. Only `Some` fields are sent to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSolutionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomSolutionPatch {
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Default::default()
        }
    }
}

/// Raw public submission form. Every conditional field is optional here;
/// [`CustomSolutionForm::into_submission`] enforces the service rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSolutionForm {
    pub name: String,
    pub email: String,
    pub service: Option<Service>,
    pub design_type: Option<String>,
    pub website_type: Option<String>,
    pub technologies: Vec<String>,
    pub message: Option<String>,
}

impl CustomSolutionForm {
    /// Validate and convert into the tagged submission shape.
    pub fn into_submission(self) -> Result<NewCustomSolution, ValidationResult> {
        let result = validate_custom_solution_request(&self);
        if !result.is_valid {
            return Err(result);
        }

        let details = match self.service {
            Some(Service::UiUxDesign) => ServiceDetails::UiUxDesign {
                design_type: self.design_type.unwrap_or_default(),
            },
            Some(Service::FrontendDevelopment) => ServiceDetails::FrontendDevelopment {
                website_type: self.website_type.unwrap_or_default(),
                technologies: self.technologies,
            },
            // Unreachable after validation; reported as a field error anyway.
            None => return Err(result),
        };

        Ok(NewCustomSolution {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            details,
            message: self.message.filter(|m| !m.trim().is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
