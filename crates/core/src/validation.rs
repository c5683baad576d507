//! Field-level validation for editor and submission forms.
//!
//! Validators never fail: they always return a [`ValidationResult`] whose
//! `errors` map is keyed by the UI field name. Callers must not persist a
//! record whose result is not valid.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::custom_solution::{CustomSolutionForm, Service};
use crate::template::{TemplateInput, TemplatePatch};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum length of a requester name in characters.
pub const MIN_NAME_LENGTH: usize = 2;

/// Allowed template rating range (inclusive).
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Loose email shape: something, `@`, something, `.`, something.
const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Message for a field, if it failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

/// Collects field errors; the first message recorded for a field wins.
#[derive(Default)]
struct Errors(BTreeMap<String, String>);

impl Errors {
    fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    fn budget(&mut self, budget: f64) {
        if budget.is_nan() || budget < 0.0 {
            self.add("budget", "Budget must be a positive number");
        }
    }

    fn technologies(&mut self, technologies: &[String]) {
        if !technologies.iter().any(|t| !t.trim().is_empty()) {
            self.add("technologies", "At least one technology is required");
        }
    }

    fn rating(&mut self, rating: u8) {
        if !RATING_RANGE.contains(&rating) {
            self.add("rating", "Rating must be between 1 and 5");
        }
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::from_errors(self.0)
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Validate the template editor form.
pub fn validate_template(input: &TemplateInput) -> ValidationResult {
    let mut errors = Errors::default();

    errors.require("title", &input.title, "Title is required");
    errors.require("description", &input.description, "Description is required");
    errors.require("image", &input.image, "Image URL is required");

    if input.category.is_none() {
        errors.add("category", "Category is required");
    }
    errors.budget(input.budget);
    errors.technologies(&input.technologies);
    errors.rating(input.rating);

    errors.finish()
}

/// Validate the fields a partial update sets, with the editor form rules.
/// Absent fields are not checked.
pub fn validate_template_patch(patch: &TemplatePatch) -> ValidationResult {
    let mut errors = Errors::default();

    if let Some(title) = &patch.title {
        errors.require("title", title, "Title is required");
    }
    if let Some(description) = &patch.description {
        errors.require("description", description, "Description is required");
    }
    if let Some(image) = &patch.image {
        errors.require("image", image, "Image URL is required");
    }
    if let Some(budget) = patch.budget {
        errors.budget(budget);
    }
    if let Some(technologies) = &patch.technologies {
        errors.technologies(technologies);
    }
    if let Some(rating) = patch.rating {
        errors.rating(rating);
    }

    errors.finish()
}

// ---------------------------------------------------------------------------
// Custom solution request
// ---------------------------------------------------------------------------

/// Validate the public custom-solution submission form.
pub fn validate_custom_solution_request(form: &CustomSolutionForm) -> ValidationResult {
    let mut errors = Errors::default();

    if form.name.trim().chars().count() < MIN_NAME_LENGTH {
        errors.add("name", "Name must be at least 2 characters");
    }
    if !email_regex().is_match(form.email.trim()) {
        errors.add("email", "Please enter a valid email address");
    }

    match form.service {
        None => errors.add("service", "Please select a service"),
        Some(Service::UiUxDesign) => {
            errors.require(
                "designType",
                form.design_type.as_deref().unwrap_or_default(),
                "Please select a design type",
            );
        }
        Some(Service::FrontendDevelopment) => {
            errors.require(
                "websiteType",
                form.website_type.as_deref().unwrap_or_default(),
                "Please select a website type",
            );
            if !form.technologies.iter().any(|t| !t.trim().is_empty()) {
                errors.add("technologies", "Please select at least one technology");
            }
        }
    }

    errors.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
