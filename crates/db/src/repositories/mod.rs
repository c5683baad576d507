//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&dyn TableClient` as the first argument. Rows are mapped
//! between UI and storage names through [`crate::mapping`] on the way in
//! and out. Nothing here retries.

use chrono::Utc;
use serde_json::Value;

use crate::client::Row;

pub mod custom_solution_repo;
pub mod template_repo;

pub use custom_solution_repo::CustomSolutionRepo;
pub use template_repo::TemplateRepo;

/// Stamp a change set with the current time.
fn touch(changes: &mut Row) {
    changes.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
}
