//! The persistence-client boundary.
//!
//! A [`TableClient`] issues single-shot reads and writes against one of the
//! two logical tables. Rows travel as JSON objects keyed by storage column
//! names; translation to entity shapes happens in [`crate::mapping`].
//! No client retries.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use storefront_core::types::DbId;

use crate::error::StoreError;

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryClient;
pub use postgres::PgClient;
pub use rest::RestClient;

/// One stored row, keyed by storage column name.
pub type Row = Map<String, Value>;

// ---------------------------------------------------------------------------
// Table / access
// ---------------------------------------------------------------------------

/// The logical tables known to the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Templates,
    CustomSolutions,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Templates => "templates",
            Table::CustomSolutions => "custom_solutions",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which credentials a call runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    /// Anonymous visitor credentials.
    #[default]
    Public,
    /// Back-office credentials.
    Admin,
}

impl Access {
    /// Map the UI's `isAdmin` flag.
    pub fn from_admin(is_admin: bool) -> Self {
        if is_admin {
            Access::Admin
        } else {
            Access::Public
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Conjunction of `column = value` conditions evaluated by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(&'static str, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition on a storage column.
    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    pub fn conditions(&self) -> &[(&'static str, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter against a row held in memory.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(*column) == Some(value))
    }
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// Read/write surface over a named table.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// All rows matching `filter`, ordered by id.
    async fn select(&self, table: Table, filter: &Filter, access: Access)
        -> Result<Vec<Row>, StoreError>;

    /// One row by id; `None` when it does not exist.
    async fn select_by_id(
        &self,
        table: Table,
        id: DbId,
        access: Access,
    ) -> Result<Option<Row>, StoreError>;

    /// Insert a row and return it as stored (with id and timestamps).
    async fn insert(&self, table: Table, row: Row, access: Access) -> Result<Row, StoreError>;

    /// Merge `changes` onto the row with `id`; `None` when it does not exist.
    async fn update(
        &self,
        table: Table,
        id: DbId,
        changes: Row,
        access: Access,
    ) -> Result<Option<Row>, StoreError>;

    /// Delete by id. Returns `true` if a row was removed.
    async fn delete(&self, table: Table, id: DbId, access: Access) -> Result<bool, StoreError>;
}

/// Column names sent to SQL or URLs must be plain lower-case identifiers.
pub(crate) fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_rows_in_memory() {
        let filter = Filter::new().eq("status", "published").eq("featured", true);
        let row: Row = json!({"status": "published", "featured": true, "id": 1})
            .as_object()
            .cloned()
            .unwrap();
        assert!(filter.matches(&row));

        let draft: Row = json!({"status": "draft", "featured": true})
            .as_object()
            .cloned()
            .unwrap();
        assert!(!filter.matches(&draft));
        assert!(Filter::new().matches(&draft));
    }

    #[test]
    fn identifier_check() {
        assert!(is_safe_identifier("full_description"));
        assert!(!is_safe_identifier("title; DROP TABLE templates"));
        assert!(!is_safe_identifier("Title"));
        assert!(!is_safe_identifier("1col"));
        assert!(!is_safe_identifier(""));
    }

    #[test]
    fn admin_flag_maps_to_access() {
        assert_eq!(Access::from_admin(true), Access::Admin);
        assert_eq!(Access::from_admin(false), Access::Public);
    }
}
