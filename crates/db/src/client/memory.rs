//! In-process [`TableClient`].
//!
//! Assigns ids and timestamps the way the server does, enforces the
//! required columns of each table, and can be switched into a failing mode
//! to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use storefront_core::types::DbId;

use super::{Access, Filter, Row, Table, TableClient};
use crate::error::StoreError;

/// Columns that must be present and non-null on insert.
fn required_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Templates => &["title", "description", "category", "image_url"],
        Table::CustomSolutions => &["name", "email", "service"],
    }
}

#[derive(Default)]
struct TableData {
    next_id: DbId,
    rows: Vec<Row>,
}

/// Tables held in memory for the lifetime of the client.
#[derive(Default)]
pub struct MemoryClient {
    tables: Mutex<HashMap<Table, TableData>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load rows (storage names). Rows without an `id` get one assigned.
    pub fn with_rows(self, table: Table, rows: impl IntoIterator<Item = Row>) -> Self {
        {
            let mut tables = self.lock();
            let data = tables.entry(table).or_default();
            for mut row in rows {
                let id = match row.get("id").and_then(Value::as_i64) {
                    Some(id) => id,
                    None => {
                        let id = data.next_id + 1;
                        row.insert("id".into(), Value::from(id));
                        id
                    }
                };
                data.next_id = data.next_id.max(id);
                data.rows.push(row);
            }
        }
        self
    }

    /// While set, every call fails with a 503 API error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock()
            .get(&table)
            .map(|d| d.rows.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Table, TableData>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn now_value() -> Value {
    Value::from(Utc::now().to_rfc3339())
}

fn row_id(row: &Row) -> Option<DbId> {
    row.get("id").and_then(Value::as_i64)
}

#[async_trait]
impl TableClient for MemoryClient {
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        _access: Access,
    ) -> Result<Vec<Row>, StoreError> {
        self.begin()?;
        let tables = self.lock();
        let mut rows: Vec<Row> = tables
            .get(&table)
            .map(|d| d.rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();
        rows.sort_by_key(row_id);
        Ok(rows)
    }

    async fn select_by_id(
        &self,
        table: Table,
        id: DbId,
        _access: Access,
    ) -> Result<Option<Row>, StoreError> {
        self.begin()?;
        let tables = self.lock();
        Ok(tables
            .get(&table)
            .and_then(|d| d.rows.iter().find(|r| row_id(r) == Some(id)).cloned()))
    }

    async fn insert(&self, table: Table, mut row: Row, _access: Access) -> Result<Row, StoreError> {
        self.begin()?;
        for column in required_columns(table) {
            if row.get(*column).map_or(true, Value::is_null) {
                return Err(StoreError::Rejected(format!(
                    "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
                )));
            }
        }

        let mut tables = self.lock();
        let data = tables.entry(table).or_default();
        data.next_id += 1;
        row.insert("id".into(), Value::from(data.next_id));
        row.entry("created_at").or_insert_with(now_value);
        row.entry("updated_at").or_insert_with(now_value);
        data.rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        id: DbId,
        changes: Row,
        _access: Access,
    ) -> Result<Option<Row>, StoreError> {
        self.begin()?;
        let mut tables = self.lock();
        let Some(row) = tables
            .get_mut(&table)
            .and_then(|d| d.rows.iter_mut().find(|r| row_id(r) == Some(id)))
        else {
            return Ok(None);
        };
        for (column, value) in changes {
            if column != "id" {
                row.insert(column, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: Table, id: DbId, _access: Access) -> Result<bool, StoreError> {
        self.begin()?;
        let mut tables = self.lock();
        let Some(data) = tables.get_mut(&table) else {
            return Ok(false);
        };
        let before = data.rows.len();
        data.rows.retain(|r| row_id(r) != Some(id));
        Ok(data.rows.len() < before)
    }
}
