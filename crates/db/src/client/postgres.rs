//! Direct Postgres client.
//!
//! Works on any of the storefront tables without per-table SQL: rows are
//! read with `to_jsonb(t)` and written through
//! `jsonb_populate_record(NULL::<table>, $n)`, so Postgres performs the
//! JSON-to-column conversion and enforces the schema.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use storefront_core::types::DbId;

use super::{is_safe_identifier, Access, Filter, Row, Table, TableClient};
use crate::error::StoreError;

/// Postgres-backed [`TableClient`] with one pool per access level.
pub struct PgClient {
    public: PgPool,
    admin: Option<PgPool>,
}

impl PgClient {
    /// Use the same pool for public and admin calls.
    pub fn new(pool: PgPool) -> Self {
        Self {
            admin: Some(pool.clone()),
            public: pool,
        }
    }

    /// Public pool only; admin calls fail with [`StoreError::AdminUnavailable`].
    pub fn public_only(pool: PgPool) -> Self {
        Self {
            public: pool,
            admin: None,
        }
    }

    /// Run admin calls on a separately credentialed pool.
    pub fn with_admin_pool(mut self, admin: PgPool) -> Self {
        self.admin = Some(admin);
        self
    }

    fn pool(&self, access: Access) -> Result<&PgPool, StoreError> {
        match access {
            Access::Public => Ok(&self.public),
            Access::Admin => self.admin.as_ref().ok_or(StoreError::AdminUnavailable),
        }
    }
}

/// Validated column list for a write.
fn columns(row: &Row) -> Result<Vec<&str>, StoreError> {
    let cols: Vec<&str> = row.keys().map(String::as_str).collect();
    if cols.is_empty() {
        return Err(StoreError::Rejected("no columns to write".to_string()));
    }
    if let Some(bad) = cols.iter().find(|c| !is_safe_identifier(c)) {
        return Err(StoreError::Rejected(format!("invalid column name '{bad}'")));
    }
    Ok(cols)
}

fn into_row(value: Value) -> Result<Row, StoreError> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::Rejected(format!("expected a row object, got {other}"))),
    }
}

/// `SELECT` text for [`PgClient::select`]; parameters come in
/// (column, value) pairs.
fn select_sql(table: Table, filter: &Filter) -> String {
    let mut sql = format!("SELECT to_jsonb(t) FROM {table} t");
    for (i, _) in filter.conditions().iter().enumerate() {
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        let col = 2 * i + 1;
        sql.push_str(&format!(" {keyword} to_jsonb(t) -> ${col} = ${}", col + 1));
    }
    sql.push_str(" ORDER BY t.id");
    sql
}

fn insert_sql(table: Table, cols: &[&str]) -> String {
    let list = cols.join(", ");
    format!(
        "INSERT INTO {table} AS t ({list}) \
         SELECT {list} FROM jsonb_populate_record(NULL::{table}, $1) \
         RETURNING to_jsonb(t)"
    )
}

fn update_sql(table: Table, cols: &[&str]) -> String {
    let list = cols.join(", ");
    let target = if cols.len() == 1 {
        list.clone()
    } else {
        format!("({list})")
    };
    format!(
        "UPDATE {table} t SET {target} = \
            (SELECT {list} FROM jsonb_populate_record(NULL::{table}, $2)) \
         WHERE t.id = $1 \
         RETURNING to_jsonb(t)"
    )
}

#[async_trait]
impl TableClient for PgClient {
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        access: Access,
    ) -> Result<Vec<Row>, StoreError> {
        let sql = select_sql(table, filter);
        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        for (column, value) in filter.conditions() {
            query = query.bind(*column).bind(value.clone());
        }
        let values = query.fetch_all(self.pool(access)?).await?;
        values.into_iter().map(into_row).collect()
    }

    async fn select_by_id(
        &self,
        table: Table,
        id: DbId,
        access: Access,
    ) -> Result<Option<Row>, StoreError> {
        let sql = format!("SELECT to_jsonb(t) FROM {table} t WHERE t.id = $1");
        let value = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(self.pool(access)?)
            .await?;
        value.map(into_row).transpose()
    }

    async fn insert(&self, table: Table, row: Row, access: Access) -> Result<Row, StoreError> {
        let sql = insert_sql(table, &columns(&row)?);
        let value = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Value::Object(row))
            .fetch_one(self.pool(access)?)
            .await?;
        into_row(value)
    }

    async fn update(
        &self,
        table: Table,
        id: DbId,
        changes: Row,
        access: Access,
    ) -> Result<Option<Row>, StoreError> {
        let sql = update_sql(table, &columns(&changes)?);
        let value = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .bind(Value::Object(changes))
            .fetch_optional(self.pool(access)?)
            .await?;
        value.map(into_row).transpose()
    }

    async fn delete(&self, table: Table, id: DbId, access: Access) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(self.pool(access)?)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
