//! REST client for the hosted backend's table API.
//!
//! Speaks the PostgREST dialect exposed under `/rest/v1/<table>`:
//! equality filters as `column=eq.value`, writes with
//! `Prefer: return=representation` so the stored row comes back.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use storefront_core::types::DbId;

use super::{is_safe_identifier, Access, Filter, Row, Table, TableClient};
use crate::error::StoreError;

/// Ask the API to echo written rows.
const PREFER_REPRESENTATION: &str = "return=representation";

/// HTTP client for one backend project.
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
}

impl RestClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// * `base_url` - project URL, e.g. `https://abc.backend.example`.
    /// * `anon_key` - key used for [`Access::Public`] calls.
    /// * `service_key` - key used for [`Access::Admin`] calls.
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, anon_key, service_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_key,
        }
    }

    // ---- private helpers ----

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn key(&self, access: Access) -> Result<&str, StoreError> {
        match access {
            Access::Public => Ok(&self.anon_key),
            Access::Admin => self.service_key.as_deref().ok_or(StoreError::AdminUnavailable),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        table: Table,
        access: Access,
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        let key = self.key(access)?;
        Ok(self
            .client
            .request(method, self.table_url(table))
            .header("apikey", key)
            .bearer_auth(key))
    }

    fn id_filter(id: DbId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }

    /// Render a filter value the way the query-string dialect expects.
    fn filter_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }

    /// Ensure a success status, otherwise extract the API's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<Row>, StoreError> {
        let response = Self::ensure_success(response).await?;
        let values: Vec<Value> = response.json().await?;
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Rejected(format!("expected a row object, got {other}"))),
            })
            .collect()
    }
}

/// Pull the human-readable message out of an error body.
///
/// The table API uses `message`; the auth API uses `error_description` or
/// `msg`. Anything else is returned as raw text.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TableClient for RestClient {
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        access: Access,
    ) -> Result<Vec<Row>, StoreError> {
        let mut query: Vec<(&str, String)> =
            vec![("select", "*".to_string()), ("order", "id.asc".to_string())];
        for (column, value) in filter.conditions() {
            query.push((*column, format!("eq.{}", Self::filter_value(value))));
        }

        tracing::debug!(%table, conditions = filter.conditions().len(), "REST select");
        let response = self
            .request(reqwest::Method::GET, table, access)?
            .query(&query)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn select_by_id(
        &self,
        table: Table,
        id: DbId,
        access: Access,
    ) -> Result<Option<Row>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, table, access)?
            .query(&[("select", "*")])
            .query(&Self::id_filter(id))
            .send()
            .await?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn insert(&self, table: Table, row: Row, access: Access) -> Result<Row, StoreError> {
        if let Some(bad) = row.keys().find(|k| !is_safe_identifier(k)) {
            return Err(StoreError::Rejected(format!("invalid column name '{bad}'")));
        }

        tracing::debug!(%table, "REST insert");
        let response = self
            .request(reqwest::Method::POST, table, access)?
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&Value::Object(row))
            .send()
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        table: Table,
        id: DbId,
        changes: Row,
        access: Access,
    ) -> Result<Option<Row>, StoreError> {
        if let Some(bad) = changes.keys().find(|k| !is_safe_identifier(k)) {
            return Err(StoreError::Rejected(format!("invalid column name '{bad}'")));
        }

        tracing::debug!(%table, id, "REST update");
        let response = self
            .request(reqwest::Method::PATCH, table, access)?
            .query(&Self::id_filter(id))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&Value::Object(changes))
            .send()
            .await?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn delete(&self, table: Table, id: DbId, access: Access) -> Result<bool, StoreError> {
        tracing::debug!(%table, id, "REST delete");
        let response = self
            .request(reqwest::Method::DELETE, table, access)?
            .query(&Self::id_filter(id))
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        Ok(!Self::rows(response).await?.is_empty())
    }
}
