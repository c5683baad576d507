//! Repository for the `templates` table.

use storefront_core::template::{Template, TemplateInput, TemplatePatch, TemplateStatus};
use storefront_core::types::DbId;

use super::touch;
use crate::client::{Access, Filter, Table, TableClient};
use crate::error::StoreError;
use crate::mapping::TEMPLATE_FIELDS;

/// Provides CRUD operations for templates. Writes run with admin access.
pub struct TemplateRepo;

impl TemplateRepo {
    /// List templates matching `filter` (storage column names), ordered by id.
    pub async fn list(
        client: &dyn TableClient,
        filter: &Filter,
        access: Access,
    ) -> Result<Vec<Template>, StoreError> {
        client
            .select(Table::Templates, filter, access)
            .await?
            .into_iter()
            .map(|row| TEMPLATE_FIELDS.decode(row))
            .collect()
    }

    /// Every template, drafts included.
    pub async fn list_all(client: &dyn TableClient, access: Access) -> Result<Vec<Template>, StoreError> {
        Self::list(client, &Filter::new(), access).await
    }

    /// Templates visible on the public storefront.
    pub async fn list_published(
        client: &dyn TableClient,
        access: Access,
    ) -> Result<Vec<Template>, StoreError> {
        let filter = Filter::new().eq("status", TemplateStatus::Published.as_str());
        Self::list(client, &filter, access).await
    }

    pub async fn list_featured(
        client: &dyn TableClient,
        access: Access,
    ) -> Result<Vec<Template>, StoreError> {
        Self::list(client, &Filter::new().eq("featured", true), access).await
    }

    /// Find a template by ID.
    pub async fn find_by_id(
        client: &dyn TableClient,
        id: DbId,
        access: Access,
    ) -> Result<Option<Template>, StoreError> {
        client
            .select_by_id(Table::Templates, id, access)
            .await?
            .map(|row| TEMPLATE_FIELDS.decode(row))
            .transpose()
    }

    /// Insert a new template, returning the stored row with its id and
    /// timestamps.
    pub async fn create(
        client: &dyn TableClient,
        input: &TemplateInput,
    ) -> Result<Template, StoreError> {
        let row = TEMPLATE_FIELDS.encode(input)?;
        let stored = client.insert(Table::Templates, row, Access::Admin).await?;
        let template: Template = TEMPLATE_FIELDS.decode(stored)?;
        tracing::info!(id = template.id, title = %template.title, "Template created");
        Ok(template)
    }

    /// Update a template. Only `Some` fields of the patch are sent;
    /// `updated_at` is always refreshed.
    pub async fn update(
        client: &dyn TableClient,
        id: DbId,
        patch: &TemplatePatch,
    ) -> Result<Option<Template>, StoreError> {
        let mut changes = TEMPLATE_FIELDS.encode(patch)?;
        touch(&mut changes);
        let stored = client
            .update(Table::Templates, id, changes, Access::Admin)
            .await?;
        if stored.is_none() {
            tracing::debug!(id, "Template update matched no row");
        }
        stored.map(|row| TEMPLATE_FIELDS.decode(row)).transpose()
    }

    pub async fn set_status(
        client: &dyn TableClient,
        id: DbId,
        status: TemplateStatus,
    ) -> Result<Option<Template>, StoreError> {
        Self::update(client, id, &TemplatePatch::status(status)).await
    }

    pub async fn set_featured(
        client: &dyn TableClient,
        id: DbId,
        featured: bool,
    ) -> Result<Option<Template>, StoreError> {
        Self::update(client, id, &TemplatePatch::featured(featured)).await
    }

    /// Delete a template. Returns `true` if a row was removed.
    pub async fn delete(client: &dyn TableClient, id: DbId) -> Result<bool, StoreError> {
        let deleted = client.delete(Table::Templates, id, Access::Admin).await?;
        if deleted {
            tracing::info!(id, "Template deleted");
        }
        Ok(deleted)
    }
}
