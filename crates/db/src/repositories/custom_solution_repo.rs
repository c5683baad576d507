//! Repository for the `custom_solutions` table.

use storefront_core::custom_solution::{
    CustomSolutionPatch, CustomSolutionRequest, NewCustomSolution, Priority, RequestStatus,
};
use storefront_core::types::DbId;

use super::touch;
use crate::client::{Access, Filter, Table, TableClient};
use crate::error::StoreError;
use crate::mapping::CUSTOM_SOLUTION_FIELDS;

/// Provides CRUD operations for custom-solution requests. Reads take the
/// caller's access level; submission is public and other writes run with
/// admin access.
pub struct CustomSolutionRepo;

impl CustomSolutionRepo {
    pub async fn list(
        client: &dyn TableClient,
        filter: &Filter,
        access: Access,
    ) -> Result<Vec<CustomSolutionRequest>, StoreError> {
        client
            .select(Table::CustomSolutions, filter, access)
            .await?
            .into_iter()
            .map(|row| CUSTOM_SOLUTION_FIELDS.decode(row))
            .collect()
    }

    pub async fn list_all(
        client: &dyn TableClient,
        access: Access,
    ) -> Result<Vec<CustomSolutionRequest>, StoreError> {
        Self::list(client, &Filter::new(), access).await
    }

    pub async fn list_by_status(
        client: &dyn TableClient,
        status: RequestStatus,
        access: Access,
    ) -> Result<Vec<CustomSolutionRequest>, StoreError> {
        Self::list(client, &Filter::new().eq("status", status.as_str()), access).await
    }

    pub async fn find_by_id(
        client: &dyn TableClient,
        id: DbId,
        access: Access,
    ) -> Result<Option<CustomSolutionRequest>, StoreError> {
        client
            .select_by_id(Table::CustomSolutions, id, access)
            .await?
            .map(|row| CUSTOM_SOLUTION_FIELDS.decode(row))
            .transpose()
    }

    /// Store a validated public submission. New rows start `pending` with
    /// `medium` priority.
    pub async fn create(
        client: &dyn TableClient,
        submission: &NewCustomSolution,
    ) -> Result<CustomSolutionRequest, StoreError> {
        let mut row = CUSTOM_SOLUTION_FIELDS.encode(submission)?;
        row.insert("status".into(), RequestStatus::default().as_str().into());
        row.insert("priority".into(), Priority::default().as_str().into());

        let stored = client
            .insert(Table::CustomSolutions, row, Access::Public)
            .await?;
        let request: CustomSolutionRequest = CUSTOM_SOLUTION_FIELDS.decode(stored)?;
        tracing::info!(id = %request.id, service = %request.service(), "Custom solution request created");
        Ok(request)
    }

    /// Apply an admin patch; `updated_at` is always refreshed.
    pub async fn update(
        client: &dyn TableClient,
        id: DbId,
        patch: &CustomSolutionPatch,
    ) -> Result<Option<CustomSolutionRequest>, StoreError> {
        let mut changes = CUSTOM_SOLUTION_FIELDS.encode(patch)?;
        touch(&mut changes);
        client
            .update(Table::CustomSolutions, id, changes, Access::Admin)
            .await?
            .map(|row| CUSTOM_SOLUTION_FIELDS.decode(row))
            .transpose()
    }

    pub async fn update_status(
        client: &dyn TableClient,
        id: DbId,
        status: RequestStatus,
    ) -> Result<Option<CustomSolutionRequest>, StoreError> {
        Self::update(client, id, &CustomSolutionPatch::status(status)).await
    }

    pub async fn update_priority(
        client: &dyn TableClient,
        id: DbId,
        priority: Priority,
    ) -> Result<Option<CustomSolutionRequest>, StoreError> {
        Self::update(client, id, &CustomSolutionPatch::priority(priority)).await
    }

    pub async fn update_notes(
        client: &dyn TableClient,
        id: DbId,
        notes: &str,
    ) -> Result<Option<CustomSolutionRequest>, StoreError> {
        Self::update(client, id, &CustomSolutionPatch::notes(notes)).await
    }

    pub async fn delete(client: &dyn TableClient, id: DbId) -> Result<bool, StoreError> {
        let deleted = client
            .delete(Table::CustomSolutions, id, Access::Admin)
            .await?;
        if deleted {
            tracing::info!(id, "Custom solution request deleted");
        }
        Ok(deleted)
    }
}
