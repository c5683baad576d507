//! Admin controller for custom-solution requests.

use std::sync::Arc;

use storefront_core::custom_solution::{
    CustomSolutionRequest, Priority, RequestId, RequestStatus,
};
use storefront_core::stats::{custom_solution_stats, CustomSolutionStats};
use storefront_core::types::{DbId, Timestamp};
use storefront_core::views::{sort_requests, RequestFilter, RequestSortKey, SortDirection, SortState};
use storefront_db::client::{Access, TableClient};
use storefront_db::repositories::CustomSolutionRepo;
use storefront_db::StoreError;

use crate::outcome::{BulkDeleteReport, ErrorKind, MutationOutcome};
use crate::state::SyncState;

fn is_request(request: &CustomSolutionRequest, id: DbId) -> bool {
    request.id == RequestId::Server(id)
}

pub struct CustomSolutionsController {
    client: Arc<dyn TableClient>,
    state: SyncState<CustomSolutionRequest>,
    filter: RequestFilter,
    sort: SortState<RequestSortKey>,
}

impl CustomSolutionsController {
    /// Newest requests first by default.
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self {
            client,
            state: SyncState::default(),
            filter: RequestFilter::default(),
            sort: SortState {
                key: RequestSortKey::CreatedAt,
                direction: SortDirection::Desc,
            },
        }
    }

    pub fn state(&self) -> &SyncState<CustomSolutionRequest> {
        &self.state
    }

    pub fn items(&self) -> &[CustomSolutionRequest] {
        &self.state.items
    }

    pub async fn load(&mut self) -> MutationOutcome<usize> {
        self.state.loading = true;
        let result = CustomSolutionRepo::list_all(self.client.as_ref(), Access::Admin).await;
        self.state.loading = false;

        match result {
            Ok(requests) => {
                let count = requests.len();
                tracing::debug!(count, "Custom solution requests loaded");
                self.state.set_items(requests);
                MutationOutcome::Success(count)
            }
            Err(e) => self.store_failure("load requests", e),
        }
    }

    pub async fn update_status(
        &mut self,
        id: DbId,
        status: RequestStatus,
    ) -> MutationOutcome<CustomSolutionRequest> {
        let result = CustomSolutionRepo::update_status(self.client.as_ref(), id, status).await;
        self.apply_update(id, result)
    }

    pub async fn update_priority(
        &mut self,
        id: DbId,
        priority: Priority,
    ) -> MutationOutcome<CustomSolutionRequest> {
        let result = CustomSolutionRepo::update_priority(self.client.as_ref(), id, priority).await;
        self.apply_update(id, result)
    }

    pub async fn update_notes(
        &mut self,
        id: DbId,
        notes: &str,
    ) -> MutationOutcome<CustomSolutionRequest> {
        let result = CustomSolutionRepo::update_notes(self.client.as_ref(), id, notes).await;
        self.apply_update(id, result)
    }

    /// A missing id is reported as `NotFound` but leaves the error flag alone.
    pub async fn delete_request(&mut self, id: DbId) -> MutationOutcome<DbId> {
        match CustomSolutionRepo::delete(self.client.as_ref(), id).await {
            Ok(true) => {
                self.state.remove_where(|r| is_request(r, id));
                MutationOutcome::Success(id)
            }
            Ok(false) => {
                tracing::debug!(id, "Custom solution request already absent");
                MutationOutcome::Failure(ErrorKind::NotFound)
            }
            Err(e) => self.store_failure("delete request", e),
        }
    }

    pub async fn bulk_delete(&mut self, ids: &[DbId]) -> BulkDeleteReport {
        let mut report = BulkDeleteReport::default();
        for &id in ids {
            match CustomSolutionRepo::delete(self.client.as_ref(), id).await {
                Ok(true) => report.succeeded.push(id),
                Ok(false) => report.failed.push((id, ErrorKind::NotFound)),
                Err(e) => {
                    tracing::warn!(id, error = %e, "Bulk delete failed for request");
                    report.failed.push((id, e.into()));
                }
            }
        }

        if !report.succeeded.is_empty() {
            let removed = report.succeeded.clone();
            self.state
                .remove_where(|r| r.id.as_server().is_some_and(|id| removed.contains(&id)));
        }
        if !report.is_complete() {
            self.state.fail(format!(
                "{} of {} requests could not be deleted",
                report.failed.len(),
                ids.len()
            ));
        }
        report
    }

    // ---- derived views ----

    pub fn search(&self, term: &str) -> Vec<&CustomSolutionRequest> {
        let filter = RequestFilter {
            search: term.to_string(),
            ..Default::default()
        };
        filter.apply(&self.state.items)
    }

    pub fn set_filter(&mut self, filter: RequestFilter) {
        self.filter = filter;
    }

    pub fn sort(&self) -> SortState<RequestSortKey> {
        self.sort
    }

    pub fn toggle_sort(&mut self, key: RequestSortKey) {
        self.sort.toggle(key);
    }

    pub fn visible(&self) -> Vec<&CustomSolutionRequest> {
        sort_requests(self.filter.apply(&self.state.items), self.sort)
    }

    pub fn stats(&self, now: Timestamp) -> CustomSolutionStats {
        custom_solution_stats(&self.state.items, now)
    }

    // ---- private helpers ----

    fn apply_update(
        &mut self,
        id: DbId,
        result: Result<Option<CustomSolutionRequest>, StoreError>,
    ) -> MutationOutcome<CustomSolutionRequest> {
        match result {
            Ok(Some(updated)) => {
                self.state.replace_where(|r| is_request(r, id), updated.clone());
                MutationOutcome::Success(updated)
            }
            Ok(None) => self.not_found(id),
            Err(e) => self.store_failure("update request", e),
        }
    }

    fn not_found<T>(&mut self, id: DbId) -> MutationOutcome<T> {
        tracing::warn!(id, "Custom solution request not found");
        self.state.fail(ErrorKind::NotFound.to_string());
        MutationOutcome::Failure(ErrorKind::NotFound)
    }

    fn store_failure<T>(&mut self, action: &str, err: StoreError) -> MutationOutcome<T> {
        tracing::warn!(action, error = %err, "Custom solution operation failed");
        let kind = ErrorKind::from(err);
        self.state.fail(kind.to_string());
        MutationOutcome::Failure(kind)
    }
}
