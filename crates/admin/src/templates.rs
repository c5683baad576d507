//! Admin controller for the template catalogue.

use std::sync::Arc;

use storefront_core::stats::{template_stats, TemplateStats};
use storefront_core::template::{Template, TemplateInput, TemplatePatch};
use storefront_core::types::DbId;
use storefront_core::validation::{validate_template, validate_template_patch};
use storefront_core::views::{
    search_templates, sort_templates, SortState, TemplateFilter, TemplateSortKey,
};
use storefront_db::client::{Access, TableClient};
use storefront_db::repositories::TemplateRepo;
use storefront_db::StoreError;

use crate::outcome::{BulkDeleteReport, ErrorKind, MutationOutcome};
use crate::state::SyncState;

pub struct TemplatesController {
    client: Arc<dyn TableClient>,
    access: Access,
    state: SyncState<Template>,
    filter: TemplateFilter,
    sort: SortState<TemplateSortKey>,
}

impl TemplatesController {
    /// `access` governs reads; writes always use admin access.
    pub fn new(client: Arc<dyn TableClient>, access: Access) -> Self {
        Self {
            client,
            access,
            state: SyncState::default(),
            filter: TemplateFilter::default(),
            sort: SortState::default(),
        }
    }

    pub fn state(&self) -> &SyncState<Template> {
        &self.state
    }

    pub fn items(&self) -> &[Template] {
        &self.state.items
    }

    /// Fetch every template. Held items are replaced only on success.
    pub async fn load(&mut self) -> MutationOutcome<usize> {
        self.state.loading = true;
        let result = TemplateRepo::list_all(self.client.as_ref(), self.access).await;
        self.state.loading = false;

        match result {
            Ok(templates) => {
                let count = templates.len();
                tracing::debug!(count, "Templates loaded");
                self.state.set_items(templates);
                MutationOutcome::Success(count)
            }
            Err(e) => self.store_failure("load templates", e),
        }
    }

    /// Validate and create. Invalid input never reaches the store.
    pub async fn add_template(&mut self, input: &TemplateInput) -> MutationOutcome<Template> {
        let validation = validate_template(input);
        if !validation.is_valid {
            return MutationOutcome::Failure(ErrorKind::Invalid(validation));
        }

        match TemplateRepo::create(self.client.as_ref(), input).await {
            Ok(created) => {
                self.state.append(created.clone());
                MutationOutcome::Success(created)
            }
            Err(e) => self.store_failure("create template", e),
        }
    }

    /// Validate a full editor form and write every field.
    pub async fn edit_template(
        &mut self,
        id: DbId,
        input: &TemplateInput,
    ) -> MutationOutcome<Template> {
        let validation = validate_template(input);
        if !validation.is_valid {
            return MutationOutcome::Failure(ErrorKind::Invalid(validation));
        }
        self.update_template(id, &TemplatePatch::from_input(input)).await
    }

    /// Partial update; the stored row replaces the held one. Fields the patch
    /// sets are validated first and an invalid patch never reaches the store.
    pub async fn update_template(
        &mut self,
        id: DbId,
        patch: &TemplatePatch,
    ) -> MutationOutcome<Template> {
        let validation = validate_template_patch(patch);
        if !validation.is_valid {
            return MutationOutcome::Failure(ErrorKind::Invalid(validation));
        }
        let result = TemplateRepo::update(self.client.as_ref(), id, patch).await;
        self.apply_update(id, result)
    }

    /// A missing id is reported as `NotFound` but leaves the error flag alone.
    pub async fn delete_template(&mut self, id: DbId) -> MutationOutcome<DbId> {
        match TemplateRepo::delete(self.client.as_ref(), id).await {
            Ok(true) => {
                self.state.remove_where(|t| t.id == id);
                MutationOutcome::Success(id)
            }
            Ok(false) => {
                tracing::debug!(id, "Template already absent");
                MutationOutcome::Failure(ErrorKind::NotFound)
            }
            Err(e) => self.store_failure("delete template", e),
        }
    }

    pub async fn toggle_featured(&mut self, id: DbId) -> MutationOutcome<Template> {
        let Some(current) = self.state.find(|t| t.id == id).map(|t| t.featured) else {
            return self.not_found(id);
        };
        let result = TemplateRepo::set_featured(self.client.as_ref(), id, !current).await;
        self.apply_update(id, result)
    }

    /// Flip between draft and published.
    pub async fn toggle_status(&mut self, id: DbId) -> MutationOutcome<Template> {
        let Some(current) = self.state.find(|t| t.id == id).map(|t| t.status) else {
            return self.not_found(id);
        };
        let result = TemplateRepo::set_status(self.client.as_ref(), id, current.toggled()).await;
        self.apply_update(id, result)
    }

    /// Delete each id in turn. Successes are removed from the held items
    /// even when later deletes fail.
    pub async fn bulk_delete(&mut self, ids: &[DbId]) -> BulkDeleteReport {
        let mut report = BulkDeleteReport::default();
        for &id in ids {
            match TemplateRepo::delete(self.client.as_ref(), id).await {
                Ok(true) => report.succeeded.push(id),
                Ok(false) => report.failed.push((id, ErrorKind::NotFound)),
                Err(e) => {
                    tracing::warn!(id, error = %e, "Bulk delete failed for template");
                    report.failed.push((id, e.into()));
                }
            }
        }

        if !report.succeeded.is_empty() {
            let removed = report.succeeded.clone();
            self.state.remove_where(|t| removed.contains(&t.id));
        }
        if !report.is_complete() {
            self.state.fail(format!(
                "{} of {} templates could not be deleted",
                report.failed.len(),
                ids.len()
            ));
        }
        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Bulk template delete finished"
        );
        report
    }

    // ---- derived views ----

    pub fn search(&self, term: &str) -> Vec<&Template> {
        search_templates(&self.state.items, term)
    }

    pub fn filter(&self) -> &TemplateFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TemplateFilter) {
        self.filter = filter;
    }

    pub fn sort(&self) -> SortState<TemplateSortKey> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState<TemplateSortKey>) {
        self.sort = sort;
    }

    /// Header click on `key`.
    pub fn toggle_sort(&mut self, key: TemplateSortKey) {
        self.sort.toggle(key);
    }

    pub fn filtered(&self) -> Vec<&Template> {
        self.filter.apply(&self.state.items)
    }

    /// All held items in the active sort order.
    pub fn sorted(&self) -> Vec<&Template> {
        sort_templates(self.state.items.iter().collect(), self.sort)
    }

    /// Held items after the active filter, in the active sort order.
    pub fn visible(&self) -> Vec<&Template> {
        sort_templates(self.filtered(), self.sort)
    }

    pub fn stats(&self) -> TemplateStats {
        template_stats(&self.state.items)
    }

    // ---- private helpers ----

    fn apply_update(
        &mut self,
        id: DbId,
        result: Result<Option<Template>, StoreError>,
    ) -> MutationOutcome<Template> {
        match result {
            Ok(Some(updated)) => {
                self.state.replace_where(|t| t.id == id, updated.clone());
                MutationOutcome::Success(updated)
            }
            Ok(None) => self.not_found(id),
            Err(e) => self.store_failure("update template", e),
        }
    }

    fn not_found<T>(&mut self, id: DbId) -> MutationOutcome<T> {
        tracing::warn!(id, "Template not found");
        self.state.fail(ErrorKind::NotFound.to_string());
        MutationOutcome::Failure(ErrorKind::NotFound)
    }

    fn store_failure<T>(&mut self, action: &str, err: StoreError) -> MutationOutcome<T> {
        tracing::warn!(action, error = %err, "Template operation failed");
        let kind = ErrorKind::from(err);
        self.state.fail(kind.to_string());
        MutationOutcome::Failure(kind)
    }
}
