//! Dashboard statistics derived from an in-memory collection.
//!
//! Nothing here is persisted; the admin screens recompute on every load.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::custom_solution::{CustomSolutionRequest, RequestStatus, Service};
use crate::template::{Template, TemplateCategory, TemplateStatus};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub total: usize,
    pub published: usize,
    pub featured: usize,
    pub draft: usize,
    /// Number of distinct categories in use.
    pub categories: usize,
    pub by_category: BTreeMap<TemplateCategory, usize>,
    pub total_downloads: u64,
    /// Mean rating rounded to one decimal; 0.0 when there are no templates.
    pub average_rating: f64,
}

pub fn template_stats(templates: &[Template]) -> TemplateStats {
    let mut by_category: BTreeMap<TemplateCategory, usize> = BTreeMap::new();
    for t in templates {
        *by_category.entry(t.category).or_default() += 1;
    }
    let categories = templates.iter().map(|t| t.category).collect::<BTreeSet<_>>().len();

    let total_downloads: f64 = templates.iter().map(Template::download_count).sum();

    let average_rating = if templates.is_empty() {
        0.0
    } else {
        let sum: f64 = templates.iter().map(|t| f64::from(t.rating)).sum();
        round_one_decimal(sum / templates.len() as f64)
    };

    TemplateStats {
        total: templates.len(),
        published: templates
            .iter()
            .filter(|t| t.status == TemplateStatus::Published)
            .count(),
        featured: templates.iter().filter(|t| t.featured).count(),
        draft: templates
            .iter()
            .filter(|t| t.status == TemplateStatus::Draft)
            .count(),
        categories,
        by_category,
        total_downloads: total_downloads.round().max(0.0) as u64,
        average_rating,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Custom solution requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSolutionStats {
    pub total: usize,
    /// Every status is present, with zero for unused ones.
    pub by_status: BTreeMap<RequestStatus, usize>,
    /// Every service is present, with zero for unused ones.
    pub by_service: BTreeMap<Service, usize>,
    /// Requests created in the same calendar month and year as `now`.
    pub this_month: usize,
}

impl CustomSolutionStats {
    pub fn count_for_status(&self, status: RequestStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn count_for_service(&self, service: Service) -> usize {
        self.by_service.get(&service).copied().unwrap_or(0)
    }
}

pub fn custom_solution_stats(
    requests: &[CustomSolutionRequest],
    now: Timestamp,
) -> CustomSolutionStats {
    let mut by_status: BTreeMap<RequestStatus, usize> =
        RequestStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_service: BTreeMap<Service, usize> =
        Service::ALL.iter().map(|s| (*s, 0)).collect();
    let mut this_month = 0;

    for req in requests {
        *by_status.entry(req.status).or_default() += 1;
        *by_service.entry(req.service()).or_default() += 1;
        if req.created_at.year() == now.year() && req.created_at.month() == now.month() {
            this_month += 1;
        }
    }

    CustomSolutionStats {
        total: requests.len(),
        by_status,
        by_service,
        this_month,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
