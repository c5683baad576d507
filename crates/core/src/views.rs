//! Derived views over held collections: search, filters and sorting.
//!
//! All helpers work on slices the caller already holds and never touch a
//! store. Sorting has one active key at a time; ties break on id so that
//! descending order is always the exact reverse of ascending order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::custom_solution::{CustomSolutionRequest, Priority, RequestStatus, Service};
use crate::template::{Template, TemplateCategory, TemplateStatus};

// ---------------------------------------------------------------------------
// Sort state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Currently selected sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Header click: the same key flips direction, a new key starts ascending.
    pub fn toggle(&mut self, key: K) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }
}

impl<K: Default + Copy + PartialEq> Default for SortState<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateSortKey {
    #[default]
    Title,
    Category,
    Budget,
    Rating,
    Downloads,
    Status,
    CreatedAt,
}

/// Case-insensitive substring match over title, description and technologies.
/// A blank term matches everything.
pub fn template_matches(template: &Template, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    template.title.to_lowercase().contains(&needle)
        || template.description.to_lowercase().contains(&needle)
        || template
            .technologies
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

pub fn search_templates<'a>(templates: &'a [Template], term: &str) -> Vec<&'a Template> {
    templates.iter().filter(|t| template_matches(t, term)).collect()
}

/// Combined admin filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateFilter {
    pub search: String,
    pub category: Option<TemplateCategory>,
    pub status: Option<TemplateStatus>,
    pub featured: Option<bool>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &Template) -> bool {
        template_matches(template, &self.search)
            && self.category.map_or(true, |c| template.category == c)
            && self.status.map_or(true, |s| template.status == s)
            && self.featured.map_or(true, |f| template.featured == f)
    }

    pub fn apply<'a>(&self, templates: &'a [Template]) -> Vec<&'a Template> {
        templates.iter().filter(|t| self.matches(t)).collect()
    }
}

fn compare_templates(a: &Template, b: &Template, key: TemplateSortKey) -> Ordering {
    let primary = match key {
        TemplateSortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        TemplateSortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        TemplateSortKey::Budget => a.budget.total_cmp(&b.budget),
        TemplateSortKey::Rating => a.rating.cmp(&b.rating),
        TemplateSortKey::Downloads => a.download_count().total_cmp(&b.download_count()),
        TemplateSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        TemplateSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Return a sorted copy of the references; the input order is not touched.
pub fn sort_templates<'a>(
    mut templates: Vec<&'a Template>,
    sort: SortState<TemplateSortKey>,
) -> Vec<&'a Template> {
    templates.sort_by(|a, b| sort.direction.apply(compare_templates(a, b, sort.key)));
    templates
}

// ---------------------------------------------------------------------------
// Custom solution requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestSortKey {
    #[default]
    CreatedAt,
    Name,
    Status,
    Priority,
    Service,
}

/// Case-insensitive substring match over name, email, message and
/// requested technologies.
pub fn request_matches(request: &CustomSolutionRequest, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    request.name.to_lowercase().contains(&needle)
        || request.email.to_lowercase().contains(&needle)
        || request
            .message
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains(&needle))
        || request
            .details
            .technologies()
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestFilter {
    pub search: String,
    pub status: Option<RequestStatus>,
    pub priority: Option<Priority>,
    pub service: Option<Service>,
}

impl RequestFilter {
    pub fn matches(&self, request: &CustomSolutionRequest) -> bool {
        request_matches(request, &self.search)
            && self.status.map_or(true, |s| request.status == s)
            && self.priority.map_or(true, |p| request.priority == p)
            && self.service.map_or(true, |s| request.service() == s)
    }

    pub fn apply<'a>(&self, requests: &'a [CustomSolutionRequest]) -> Vec<&'a CustomSolutionRequest> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }
}

fn compare_requests(a: &CustomSolutionRequest, b: &CustomSolutionRequest, key: RequestSortKey) -> Ordering {
    let primary = match key {
        RequestSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        RequestSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        RequestSortKey::Status => a.status.cmp(&b.status),
        RequestSortKey::Priority => a.priority.cmp(&b.priority),
        RequestSortKey::Service => a.service().cmp(&b.service()),
    };
    primary.then_with(|| a.id.to_string().cmp(&b.id.to_string()))
}

pub fn sort_requests<'a>(
    mut requests: Vec<&'a CustomSolutionRequest>,
    sort: SortState<RequestSortKey>,
) -> Vec<&'a CustomSolutionRequest> {
    requests.sort_by(|a, b| sort.direction.apply(compare_requests(a, b, sort.key)));
    requests
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_solution::{RequestId, ServiceDetails};
    use chrono::TimeZone;

    fn template(id: i64, title: &str, budget: f64, technologies: &[&str]) -> Template {
        Template {
            id,
            title: title.into(),
            description: format!("{title} description"),
            full_description: None,
            category: TemplateCategory::LandingPage,
            budget,
            rating: 4,
            downloads: "1k".into(),
            image: "https://cdn.example.com/t.png".into(),
            technologies: technologies.iter().map(|s| s.to_string()).collect(),
            features: vec![],
            featured: false,
            status: TemplateStatus::Published,
            demo_url: None,
            download_url: None,
            version: "1.0.0".into(),
            file_size: String::new(),
            compatible_with: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    fn sample() -> Vec<Template> {
        let mut crm = template(3, "CRM Suite", 99.0, &["Next.js"]);
        crm.description = "Sales pipeline with an analytics Dashboard".into();
        vec![
            template(1, "Admin Dashboard", 49.0, &["React"]),
            template(2, "Portfolio", 0.0, &["dashboard-kit", "Vue"]),
            crm,
            template(4, "Blog Theme", 49.0, &["Hugo"]),
        ]
    }

    fn ids(templates: &[&Template]) -> Vec<i64> {
        templates.iter().map(|t| t.id).collect()
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn search_matches_title_description_and_technologies() {
        let templates = sample();
        let found = search_templates(&templates, "dashboard");
        assert_eq!(ids(&found), vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let templates = sample();
        assert_eq!(ids(&search_templates(&templates, "HUGO")), vec![4]);
    }

    #[test]
    fn blank_search_matches_all() {
        let templates = sample();
        assert_eq!(search_templates(&templates, "  ").len(), templates.len());
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn filter_combines_category_status_and_search() {
        let mut templates = sample();
        templates[0].category = TemplateCategory::Dashboard;
        templates[2].status = TemplateStatus::Draft;

        let filter = TemplateFilter {
            status: Some(TemplateStatus::Published),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&templates)), vec![1, 2, 4]);

        let filter = TemplateFilter {
            category: Some(TemplateCategory::Dashboard),
            search: "admin".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&templates)), vec![1]);
    }

    // -- sorting -------------------------------------------------------------

    #[test]
    fn budget_ascending_and_descending_are_exact_reverses() {
        let templates = sample();
        let asc = sort_templates(templates.iter().collect(), SortState::new(TemplateSortKey::Budget));
        let desc = sort_templates(
            templates.iter().collect(),
            SortState {
                key: TemplateSortKey::Budget,
                direction: SortDirection::Desc,
            },
        );
        let mut reversed = ids(&desc);
        reversed.reverse();
        assert_eq!(ids(&asc), reversed);
        assert_eq!(ids(&asc), vec![2, 1, 4, 3]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut templates = sample();
        templates[1].title = "apex".into();
        let sorted = sort_templates(templates.iter().collect(), SortState::new(TemplateSortKey::Title));
        assert_eq!(ids(&sorted), vec![1, 2, 4, 3]);
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let mut sort = SortState::new(TemplateSortKey::Title);
        sort.toggle(TemplateSortKey::Title);
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.toggle(TemplateSortKey::Budget);
        assert_eq!(sort.key, TemplateSortKey::Budget);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    // -- requests ------------------------------------------------------------

    fn request(id: i64, name: &str, priority: Priority, day: u32) -> CustomSolutionRequest {
        let created = chrono::Utc.with_ymd_and_hms(2026, 5, day, 0, 0, 0).unwrap();
        CustomSolutionRequest {
            id: RequestId::Server(id),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            details: ServiceDetails::FrontendDevelopment {
                website_type: "saas".into(),
                technologies: vec!["Remix".into()],
            },
            message: Some("Need a marketing site".into()),
            status: RequestStatus::Pending,
            priority,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn request_search_and_filter() {
        let requests = vec![
            request(1, "Linus", Priority::Low, 1),
            request(2, "Margaret", Priority::Urgent, 2),
        ];
        let filter = RequestFilter {
            search: "MARGARET@".into(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&requests).len(), 1);

        let filter = RequestFilter {
            priority: Some(Priority::Low),
            ..Default::default()
        };
        assert_eq!(filter.apply(&requests)[0].name, "Linus");

        assert!(request_matches(&requests[0], "remix"));
        assert!(request_matches(&requests[0], "marketing"));
    }

    #[test]
    fn requests_sort_by_priority_rank() {
        let requests = vec![
            request(1, "A", Priority::High, 1),
            request(2, "B", Priority::Low, 2),
            request(3, "C", Priority::Urgent, 3),
        ];
        let sorted = sort_requests(
            requests.iter().collect(),
            SortState {
                key: RequestSortKey::Priority,
                direction: SortDirection::Desc,
            },
        );
        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
