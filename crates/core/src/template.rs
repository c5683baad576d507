//! Template entity, its editor input and partial-update DTO.
//!
//! Field names serialize in the UI (camelCase) shape. The storage layer
//! translates them to column names in one place (`storefront_db::mapping`).

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

define_string_enum! {
    /// Fixed set of marketplace categories.
    TemplateCategory ("category") {
        LandingPage = "landing-page",
        Dashboard = "dashboard",
        ECommerce = "e-commerce",
        Portfolio = "portfolio",
        Blog = "blog",
        Saas = "saas",
        MobileApp = "mobile-app",
        AdminPanel = "admin-panel",
    }
}

define_string_enum! {
    /// Publication status. Transitions are free toggles.
    TemplateStatus ("template status") {
        Draft = "draft",
        Published = "published",
    }
}

impl Default for TemplateStatus {
    fn default() -> Self {
        TemplateStatus::Draft
    }
}

impl TemplateStatus {
    /// The other status (draft <-> published).
    pub fn toggled(self) -> Self {
        match self {
            TemplateStatus::Draft => TemplateStatus::Published,
            TemplateStatus::Published => TemplateStatus::Draft,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Default rating assigned to new templates.
pub const DEFAULT_RATING: u8 = 5;

fn default_rating() -> u8 {
    DEFAULT_RATING
}

/// A stored template as returned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub full_description: Option<String>,
    pub category: TemplateCategory,
    #[serde(default)]
    pub budget: f64,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub downloads: String,
    pub image: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub file_size: String,
    #[serde(default)]
    pub compatible_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Template {
    pub fn is_published(&self) -> bool {
        self.status == TemplateStatus::Published
    }

    /// Numeric download count (`"1.2k"` -> 1200).
    pub fn download_count(&self) -> f64 {
        parse_downloads(&self.downloads)
    }
}

/// Interpret a downloads label as an absolute count.
///
/// The label is a number of thousands with an optional `k` suffix; the suffix
/// is stripped and the value scaled by 1000. Unparseable labels count as 0.
pub fn parse_downloads(label: &str) -> f64 {
    let trimmed = label.trim();
    let number = trimmed
        .strip_suffix('k')
        .or_else(|| trimmed.strip_suffix('K'))
        .unwrap_or(trimmed)
        .trim();
    match number.parse::<f64>() {
        Ok(n) if n.is_finite() => n * 1000.0,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Editor form contents used to create a template.
///
/// `category` is optional here so an incomplete form can be represented and
/// validated; the store rejects a row without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateInput {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TemplateCategory>,
    pub budget: f64,
    pub rating: u8,
    pub downloads: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub featured: bool,
    pub status: TemplateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub version: String,
    pub file_size: String,
    pub compatible_with: Vec<String>,
}

impl Default for TemplateInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            full_description: None,
            category: None,
            budget: 0.0,
            rating: DEFAULT_RATING,
            downloads: "0k".to_string(),
            image: String::new(),
            technologies: Vec::new(),
            features: Vec::new(),
            featured: false,
            status: TemplateStatus::Draft,
            demo_url: None,
            download_url: None,
            version: "1.0.0".to_string(),
            file_size: String::new(),
            compatible_with: Vec::new(),
        }
    }
}

impl From<&Template> for TemplateInput {
    /// Pre-fill the editor form from an existing record.
    fn from(t: &Template) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            full_description: t.full_description.clone(),
            category: Some(t.category),
            budget: t.budget,
            rating: t.rating,
            downloads: t.downloads.clone(),
            image: t.image.clone(),
            technologies: t.technologies.clone(),
            features: t.features.clone(),
            featured: t.featured,
            status: t.status,
            demo_url: t.demo_url.clone(),
            download_url: t.download_url.clone(),
            version: t.version.clone(),
            file_size: t.file_size.clone(),
            compatible_with: t.compatible_with.clone(),
        }
    }
}

/// Partial update. Only `Some` fields are sent to the store.
///
/// Nullable columns use `Option<Option<String>>`: `Some(None)` clears the
/// column (serialized as `null`), `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub full_description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TemplateCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TemplateStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub demo_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub download_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatible_with: Option<Vec<String>>,
}

/// Deserialize a present field, `null` included, as `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TemplatePatch {
    pub fn featured(featured: bool) -> Self {
        Self {
            featured: Some(featured),
            ..Default::default()
        }
    }

    pub fn status(status: TemplateStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Replace every editable field with the form contents.
    pub fn from_input(input: &TemplateInput) -> Self {
        Self {
            title: Some(input.title.clone()),
            description: Some(input.description.clone()),
            full_description: Some(input.full_description.clone()),
            category: input.category,
            budget: Some(input.budget),
            rating: Some(input.rating),
            downloads: Some(input.downloads.clone()),
            image: Some(input.image.clone()),
            technologies: Some(input.technologies.clone()),
            features: Some(input.features.clone()),
            featured: Some(input.featured),
            status: Some(input.status),
            demo_url: Some(input.demo_url.clone()),
            download_url: Some(input.download_url.clone()),
            version: Some(input.version.clone()),
            file_size: Some(input.file_size.clone()),
            compatible_with: Some(input.compatible_with.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tokens_round_trip() {
        for category in TemplateCategory::ALL {
            let parsed: TemplateCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
    }

    #[test]
    fn unknown_category_rejected() {
        let err = "video-game".parse::<TemplateCategory>().unwrap_err();
        assert!(err.to_string().contains("video-game"));
    }

    #[test]
    fn status_toggles() {
        assert_eq!(TemplateStatus::Draft.toggled(), TemplateStatus::Published);
        assert_eq!(TemplateStatus::Published.toggled(), TemplateStatus::Draft);
    }

    #[test]
    fn downloads_label_parsing() {
        assert_eq!(parse_downloads("1k"), 1000.0);
        assert_eq!(parse_downloads("2.5k"), 2500.0);
        assert_eq!(parse_downloads("0k"), 0.0);
        assert_eq!(parse_downloads("3K"), 3000.0);
        assert_eq!(parse_downloads("4"), 4000.0);
        assert_eq!(parse_downloads("many"), 0.0);
        assert_eq!(parse_downloads(""), 0.0);
    }

    #[test]
    fn template_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Admin Kit",
            "description": "Dashboard starter",
            "category": "dashboard",
            "image": "https://cdn.example.com/a.png"
        });
        let t: Template = serde_json::from_value(json).unwrap();
        assert_eq!(t.rating, DEFAULT_RATING);
        assert_eq!(t.status, TemplateStatus::Draft);
        assert!(t.technologies.is_empty());
        assert!(t.created_at.is_none());
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let value = serde_json::to_value(TemplatePatch::featured(true)).unwrap();
        assert_eq!(value, serde_json::json!({ "featured": true }));
        assert!(TemplatePatch::default().is_empty());
    }

    #[test]
    fn full_edit_sends_null_for_cleared_columns() {
        let input = TemplateInput {
            demo_url: Some("https://demo.example.com".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(TemplatePatch::from_input(&input)).unwrap();
        assert_eq!(value["fullDescription"], serde_json::Value::Null);
        assert_eq!(value["downloadUrl"], serde_json::Value::Null);
        assert!(value.as_object().unwrap().contains_key("fullDescription"));
        assert_eq!(value["demoUrl"], "https://demo.example.com");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: TemplatePatch =
            serde_json::from_value(serde_json::json!({ "demoUrl": null })).unwrap();
        assert_eq!(patch.demo_url, Some(None));
        assert_eq!(patch.full_description, None);
    }

    #[test]
    fn input_without_category_omits_key() {
        let value = serde_json::to_value(TemplateInput::default()).unwrap();
        assert!(value.get("category").is_none());
        assert_eq!(value["version"], "1.0.0");
    }
}
