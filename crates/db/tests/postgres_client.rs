//! Postgres table client against a real database.
//!
//! Requires `DATABASE_URL`; run with `cargo test -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use storefront_core::custom_solution::{CustomSolutionForm, Priority, RequestStatus, Service};
use storefront_core::template::{TemplateCategory, TemplateInput, TemplatePatch, TemplateStatus};
use storefront_db::client::{Access, PgClient};
use storefront_db::repositories::{CustomSolutionRepo, TemplateRepo};
use storefront_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_template(title: &str) -> TemplateInput {
    TemplateInput {
        title: title.to_string(),
        description: "Starter kit".to_string(),
        full_description: Some("Everything included".to_string()),
        category: Some(TemplateCategory::LandingPage),
        budget: 29.99,
        image: "https://cdn.example.com/landing.png".to_string(),
        technologies: vec!["Vue".into()],
        compatible_with: vec!["Firefox".into()],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn template_crud(pool: PgPool) {
    let client = PgClient::new(pool);

    let created = TemplateRepo::create(&client, &new_template("Launch")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.full_description.as_deref(), Some("Everything included"));
    assert_eq!(created.compatible_with, vec!["Firefox".to_string()]);
    assert_eq!(created.status, TemplateStatus::Draft);
    assert!(created.created_at.is_some());

    let patch = TemplatePatch {
        title: Some("Launch Pro".into()),
        featured: Some(true),
        ..Default::default()
    };
    let updated = TemplateRepo::update(&client, created.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.title, "Launch Pro");
    assert!(updated.featured);
    assert_eq!(updated.budget, 29.99);
    assert!(updated.updated_at >= created.updated_at);

    let featured = TemplateRepo::list_featured(&client, Access::Public).await.unwrap();
    assert_eq!(featured.len(), 1);

    assert!(TemplateRepo::delete(&client, created.id).await.unwrap());
    assert!(TemplateRepo::find_by_id(&client, created.id, Access::Public)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn check_constraints_surface_as_errors(pool: PgPool) {
    let client = PgClient::new(pool);
    let input = TemplateInput {
        rating: 9,
        ..new_template("Broken")
    };
    let err = TemplateRepo::create(&client, &input).await.unwrap_err();
    assert_matches!(err, StoreError::Database(_));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn custom_solution_lifecycle(pool: PgPool) {
    let client = PgClient::new(pool);
    let form = CustomSolutionForm {
        name: "Linus".into(),
        email: "linus@example.com".into(),
        service: Some(Service::FrontendDevelopment),
        website_type: Some("e-commerce".into()),
        technologies: vec!["Svelte".into(), "Stripe".into()],
        ..Default::default()
    };
    let created = CustomSolutionRepo::create(&client, &form.into_submission().unwrap())
        .await
        .unwrap();
    assert_eq!(created.status, RequestStatus::Pending);
    let id = created.id.as_server().unwrap();

    let updated = CustomSolutionRepo::update_priority(&client, id, Priority::High)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.details.technologies().len(), 2);

    assert!(CustomSolutionRepo::delete(&client, id).await.unwrap());
    assert!(!CustomSolutionRepo::delete(&client, id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn public_only_client_refuses_admin_calls(pool: PgPool) {
    let client = PgClient::public_only(pool);
    let err = TemplateRepo::create(&client, &new_template("Nope")).await.unwrap_err();
    assert_matches!(err, StoreError::AdminUnavailable);
}
