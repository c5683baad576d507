//! REST table client and identity client against a mock HTTP server.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use storefront_core::template::TemplateStatus;
use storefront_db::auth::{AuthClient, AuthError, AuthEvent};
use storefront_db::client::{Access, Filter, RestClient, Table, TableClient};
use storefront_db::repositories::{CustomSolutionRepo, TemplateRepo};
use storefront_db::StoreError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rest_client(server: &MockServer, service_key: Option<&str>) -> RestClient {
    RestClient::new(
        server.uri(),
        "anon-key",
        service_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn template_row(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Template {id}"),
        "description": "A template",
        "full_description": null,
        "category": "portfolio",
        "budget": 19.0,
        "rating": 4,
        "downloads": "1.5k",
        "image_url": "https://cdn.example.com/t.png",
        "technologies": ["Astro"],
        "features": [],
        "featured": false,
        "status": status,
        "demo_url": null,
        "download_url": null,
        "version": "1.0.0",
        "file_size": "2 MB",
        "compatible_with": [],
        "created_at": "2026-03-01T10:00:00.123456+00:00",
        "updated_at": "2026-03-01T10:00:00.123456+00:00"
    })
}

// ---------------------------------------------------------------------------
// Table client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_sends_filters_and_public_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/templates"))
        .and(query_param("status", "eq.published"))
        .and(query_param("order", "id.asc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([template_row(1, "published")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server, None);
    let templates = TemplateRepo::list_published(&client, Access::Public).await.unwrap();

    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].status, TemplateStatus::Published);
    assert_eq!(templates[0].image, "https://cdn.example.com/t.png");
    assert_eq!(templates[0].download_count(), 1500.0);
}

#[tokio::test]
async fn admin_writes_use_service_key_and_return_representation() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/templates"))
        .and(query_param("id", "eq.4"))
        .and(header("apikey", "service-key"))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([template_row(4, "published")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server, Some("service-key"));
    let updated = TemplateRepo::set_status(&client, 4, TemplateStatus::Published)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, 4);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["status"], "published");
    assert!(body.get("updated_at").is_some());
}

#[tokio::test]
async fn empty_update_response_means_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = rest_client(&server, Some("service-key"));
    assert!(TemplateRepo::set_featured(&client, 9, true).await.unwrap().is_none());
    assert!(!TemplateRepo::delete(&client, 9).await.unwrap());
}

#[tokio::test]
async fn admin_call_without_service_key_never_hits_the_network() {
    let server = MockServer::start().await;
    let client = rest_client(&server, None);

    let err = TemplateRepo::delete(&client, 1).await.unwrap_err();
    assert_matches!(err, StoreError::AdminUnavailable);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/custom_solutions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "23514",
            "message": "new row violates check constraint"
        })))
        .mount(&server)
        .await;

    let client = rest_client(&server, None);
    let row = json!({"name": "Ada"}).as_object().cloned().unwrap();
    let err = client
        .insert(Table::CustomSolutions, row, Access::Public)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        StoreError::Api { status: 400, ref message } if message == "new row violates check constraint"
    );
}

#[tokio::test]
async fn select_by_id_returns_first_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/templates"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([template_row(2, "draft")])))
        .mount(&server)
        .await;

    let client = rest_client(&server, None);
    let row = client
        .select_by_id(Table::Templates, 2, Access::Public)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["id"], 2);

    let rows = client
        .select(Table::Templates, &Filter::new().eq("id", 2), Access::Public)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn request_reads_follow_caller_access() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/custom_solutions"))
        .and(query_param("id", "eq.7"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server, None);
    let found = CustomSolutionRepo::find_by_id(&client, 7, Access::Public)
        .await
        .unwrap();
    assert!(found.is_none());

    let err = CustomSolutionRepo::find_by_id(&client, 7, Access::Admin)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::AdminUnavailable);
}

// ---------------------------------------------------------------------------
// Identity client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_in_stores_session_and_broadcasts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({"email": "admin@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": "user-1", "email": "admin@example.com"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(server.uri(), "anon-key", Duration::from_secs(5)).unwrap();
    let mut events = auth.subscribe();

    let session = auth.sign_in("admin@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user.id, "user-1");
    assert_eq!(auth.current_session(), Some(session.clone()));
    assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn(session));

    auth.sign_out().await.unwrap();
    assert!(auth.current_session().is_none());
    assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
}

#[tokio::test]
async fn bad_credentials_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let auth = AuthClient::new(server.uri(), "anon-key", Duration::from_secs(5)).unwrap();
    let err = auth.sign_in("admin@example.com", "wrong").await.unwrap_err();

    assert_matches!(err, AuthError::Rejected(ref m) if m == "Invalid email or password");
    assert!(auth.current_session().is_none());
}
