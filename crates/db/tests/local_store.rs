//! Public submission flow persisted through the file-backed store.

use chrono::{TimeZone, Utc};
use storefront_core::custom_solution::{CustomSolutionForm, RequestStatus, Service};
use storefront_db::local::{FileStore, KeyValueStore};
use storefront_db::local_submissions::{
    get_stored_custom_solutions, save_custom_solution, update_stored_custom_solution_status,
    SubmissionOutcome, CUSTOM_SOLUTIONS_KEY,
};

fn form() -> CustomSolutionForm {
    CustomSolutionForm {
        name: "Margaret".into(),
        email: "margaret@example.com".into(),
        service: Some(Service::FrontendDevelopment),
        website_type: Some("portfolio".into()),
        technologies: vec!["React".into()],
        ..Default::default()
    }
}

#[test]
fn submissions_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.json");
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 30, 0).unwrap();

    let store = FileStore::new(&path);
    let SubmissionOutcome::Submitted(saved) = save_custom_solution(&store, form(), now) else {
        panic!("submission should succeed");
    };
    assert!(update_stored_custom_solution_status(&store, &saved.id, RequestStatus::Completed, now)
        .unwrap());

    let reopened = FileStore::new(&path);
    let stored = get_stored_custom_solutions(&reopened);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, saved.id);
    assert_eq!(stored[0].status, RequestStatus::Completed);

    // The stored payload uses the UI field names.
    let raw = reopened.get_item(CUSTOM_SOLUTIONS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"websiteType\":\"portfolio\""));
    assert!(raw.contains("\"service\":\"frontend-development\""));
}

#[test]
fn corrupt_collection_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("local.json"));
    store.set_item(CUSTOM_SOLUTIONS_KEY, "[{\"id\":").unwrap();

    assert!(get_stored_custom_solutions(&store).is_empty());

    let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
    assert!(save_custom_solution(&store, form(), now).is_success());
    assert_eq!(get_stored_custom_solutions(&store).len(), 1);
}
