//! Seeding against real on-disk stores, and the seeded data as served by the app

use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use inventory_web::{
    api::routes::create_router,
    config::{Settings, StorageBackend, StorageConfig},
    store::{self, seed},
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

fn storage(backend: StorageBackend, path: &std::path::Path, seed_on_start: bool) -> StorageConfig {
    StorageConfig {
        backend,
        path: path.to_str().unwrap().to_string(),
        seed_on_start,
    }
}

#[tokio::test]
async fn test_seed_is_idempotent_for_both_backends() {
    for (backend, file) in [
        (StorageBackend::Sqlite, "items.db"),
        (StorageBackend::Document, "items.redb"),
    ] {
        let dir = tempfile::tempdir().unwrap();
        let config = storage(backend, &dir.path().join(file), false);

        let items = store::open_store(&config).await.unwrap();
        let first = seed::seed_items(items.as_ref()).await.unwrap();
        assert_eq!(first.inserted.len(), 5, "{}", backend);
        assert!(first.skipped.is_empty());

        let second = seed::seed_items(items.as_ref()).await.unwrap();
        assert!(second.inserted.is_empty());
        assert_eq!(
            second.skipped,
            vec!["Laptop", "Monitor", "Keyboard", "Mouse", "Webcam"]
        );
        assert_eq!(items.count().await.unwrap(), 5);
    }
}

#[tokio::test]
async fn test_seeded_document_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = storage(StorageBackend::Document, &dir.path().join("items.redb"), true);

    let first = store::open_store(&config).await.unwrap();
    assert_eq!(first.count().await.unwrap(), 5);
    drop(first);

    let reopened = store::open_store(&config).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 5);

    let laptop = reopened
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .find(|item| item.name == "Laptop")
        .unwrap();
    assert_eq!(laptop.description, "Dell XPS 13, 16GB RAM, 512GB SSD");
    assert_eq!(laptop.quantity, 10);
}

#[tokio::test]
async fn test_seeded_items_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage = storage(StorageBackend::Sqlite, &dir.path().join("items.db"), true);
    settings.session.path = dir.path().join("sessions.db").to_str().unwrap().to_string();

    let state = Arc::new(AppState::from_settings(settings).await.unwrap());
    let router = create_router(state);

    let response = router
        .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    for name in ["Laptop", "Monitor", "Keyboard", "Mouse", "Webcam"] {
        assert!(page.contains(name), "missing {}", name);
    }

    // newest first
    let webcam = page.find("Webcam").unwrap();
    let laptop = page.find("Laptop").unwrap();
    assert!(webcam < laptop);
}
