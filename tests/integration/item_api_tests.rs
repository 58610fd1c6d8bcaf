//! Item page integration tests

use super::common::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use inventory_web::config::FeedbackMode;
use inventory_web::store::ItemData;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_redirects_to_items() {
    let app = test_app(FeedbackMode::Flash).await;
    let response = app.router.oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/items"));
}

#[tokio::test]
async fn test_empty_list() {
    let app = test_app(FeedbackMode::Flash).await;
    let response = app.router.oneshot(get("/items", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No items yet"));
}

#[tokio::test]
async fn test_create_then_list() {
    let app = test_app(FeedbackMode::Flash).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/items",
            "name=Laptop&description=Dell+XPS+13&quantity=10",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/items"));
    let cookie = session_cookie(&response).expect("flash should start a session");

    let response = app
        .router
        .clone()
        .oneshot(get("/items", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Laptop"));
    assert!(body.contains("Dell XPS 13"));
    assert!(body.contains("Item created successfully!"));

    // shown once
    let response = app
        .router
        .oneshot(get("/items", Some(&cookie)))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains("Laptop"));
    assert!(!body.contains("Item created successfully!"));
}

#[tokio::test]
async fn test_create_accepts_json_body() {
    let app = test_app(FeedbackMode::Flash).await;
    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/items",
            r#"{"name":"Mouse","description":"Wireless Mouse","quantity":30}"#,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let items = app.state.store.find_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 30);
}

#[tokio::test]
async fn test_invalid_quantity_flashes_and_redirects_to_form() {
    let app = test_app(FeedbackMode::Flash).await;

    for quantity in ["-1", "abc"] {
        let body = format!("name=Laptop&description=Dell&quantity={}", quantity);
        let response = app
            .router
            .clone()
            .oneshot(form_post("/items", &body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/items/new"));
        let cookie = session_cookie(&response).unwrap();

        let response = app
            .router
            .clone()
            .oneshot(get("/items/new", Some(&cookie)))
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("Quantity must be a non-negative number"));
    }

    assert_eq!(app.state.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_name_is_reported() {
    let app = test_app(FeedbackMode::Flash).await;
    app.state
        .store
        .create(ItemData::new("Monitor", "24-inch", 15))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/items",
            "name=Monitor&description=Another&quantity=1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/items/new"));
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .router
        .oneshot(get("/items/new", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response)
        .await
        .contains("An item with this name already exists"));
    assert_eq!(app.state.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_inline_feedback_rerenders_form() {
    let app = test_app(FeedbackMode::Inline).await;
    let response = app
        .router
        .oneshot(form_post(
            "/items",
            "name=&description=Dell&quantity=10",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Name and description are required"));
    assert!(page.contains(r#"value="10""#));
    assert!(page.contains(">Dell</textarea>"));
}

#[tokio::test]
async fn test_edit_form_and_update() {
    let app = test_app(FeedbackMode::Flash).await;
    let item = app
        .state
        .store
        .create(ItemData::new("Keyboard", "Mechanical Keyboard, RGB", 25))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/items/{}/edit", item.id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"value="Keyboard""#));
    assert!(page.contains(&format!(r#"action="/items/{}""#, item.id)));

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            &format!("/items/{}", item.id),
            "name=Keyboard&description=Mechanical+Keyboard&quantity=20",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/items"));
    let cookie = session_cookie(&response).unwrap();

    let updated = app.state.store.find_by_id(&item.id).await.unwrap();
    assert_eq!(updated.description, "Mechanical Keyboard");
    assert_eq!(updated.quantity, 20);

    let response = app
        .router
        .oneshot(get("/items", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response)
        .await
        .contains("Item updated successfully!"));
}

#[tokio::test]
async fn test_update_rejects_bad_quantity() {
    let app = test_app(FeedbackMode::Flash).await;
    let item = app
        .state
        .store
        .create(ItemData::new("Webcam", "HD USB Webcam", 12))
        .await
        .unwrap();

    for quantity in ["-1", "abc"] {
        let body = format!("name=Webcam&description=HD&quantity={}", quantity);
        let response = app
            .router
            .clone()
            .oneshot(form_post(&format!("/items/{}", item.id), &body, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            Some(format!("/items/{}/edit", item.id).as_str())
        );
        let cookie = session_cookie(&response).unwrap();

        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/items/{}/edit", item.id), Some(&cookie)))
            .await
            .unwrap();
        assert!(body_text(response)
            .await
            .contains("Quantity must be a non-negative number"));

        let unchanged = app.state.store.find_by_id(&item.id).await.unwrap();
        assert_eq!(unchanged, item, "quantity={}", quantity);
    }
}

#[tokio::test]
async fn test_inline_update_rejects_non_numeric_quantity() {
    let app = test_app(FeedbackMode::Inline).await;
    let item = app
        .state
        .store
        .create(ItemData::new("Webcam", "HD USB Webcam", 12))
        .await
        .unwrap();

    let response = app
        .router
        .oneshot(form_post(
            &format!("/items/{}", item.id),
            "name=Webcam&description=HD&quantity=abc",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Quantity must be a non-negative number"));
    assert!(page.contains(r#"value="abc""#));
    assert_eq!(app.state.store.find_by_id(&item.id).await.unwrap(), item);
}

#[tokio::test]
async fn test_unknown_item_pages() {
    let app = test_app(FeedbackMode::Flash).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/items/unknown/edit", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Item not found"));

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/items/unknown",
            "name=Ghost&description=Gone&quantity=1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/items"));
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .router
        .oneshot(get("/items", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Item not found"));
}

#[tokio::test]
async fn test_delete_item() {
    let app = test_app(FeedbackMode::Flash).await;
    let item = app
        .state
        .store
        .create(ItemData::new("Mouse", "Wireless Mouse", 30))
        .await
        .unwrap();

    let delete = |id: &str| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/items/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.router.clone().oneshot(delete(&item.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.state.store.count().await.unwrap(), 0);

    let response = app.router.oneshot(delete(&item.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Item not found");
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(FeedbackMode::Flash).await;
    app.state
        .store
        .create(ItemData::new("Laptop", "Dell", 1))
        .await
        .unwrap();

    let response = app.router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage"]["backend"], "sqlite");
    assert_eq!(json["storage"]["items"], 1);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app(FeedbackMode::Flash).await;
    let response = app
        .router
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/api/tasks"));
}
