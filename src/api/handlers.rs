//! HTTP request handlers for the item pages

use crate::api::models::{HealthResponse, ItemInput, StorageHealth};
use crate::config::FeedbackMode;
use crate::error::AppError;
use crate::response::{Flash, FormValues, Views};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{info, warn};

/// Page handlers answer with a rendered page either way
type PageResult = Result<Response, Response>;

/// Turns an unexpected error into the error page
trait OrErrorPage<T> {
    fn or_error_page(self, views: &Views) -> Result<T, Response>;
}

impl<T> OrErrorPage<T> for Result<T, AppError> {
    fn or_error_page(self, views: &Views) -> Result<T, Response> {
        self.map_err(|e| views.failure(&e))
    }
}

/// Which form a rejected submission goes back to
enum FormPage {
    New,
    Edit(String),
}

impl FormPage {
    fn path(&self) -> String {
        match self {
            FormPage::New => "/items/new".to_string(),
            FormPage::Edit(id) => format!("/items/{}/edit", id),
        }
    }
}

/// Report a validation or duplicate-name failure back to the user
async fn reject_form(
    state: &AppState,
    flash: &Flash<'_>,
    page: FormPage,
    values: &FormValues,
    message: &str,
) -> PageResult {
    match state.settings.ui.feedback {
        FeedbackMode::Flash => {
            flash.error(message).await.or_error_page(&state.views)?;
            Ok(Redirect::to(&page.path()).into_response())
        }
        FeedbackMode::Inline => {
            let messages = flash.take().await.or_error_page(&state.views)?;
            let html = match page {
                FormPage::New => state.views.new_item(values, Some(message), &messages),
                FormPage::Edit(_) => state.views.edit_item(values, Some(message), &messages),
            }
            .or_error_page(&state.views)?;
            Ok(html.into_response())
        }
    }
}

/// Send the user back to the list when the item they edit is gone
async fn missing_item(state: &AppState, flash: &Flash<'_>) -> PageResult {
    match state.settings.ui.feedback {
        FeedbackMode::Flash => {
            flash.error("Item not found").await.or_error_page(&state.views)?;
            Ok(Redirect::to("/items").into_response())
        }
        FeedbackMode::Inline => Err(state.views.failure(&AppError::item_not_found())),
    }
}

/// Landing page
pub async fn root() -> Redirect {
    Redirect::to("/items")
}

/// List all items, newest first
pub async fn list_items(State(state): State<Arc<AppState>>, session: Session) -> PageResult {
    let flash = Flash::new(&session);
    let messages = flash.take().await.or_error_page(&state.views)?;
    let items = state.store.find_all().await.or_error_page(&state.views)?;

    let html = state
        .views
        .item_list(&items, &messages)
        .or_error_page(&state.views)?;
    Ok(html.into_response())
}

/// Empty create form
pub async fn new_item_form(State(state): State<Arc<AppState>>, session: Session) -> PageResult {
    let messages = Flash::new(&session).take().await.or_error_page(&state.views)?;

    let html = state
        .views
        .new_item(&FormValues::default(), None, &messages)
        .or_error_page(&state.views)?;
    Ok(html.into_response())
}

/// Create an item from a form submission
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    session: Session,
    ItemInput(form): ItemInput,
) -> PageResult {
    let flash = Flash::new(&session);

    let result = async {
        let data = form.resolve(None)?;
        state.store.create(data).await
    }
    .await;

    match result {
        Ok(item) => {
            info!(id = %item.id, name = %item.name, "Item created");
            flash
                .success("Item created successfully!")
                .await
                .or_error_page(&state.views)?;
            Ok(Redirect::to("/items").into_response())
        }
        Err(e) if e.is_user_error() => {
            warn!(error = %e, "Item creation rejected");
            reject_form(&state, &flash, FormPage::New, &form.values(None), &e.to_string()).await
        }
        Err(e) => Err(state.views.failure(&e)),
    }
}

/// Edit form for an existing item
pub async fn edit_item_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> PageResult {
    let messages = Flash::new(&session).take().await.or_error_page(&state.views)?;
    let item = state.store.find_by_id(&id).await.or_error_page(&state.views)?;

    let html = state
        .views
        .edit_item(&FormValues::from(&item), None, &messages)
        .or_error_page(&state.views)?;
    Ok(html.into_response())
}

/// Update an item from a form submission
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
    ItemInput(form): ItemInput,
) -> PageResult {
    let flash = Flash::new(&session);

    let existing = match state.store.find_by_id(&id).await {
        Ok(item) => item,
        Err(AppError::NotFound(_)) => {
            warn!(id = %id, "Update requested for unknown item");
            return missing_item(&state, &flash).await;
        }
        Err(e) => return Err(state.views.failure(&e)),
    };

    let result = async {
        let data = form.resolve(Some(&existing))?;
        state.store.update(&id, data).await
    }
    .await;

    match result {
        Ok(item) => {
            info!(id = %item.id, name = %item.name, "Item updated");
            flash
                .success("Item updated successfully!")
                .await
                .or_error_page(&state.views)?;
            Ok(Redirect::to("/items").into_response())
        }
        Err(e) if e.is_user_error() => {
            warn!(id = %id, error = %e, "Item update rejected");
            let values = form.values(Some(&existing));
            reject_form(&state, &flash, FormPage::Edit(id), &values, &e.to_string()).await
        }
        Err(AppError::NotFound(_)) => missing_item(&state, &flash).await,
        Err(e) => Err(state.views.failure(&e)),
    }
}

/// Delete an item; answers with a status code for the page script
pub async fn delete_item(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.delete(&id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "Item not found" })),
        )
            .into_response(),
        Ok(_) => {
            info!(id = %id, "Item deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Item deletion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Storage is unavailable")
    )
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, AppError> {
    let items = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: StorageHealth {
            backend: state.store.backend().to_string(),
            items,
        },
    }))
}
