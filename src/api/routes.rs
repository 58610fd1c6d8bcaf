//! HTTP route definitions

use crate::api::models::*;
use crate::api::{auth_handlers, handlers, task_handlers};
use crate::middleware::require_bearer;
use crate::sessions::session_layer;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Web API",
        version = "0.3.1",
        description = "Inventory item pages and a token protected task API.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        handlers::health_check,
        auth_handlers::register,
        auth_handlers::login,
        task_handlers::list_tasks,
        task_handlers::create_task,
        task_handlers::update_task,
        task_handlers::delete_task,
    ),
    components(schemas(
        Credentials,
        TokenResponse,
        TaskSchema,
        HealthResponse,
        StorageHealth,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account registration and login"),
        (name = "Tasks", description = "Task endpoints"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by the task paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let sessions = session_layer(state.sessions.clone(), &state.settings.session);

    // Item pages carry the session used for flash messages
    let pages = Router::new()
        .route("/", get(handlers::root))
        .route("/items", get(handlers::list_items).post(handlers::create_item))
        .route("/items/new", get(handlers::new_item_form))
        .route("/items/:id/edit", get(handlers::edit_item_form))
        .route(
            "/items/:id",
            post(handlers::update_item).delete(handlers::delete_item),
        )
        .layer(sessions);

    let task_api = Router::new()
        .route(
            "/tasks",
            get(task_handlers::list_tasks).post(task_handlers::create_task),
        )
        .route(
            "/tasks/:id",
            put(task_handlers::update_task).delete(task_handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let auth_api = Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login));

    Router::new()
        .merge(pages)
        // Health check endpoint (no auth required)
        .route("/health", get(handlers::health_check))
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/public", ServeDir::new(&state.settings.server.public_dir))
        .nest("/api", task_api.merge(auth_api))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
