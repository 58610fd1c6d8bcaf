//! Server-side page rendering

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::response::flash::FlashMessages;
use crate::store::Item;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.hbs")),
    ("items/index", include_str!("../../templates/items/index.hbs")),
    ("items/new", include_str!("../../templates/items/new.hbs")),
    ("items/edit", include_str!("../../templates/items/edit.hbs")),
    ("item_form", include_str!("../../templates/items/form.hbs")),
    ("error", include_str!("../../templates/error.hbs")),
];

/// Values shown in the item form fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormValues {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub quantity: String,
}

impl From<&Item> for FormValues {
    fn from(item: &Item) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity.to_string(),
        }
    }
}

/// Template registry for all HTML pages
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    /// Register the embedded templates
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, *source)
                .map_err(|e| AppError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        Ok(Self { registry })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<Html<String>> {
        Ok(Html(self.registry.render(name, data)?))
    }

    pub fn item_list(&self, items: &[Item], messages: &FlashMessages) -> Result<Html<String>> {
        let rows: Vec<_> = items
            .iter()
            .map(|item| {
                json!({
                    "id": item.id,
                    "name": item.name,
                    "description": item.description,
                    "quantity": item.quantity,
                    "out_of_stock": item.quantity == 0,
                    "created_at": item.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    "updated_at": item.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                })
            })
            .collect();

        self.render(
            "items/index",
            &json!({
                "title": "Items",
                "items": rows,
                "count": items.len(),
                "messages": messages,
            }),
        )
    }

    pub fn new_item(
        &self,
        values: &FormValues,
        error: Option<&str>,
        messages: &FlashMessages,
    ) -> Result<Html<String>> {
        self.render(
            "items/new",
            &json!({
                "title": "New Item",
                "item": values,
                "error": error,
                "messages": messages,
            }),
        )
    }

    pub fn edit_item(
        &self,
        values: &FormValues,
        error: Option<&str>,
        messages: &FlashMessages,
    ) -> Result<Html<String>> {
        self.render(
            "items/edit",
            &json!({
                "title": "Edit Item",
                "item": values,
                "error": error,
                "messages": messages,
            }),
        )
    }

    /// Error page response; falls back to plain text if rendering itself fails
    pub fn error_page(&self, status: StatusCode, message: &str) -> Response {
        match self.render("error", &json!({ "title": "Error", "message": message })) {
            Ok(html) => (status, html).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, message.to_string()).into_response()
            }
        }
    }

    /// Error page for an unexpected failure while serving a page
    pub fn failure(&self, err: &AppError) -> Response {
        match err {
            AppError::NotFound(_) => self.error_page(StatusCode::NOT_FOUND, &err.to_string()),
            _ => {
                tracing::error!(error = %err, kind = err.kind(), "Page request failed");
                self.error_page(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
            }
        }
    }
}
