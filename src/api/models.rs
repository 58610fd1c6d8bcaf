//! API request and response models

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::response::FormValues;
use crate::store::{Item, ItemData, RawQuantity, QUANTITY_MESSAGE, REQUIRED_FIELDS_MESSAGE};

/// Item fields as posted by the create/edit forms
///
/// Every field is optional so that an update may send only what changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
}

impl ItemForm {
    /// Resolve into storable data, filling absent fields from `existing`
    pub fn resolve(&self, existing: Option<&Item>) -> Result<ItemData> {
        let name = self
            .name
            .clone()
            .or_else(|| existing.map(|item| item.name.clone()))
            .unwrap_or_default();
        let description = self
            .description
            .clone()
            .or_else(|| existing.map(|item| item.description.clone()))
            .unwrap_or_default();

        if name.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let quantity = match (&self.quantity, existing) {
            (Some(raw), _) => raw.parse()?,
            (None, Some(item)) => item.quantity,
            (None, None) => return Err(AppError::Validation(QUANTITY_MESSAGE.to_string())),
        };

        ItemData::new(name, description, quantity).validated()
    }

    /// Values to show when the form is rendered again
    pub fn values(&self, existing: Option<&Item>) -> FormValues {
        let fallback = existing.map(FormValues::from).unwrap_or_default();

        FormValues {
            id: fallback.id,
            name: self.name.clone().unwrap_or(fallback.name),
            description: self.description.clone().unwrap_or(fallback.description),
            quantity: match &self.quantity {
                Some(RawQuantity::Integer(n)) => n.to_string(),
                Some(RawQuantity::Float(f)) => f.to_string(),
                Some(RawQuantity::Text(s)) => s.clone(),
                None => fallback.quantity,
            },
        }
    }
}

/// Extracts an [`ItemForm`] from either a urlencoded or a JSON body
#[derive(Debug, Clone)]
pub struct ItemInput(pub ItemForm);

#[async_trait]
impl<S> FromRequest<S> for ItemInput
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"));

        if is_json {
            let Json(form) = Json::<ItemForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form))
        } else {
            let Form(form) = Form::<ItemForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form))
        }
    }
}

/// Username/password pair for register and login
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Task as exposed by the API; any additional JSON fields are kept verbatim
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TaskSchema {
    /// Server assigned identifier
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageHealth,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct StorageHealth {
    pub backend: String,
    pub items: u64,
}
