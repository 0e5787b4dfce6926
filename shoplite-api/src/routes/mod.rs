/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `products`: Product CRUD
/// - `orders`: Order creation, listing (product expanded), deletion
/// - `users`: Signup, login, user management

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

pub mod health;
pub mod orders;
pub mod products;
pub mod users;

/// Hypermedia-style follow-up link embedded in success responses
///
/// Describes the canonical next HTTP call for the resource in the response.
/// A minimal affordance, not full HATEOAS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLink {
    /// HTTP method of the follow-up call
    pub method: String,

    /// Server-relative URL of the follow-up call
    pub url: String,
}

impl RequestLink {
    /// Link to a GET of the given path
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
        }
    }

    /// Link to a POST of the given path
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
        }
    }
}

/// Flattens validator errors into the API's validation error shape
pub(crate) fn validation_errors(e: validator::ValidationErrors) -> crate::error::ApiError {
    let errors: Vec<crate::error::ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors
                .iter()
                .map(move |error| crate::error::ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
        })
        .collect();

    crate::error::ApiError::ValidationError(errors)
}

/// Fallback handler for unmatched routes
///
/// Keeps the error contract structured JSON even for 404s outside the API
/// surface.
pub async fn not_found() -> (StatusCode, Json<crate::error::ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(crate::error::ErrorResponse {
            error: crate::error::ErrorDetail {
                code: "not_found".to_string(),
                message: "Route not found".to_string(),
                details: None,
            },
        }),
    )
}
