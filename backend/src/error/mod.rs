use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::ticket::TicketStatus;

/// Field name to the list of messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    InvalidTransition {
        from: TicketStatus,
        to: TicketStatus,
    },
    InternalServerError(anyhow::Error),
    Validation(FieldErrors),
    Unprocessable(FieldErrors),
}

impl AppError {
    /// Builds a validation error carrying a single field message.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    /// Re-labels field validation failures as 422 for endpoints that report them that way.
    pub fn into_unprocessable(self) -> Self {
        match self {
            AppError::Validation(errors) => AppError::Unprocessable(errors),
            other => other,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::InvalidTransition { from, to } => {
                write!(f, "invalid status transition: {} -> {}", from.label(), to.label())
            }
            AppError::InternalServerError(err) => write!(f, "internal error: {}", err),
            AppError::Validation(errors) | AppError::Unprocessable(errors) => {
                write!(f, "validation failed on {} field(s)", errors.len())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "Unauthorized.".to_string(),
                Some(json!({ "error": msg })),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::InvalidTransition { from, to } => (
                StatusCode::BAD_REQUEST,
                "Invalid status transition.".to_string(),
                Some(json!({
                    "status": [format!(
                        "Status update not allowed from {} to {}.",
                        from.label(),
                        to.label()
                    )]
                })),
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation Error.".to_string(),
                Some(json!(errors)),
            ),
            AppError::Unprocessable(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Error.".to_string(),
                Some(json!(errors)),
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Validation(json_data_field_errors(&err.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Splits `"<path>: <reason>"` from a JSON data rejection into a field error.
/// Errors without a field path are reported under `body`.
fn json_data_field_errors(text: &str) -> FieldErrors {
    let detail = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    let (field, reason) = match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && !path.contains(' ') => (path, reason),
        _ => ("body", detail),
    };
    let reason = match reason.rfind(" at line ") {
        Some(idx) => &reason[..idx],
        None => reason,
    };

    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![reason.to_string()]);
    errors
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = fields.entry(field.to_string()).or_default();
            for e in errs {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: {}", field, e.code));
                messages.push(message);
            }
        }
        AppError::Validation(fields)
    }
}
