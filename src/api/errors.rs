use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use validator::ValidationErrors;

use crate::db::errors::StoreError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable { detail: String, fields: BTreeMap<String, Vec<String>> },
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Maps persistence failures. `entity` names the thing being written, e.g. "Student".
    pub(crate) fn from_store(err: StoreError, entity: &str) -> Self {
        let duplicate_field = err.duplicate_field();
        match err {
            StoreError::DuplicateKey { .. } => {
                let field = duplicate_field.unwrap_or("value");
                Self::Conflict(format!("{entity} with this {field} already exists"))
            }
            StoreError::Reference { constraint } => {
                tracing::debug!(constraint = %constraint, "Write referenced a missing parent");
                Self::BadRequest("Invalid selection".to_string())
            }
            StoreError::ValueTooLong => {
                Self::single_field("value", format!("{entity} value is too long"))
            }
            StoreError::NotFound(what) => Self::NotFound(format!("{} not found", capitalize(what))),
            StoreError::Database(error) => {
                Self::internal(error, &format!("Failed to write {}", entity.to_lowercase()))
            }
        }
    }

    pub(crate) fn single_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        Self::Unprocessable { detail: message, fields }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: BTreeMap<String, Vec<String>> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|message| message.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid"))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self::Unprocessable { detail: "Validation failed".to_string(), fields }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail, fields) = match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string(), None),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string(), None),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            ApiError::Unprocessable { detail, fields } => {
                (StatusCode::UNPROCESSABLE_ENTITY, detail, Some(fields))
            }
            ApiError::TooManyRequests(message) => {
                (StatusCode::TOO_MANY_REQUESTS, message.to_string(), None)
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        (status, Json(ErrorResponse { status: status.as_u16(), detail, fields })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn duplicate_key_becomes_conflict_naming_field() {
        let err = StoreError::DuplicateKey { constraint: "users_email_key".to_string() };
        let (status, json) = body_json(ApiError::from_store(err, "Student")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["detail"], "Student with this email already exists");
    }

    #[tokio::test]
    async fn reference_becomes_invalid_selection() {
        let err = StoreError::Reference { constraint: "students_level_id_fkey".to_string() };
        let (status, json) = body_json(ApiError::from_store(err, "Student")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "Invalid selection");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_context() {
        let (status, json) = body_json(ApiError::internal("boom", "Failed to load user")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Internal server error");
        assert!(json.get("fields").is_none());
    }

    #[derive(Validate)]
    struct Labelled {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let errors = Labelled { name: String::new() }.validate().unwrap_err();
        let (status, json) = body_json(ApiError::from(errors)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["fields"]["name"][0], "name must not be empty");
    }

    #[tokio::test]
    async fn overlong_values_are_unprocessable() {
        let error = ApiError::from_store(StoreError::ValueTooLong, "Level");
        let (status, json) = body_json(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["fields"]["value"][0], "Level value is too long");
    }

    #[tokio::test]
    async fn not_found_names_entity() {
        let error = ApiError::from_store(StoreError::NotFound("course"), "Course");
        let (status, json) = body_json(error).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["detail"], "Course not found");
    }
}
