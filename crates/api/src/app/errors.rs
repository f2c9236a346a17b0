use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicebook_core::DomainError;
use invoicebook_infra::DatabaseError;

pub fn database_error_to_response(err: DatabaseError) -> axum::response::Response {
    tracing::error!(error = %err, "storage operation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string())
}

/// Validation failures answer with the bare list of violations.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(violations) => {
            (StatusCode::BAD_REQUEST, axum::Json(violations)).into_response()
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    tracing::warn!(error = %rejection.body_text(), "rejected request body");
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
