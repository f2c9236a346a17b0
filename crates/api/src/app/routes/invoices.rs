use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::InvoiceDraft;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(add_invoice))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(remove_invoice),
        )
}

fn parse_id(raw: &str) -> Result<InvoiceId, axum::response::Response> {
    raw.parse::<InvoiceId>().map_err(|e| {
        tracing::warn!(id = raw, "invalid invoice id");
        errors::domain_error_to_response(e)
    })
}

pub async fn add_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<InvoiceDraft>, JsonRejection>,
) -> axum::response::Response {
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let invoice = match draft.validate() {
        Ok(invoice) => invoice.without_id(),
        Err(e) => {
            tracing::warn!("invalid invoice passed - arguments validation");
            return errors::domain_error_to_response(e);
        }
    };

    tracing::info!(invoice_number = invoice.invoice_number(), "saving invoice");
    let id = match services.invoices.save(invoice).await {
        Ok(id) => id,
        Err(e) => return errors::database_error_to_response(e),
    };
    tracing::info!(invoice_id = %id, "invoice was added");

    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/invoices/{id}"))],
        Json(json!({ "id": id })),
    )
        .into_response()
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.invoices.list().await {
        Ok(invoices) => {
            tracing::info!(count = invoices.len(), "invoice list has been read");
            (StatusCode::OK, Json(invoices)).into_response()
        }
        Err(e) => errors::database_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.invoices.get_by_id(id).await {
        Ok(Some(invoice)) => (StatusCode::OK, Json(invoice)).into_response(),
        Ok(None) => {
            tracing::warn!(invoice_id = %id, "invoice does not exist");
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found")
        }
        Err(e) => errors::database_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<InvoiceDraft>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    if draft.id != Some(id) {
        tracing::warn!(invoice_id = %id, body_id = ?draft.id, "invoice id does not match the path");
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "id_mismatch",
            "invoice id in the body must match the id in the path",
        );
    }

    let invoice = match draft.validate() {
        Ok(invoice) => invoice,
        Err(e) => {
            tracing::warn!(invoice_id = %id, "invalid invoice passed - arguments validation");
            return errors::domain_error_to_response(e);
        }
    };

    match services.invoices.update(id, invoice).await {
        Ok(true) => {
            tracing::info!(invoice_id = %id, "invoice was updated");
            StatusCode::OK.into_response()
        }
        Ok(false) => {
            tracing::warn!(invoice_id = %id, "invoice does not exist");
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found")
        }
        Err(e) => errors::database_error_to_response(e),
    }
}

pub async fn remove_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.invoices.delete(id).await {
        Ok(true) => {
            tracing::info!(invoice_id = %id, "invoice was deleted");
            StatusCode::OK.into_response()
        }
        Ok(false) => {
            tracing::warn!(invoice_id = %id, "invoice does not exist");
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found")
        }
        Err(e) => errors::database_error_to_response(e),
    }
}
