use axum::Router;

pub mod invoices;
pub mod system;

/// Router for the invoice endpoints (guarded by auth when configured).
pub fn router() -> Router {
    Router::new().nest("/invoices", invoices::router())
}
