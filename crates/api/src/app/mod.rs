//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: invoice service over the configured database, email service
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::BasicCredentials;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router.
///
/// With `credentials` set, the invoice routes require HTTP Basic auth;
/// `/health` and unknown paths (404) stay open either way.
pub fn build_app(services: Arc<AppServices>, credentials: Option<BasicCredentials>) -> Router {
    let mut invoices = routes::router().layer(Extension(services));
    if let Some(credentials) = credentials {
        invoices = invoices.route_layer(axum::middleware::from_fn_with_state(
            middleware::AuthState { credentials },
            middleware::basic_auth_middleware,
        ));
    }

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(invoices)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
