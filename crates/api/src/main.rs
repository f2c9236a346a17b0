use std::sync::Arc;

use anyhow::Context;

use invoicebook_api::app::{build_app, services};
use invoicebook_api::config::AppConfig;
use invoicebook_infra::notification::spawn_daily_report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invoicebook_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.credentials.is_none() {
        tracing::warn!("INVOICEBOOK_AUTH_USER not set; invoice endpoints are unauthenticated");
    }

    let services = Arc::new(
        services::build_services(&config)
            .await
            .with_context(|| format!("failed to open the {} database", config.database.kind))?,
    );

    if config.email.report_enabled {
        spawn_daily_report(services.email.clone());
        tracing::info!(recipient = %config.email.recipient, "daily report enabled");
    }

    let app = build_app(services, config.credentials.clone());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(addr = %listener.local_addr()?, database = %config.database.kind, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
