mod blob;
mod bundles;
mod captcha;
mod config;
mod error;
mod mailer;
mod models;
mod money;
mod pdf;
mod ratelimit;
mod routes;
mod state;
mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchdesk=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    let state = Arc::new(state::AppState {
        mailer: mailer::Mailer::new(
            &config.email_api_url,
            &config.email_api_key,
            &config.mail_from,
        ),
        blob: blob::BlobStore::new(&config.blob_base_url, &config.blob_token),
        limiter: ratelimit::RateLimiter::new(config.porting_rate_per_minute),
        http: reqwest::Client::new(),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/quote/pdf", post(routes::quote_pdf))
        .route("/api/quote/email", post(routes::quote_email))
        .route("/api/invoice/pdf", post(routes::invoice_pdf))
        .route("/api/invoice/email", post(routes::invoice_email))
        .route("/api/sla/pdf", post(routes::sla_pdf))
        .route("/api/orders/:order_id/documents", post(routes::generate_order_documents))
        .route("/api/orders/:order_id/links", get(routes::order_links))
        .route("/api/orders/:order_id/files/:filename", get(routes::order_file))
        .route("/api/orders/:order_id/archive", get(routes::order_archive))
        .route("/api/porting", post(routes::submit_porting))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Switchdesk listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
