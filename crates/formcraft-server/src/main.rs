//! FormCraft API Server
//!
//! Stores form documents produced by the editor and serves published forms
//! by slug.
//!
//! ## Routes
//!
//! ```text
//! POST   /api/forms                  create (201)
//! GET    /api/forms?skip=&limit=     list, newest first
//! GET    /api/forms/{id}             load
//! PUT    /api/forms/{id}             partial update, `null` removes nullable keys
//! DELETE /api/forms/{id}?permanent=  archive, or delete when permanent
//! POST   /api/forms/{id}/publish     publish
//! GET    /api/forms/public/{slug}    published forms only
//! POST   /api/forms/{slug}/submit    public submission (201, rate limited)
//! GET    /api/forms/{id}/submissions submissions, newest first
//! ```
//!
//! Errors are returned as `{ "detail": "<message>" }`.

mod config;
mod rate_limit;
mod repository;
mod routes;

use config::ServerConfig;
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formcraft_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let addr = config.addr;
    info!("Published forms served under {}/forms", config.public_url);

    let app = routes::router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("FormCraft server listening on {}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
}
