//! HTTP surface: axum router, handlers, and the error-to-status mapping.

pub mod error;
pub mod handlers;

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::AppContext;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/avatar", get(handlers::avatar))
        .route("/api/diary", get(handlers::diary))
        .route("/api/ratings", get(handlers::ratings))
        .route("/api/ratings-timeline", get(handlers::ratings_timeline))
        .route("/api/watchtime", get(handlers::watchtime))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

pub async fn serve(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let host: IpAddr = ctx
        .config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid bind host {:?}", ctx.config.server.host))?;
    let addr = (host, ctx.config.server.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(ctx))
        .await
        .context("server exited")
}
