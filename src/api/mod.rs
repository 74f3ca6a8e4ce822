use std::sync::Arc;
use anyhow::Context;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
pub use error::ApiError;
use crate::config::Config;
use crate::service::TagService;

mod error;
mod controllers;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Clone)]
pub struct ApiContext {
    pub cfg: Arc<Config>,
    pub tags: TagService,
}

impl ApiContext {
    pub fn new(config: Config, tags: TagService) -> Self {
        Self {
            cfg: Arc::new(config),
            tags,
        }
    }
}

pub fn app(ctx: ApiContext) -> Router {
    controllers::router()
        .layer(CorsLayer::new().allow_methods(Any).allow_headers(Any).allow_origin(Any))
        .layer(ServiceBuilder::new().layer(Extension(ctx)).layer(TraceLayer::new_for_http()))
}

pub async fn serve(ctx: ApiContext) -> anyhow::Result<()> {
    let addr = ctx.cfg.api.listen_addr.clone();
    let app = app(ctx);

    let listener = tokio::net::TcpListener::bind(&addr).await
        .with_context(|| format!("failed to bind to address {addr}"))?;
    info!("listening on {}", &addr);
    axum::serve(listener, app).await.context("error running HTTP server")
}
