//! HTTP adapter.
//!
//! JSON API over the calculation pipeline: `POST /calculate`,
//! `GET /functions` and `GET /health`. Any origin may call it.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::settings::Settings;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/calculate", post(handlers::calculate))
        .route("/functions", get(handlers::functions))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind `settings.listen_addr()` and serve until the process is stopped.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = state.settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await
}
