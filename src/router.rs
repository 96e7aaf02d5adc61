//! # Request Routing
//!
//! Exactly two path shapes, `POST /api/fotos/:dni` and `GET /api/fotos/:dni`,
//! are handled locally; everything else falls through to the reverse
//! proxy, including other methods on the photo path and WebSocket upgrades.
//! CORS is wide open (trusted internal network, browsers on other origins)
//! and a panic guard keeps one bad request from taking the process down.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::photos::handlers::{find_foto, save_foto};
use crate::photos::PhotoStore;
use crate::proxy::{proxy_handler, ProxyState};

/// Uploads are data URIs of full-resolution photos; sized to the limit the
/// existing clients were built against.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub struct AppState {
    pub photos: PhotoStore,
    pub proxy: ProxyState,
}

pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/fotos/:dni",
            post(save_foto)
                .get(find_foto)
                .fallback(proxy_handler)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .fallback(proxy_handler)
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
