//! # Reverse Proxy
//!
//! Transparent forwarding of every non-photo request to the backend
//! application:
//!
//! - [`rewrite`]: the static path-rewrite table
//! - [`http`]: plain request/response forwarding over a shared client
//! - [`ws`]: WebSocket upgrade bridging
//!
//! Forwarding failures are logged and answered with a generic 500; they
//! never terminate the process and are never retried.

pub mod http;
pub mod rewrite;
pub mod ws;

use anyhow::{ensure, Context, Result};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::router::AppState;

/// Shared forwarding state: one client for the life of the process, the
/// backend base URL, and the rewrite table.
pub struct ProxyState {
    client: reqwest::Client,
    /// Backend base URL without a trailing slash; forwarded paths are
    /// appended verbatim.
    target: String,
    rewrites: Vec<(String, String)>,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let target = config.target.trim_end_matches('/').to_string();
        let url = reqwest::Url::parse(&target).context("RUTA_APP is not a valid URL")?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "RUTA_APP must be an http or https URL"
        );

        // The gateway passes redirects through to the browser untouched.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed to build the forwarding client")?;

        Ok(Self {
            client,
            target,
            rewrites: config.rewrites.clone(),
        })
    }

    /// The backend base URL with a ws/wss scheme.
    fn ws_target(&self) -> String {
        self.target.replacen("http", "ws", 1)
    }
}

/// Fallback handler for everything outside the photo API. WebSocket
/// upgrades are bridged; anything else is forwarded as plain HTTP.
pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    upgrade: Option<WebSocketUpgrade>,
    req: Request,
) -> Response {
    match upgrade {
        Some(upgrade) => ws::bridge(&state.proxy, upgrade, &req),
        None => http::forward(&state.proxy, req).await,
    }
}

/// The one response shape for any forwarding failure.
fn proxy_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Proxy error").into_response()
}
