//! # HTTP Forwarding
//!
//! Streams a request to the backend and the backend's response back to the
//! client. The `Host` header is replaced with the target's (the backend
//! virtual-hosts on its own name) and hop-by-hop headers are dropped in both
//! directions; everything else passes through verbatim.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderName};
use axum::response::Response;
use log::error;

use super::rewrite::apply_rewrites;
use super::{proxy_error, ProxyState};

pub async fn forward(proxy: &ProxyState, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match try_forward(proxy, req).await {
        Ok(response) => response,
        Err(e) => {
            error!("❌ Proxy error forwarding {} {}: {}", method, path, e);
            proxy_error()
        }
    }
}

async fn try_forward(proxy: &ProxyState, req: Request) -> anyhow::Result<Response> {
    let (parts, body) = req.into_parts();

    let mut url = format!(
        "{}{}",
        proxy.target,
        apply_rewrites(&proxy.rewrites, parts.uri.path())
    );
    if let Some(query) = parts.uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let mut upstream = proxy.client.request(parts.method, url);
    for (name, value) in parts.headers.iter() {
        if name == header::HOST || is_hop_by_hop(name) {
            continue;
        }
        upstream = upstream.header(name, value);
    }

    let response = upstream
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await?;

    let mut builder = Response::builder().status(response.status());
    for (name, value) in response.headers() {
        if is_hop_by_hop(name) {
            continue;
        }
        builder = builder.header(name, value);
    }
    Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_by_hop_headers_are_recognized() {
        assert!(is_hop_by_hop(&header::CONNECTION));
        assert!(is_hop_by_hop(&header::TRANSFER_ENCODING));
        assert!(is_hop_by_hop(&header::UPGRADE));
        assert!(!is_hop_by_hop(&header::CONTENT_TYPE));
        assert!(!is_hop_by_hop(&header::AUTHORIZATION));
    }
}
