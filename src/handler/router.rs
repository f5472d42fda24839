//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: rejects oversized bodies,
//! decides between static HTML serving and the JSON API, and writes the
//! access log line.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else if method == Method::GET && static_files::is_static_path(&path) {
        static_files::serve_html(&path, &state.config.files.public_dir).await
    } else {
        api::handle_api_request(req, &state).await
    };

    if state.config.logging.access_log {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(
            &peer_addr,
            &method,
            &path,
            response.status().as_u16(),
            body_bytes,
        );
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };

    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(api::response::payload_too_large())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}
