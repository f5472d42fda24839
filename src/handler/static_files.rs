//! Static HTML serving module
//!
//! Serves `.html` files from the public directory with a `404.html`
//! fallback page.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Check whether a request path is eligible for static serving
///
/// Only `/` (the default document) and `.html` paths are served statically;
/// everything else falls through to the API router.
pub fn is_static_path(path: &str) -> bool {
    path == "/" || path.ends_with(".html")
}

/// Serve an HTML file from the public directory
pub async fn serve_html(request_path: &str, public_dir: &str) -> Response<Full<Bytes>> {
    let file_path = resolve(public_dir, request_path);

    match fs::read(&file_path).await {
        Ok(content) => html_response(StatusCode::OK, content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => serve_not_found_page(public_dir).await,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
        }
    }
}

/// Serve the custom 404 page, or a plain-text 404 if it is missing too
pub async fn serve_not_found_page(public_dir: &str) -> Response<Full<Bytes>> {
    let fallback = Path::new(public_dir).join("404.html");
    match fs::read(&fallback).await {
        Ok(content) => html_response(StatusCode::NOT_FOUND, content),
        Err(_) => plain_response(StatusCode::NOT_FOUND, "404 Not Found"),
    }
}

/// Resolve a request path inside the public directory
///
/// Only normal path components survive; root, current-dir and parent-dir
/// components are dropped, so the result cannot escape `public_dir`.
fn resolve(public_dir: &str, request_path: &str) -> PathBuf {
    let request_path = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };

    let mut resolved = PathBuf::from(public_dir);
    for component in Path::new(request_path).components() {
        if let Component::Normal(part) = component {
            resolved.push(part);
        }
    }
    resolved
}

fn html_response(status: StatusCode, content: Vec<u8>) -> Response<Full<Bytes>> {
    let content_length = content.len();
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build HTML response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

fn plain_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build plain response: {e}"));
            Response::new(Full::new(Bytes::from(message)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_static_path_eligibility() {
        assert!(is_static_path("/"));
        assert!(is_static_path("/index.html"));
        assert!(is_static_path("/pages/about.html"));
        assert!(!is_static_path("/api/items"));
        assert!(!is_static_path("/style.css"));
        assert!(!is_static_path("/index"));
    }

    #[test]
    fn test_resolve_maps_root_to_index() {
        assert_eq!(resolve("public", "/"), PathBuf::from("public/index.html"));
        assert_eq!(
            resolve("public", "/about.html"),
            PathBuf::from("public/about.html")
        );
    }

    #[test]
    fn test_resolve_strips_traversal_components() {
        assert_eq!(
            resolve("public", "/../secret.html"),
            PathBuf::from("public/secret.html")
        );
        assert_eq!(
            resolve("public", "/a/../../b.html"),
            PathBuf::from("public/a/b.html")
        );
        assert_eq!(
            resolve("public", "/./x.html"),
            PathBuf::from("public/x.html")
        );
    }

    #[tokio::test]
    async fn test_serves_existing_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        let public = dir.path().to_string_lossy().into_owned();

        let response = serve_html("/", &public).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_missing_page_serves_custom_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), "<h1>gone</h1>").unwrap();
        let public = dir.path().to_string_lossy().into_owned();

        let response = serve_html("/nonexistent.html", &public).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "<h1>gone</h1>");
    }

    #[tokio::test]
    async fn test_missing_404_page_falls_back_to_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().to_string_lossy().into_owned();

        let response = serve_html("/nonexistent.html", &public).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
        assert_eq!(body_text(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_traversal_cannot_escape_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().join("public");
        std::fs::create_dir(&public_dir).unwrap();
        std::fs::write(dir.path().join("secret.html"), "top secret").unwrap();
        let public = public_dir.to_string_lossy().into_owned();

        let response = serve_html("/../secret.html", &public).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_ne!(body_text(response).await, "top secret");
    }
}
