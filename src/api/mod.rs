// API module entry
// JSON CRUD endpoints for the item collection

mod handlers;
pub mod response;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Resource addressed by an `/api/items` request path
#[derive(Debug, PartialEq, Eq)]
enum ItemsPath {
    Collection,
    Single(String),
}

/// API route handler
///
/// Dispatches to the CRUD handlers based on request method and path; every
/// path that is not the items resource is an unknown route.
pub async fn handle_api_request(
    req: Request<Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match parse_items_path(&path) {
        Some(ItemsPath::Collection) => match method {
            Method::GET => handlers::list_items(state).await,
            Method::POST => match read_body(req).await {
                Ok(body) => handlers::create_item(state, &body).await,
                Err(resp) => resp,
            },
            _ => response::method_not_allowed(),
        },
        Some(ItemsPath::Single(id)) => match method {
            Method::GET => handlers::get_item(state, &id).await,
            Method::PUT => match read_body(req).await {
                Ok(body) => handlers::update_item(state, &id, &body).await,
                Err(resp) => resp,
            },
            Method::DELETE => handlers::delete_item(state, &id).await,
            _ => response::method_not_allowed(),
        },
        None => response::not_found("not found"),
    }
}

/// Collect the request body into a single buffer
async fn read_body(req: Request<Incoming>) -> Result<Bytes, Response<Full<Bytes>>> {
    match req.into_body().collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Err(response::bad_request("failed to read request body"))
        }
    }
}

/// Parse `/api/items` and `/api/items/{id}`; anything else is unknown
fn parse_items_path(path: &str) -> Option<ItemsPath> {
    let rest = path.strip_prefix("/api/items")?;
    match rest {
        "" | "/" => Some(ItemsPath::Collection),
        _ => {
            let id = rest.strip_prefix('/')?;
            if id.is_empty() || id.contains('/') {
                None
            } else {
                Some(ItemsPath::Single(id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(parse_items_path("/api/items"), Some(ItemsPath::Collection));
        assert_eq!(parse_items_path("/api/items/"), Some(ItemsPath::Collection));
    }

    #[test]
    fn test_single_item_path() {
        assert_eq!(
            parse_items_path("/api/items/abc-123"),
            Some(ItemsPath::Single("abc-123".to_string()))
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(parse_items_path("/api/other"), None);
        assert_eq!(parse_items_path("/api/itemsaurus"), None);
        assert_eq!(parse_items_path("/api/items/a/b"), None);
        assert_eq!(parse_items_path("/somewhere"), None);
        assert_eq!(parse_items_path("/"), None);
    }
}
