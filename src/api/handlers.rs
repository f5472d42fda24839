// Item CRUD handlers module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use uuid::Uuid;

use super::response;
use crate::config::AppState;
use crate::item::{Item, ItemPayload};
use crate::logger;

/// GET /api/items
pub async fn list_items(state: &AppState) -> Response<Full<Bytes>> {
    match read_collection(state).await {
        Ok(items) => response::success(StatusCode::OK, &items),
        Err(resp) => resp,
    }
}

/// GET /api/items/{id}
pub async fn get_item(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    let items = match read_collection(state).await {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    match items.iter().find(|item| item.id == id) {
        Some(item) => response::success(StatusCode::OK, item),
        None => response::not_found("item not found"),
    }
}

/// POST /api/items
pub async fn create_item(state: &AppState, body: &Bytes) -> Response<Full<Bytes>> {
    let payload = match parse_payload(body) {
        Ok(payload) => payload,
        Err(resp) => return resp,
    };

    let item = match payload.into_item(Uuid::new_v4().to_string()) {
        Ok(item) => item,
        Err(errors) => return response::unprocessable(errors),
    };

    let mut items = match read_collection(state).await {
        Ok(items) => items,
        Err(resp) => return resp,
    };
    items.push(item.clone());

    if let Err(resp) = write_collection(state, &items).await {
        return resp;
    }
    response::success(StatusCode::CREATED, &item)
}

/// PUT /api/items/{id}
///
/// An unknown id is reported before validation, so 404 wins over 422.
pub async fn update_item(state: &AppState, id: &str, body: &Bytes) -> Response<Full<Bytes>> {
    let payload = match parse_payload(body) {
        Ok(payload) => payload,
        Err(resp) => return resp,
    };

    let mut items = match read_collection(state).await {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    let Some(item) = items.iter_mut().find(|item| item.id == id) else {
        return response::not_found("item not found");
    };

    if let Err(errors) = payload.apply_to(item) {
        return response::unprocessable(errors);
    }
    let updated = item.clone();

    if let Err(resp) = write_collection(state, &items).await {
        return resp;
    }
    response::success(StatusCode::OK, &updated)
}

/// DELETE /api/items/{id}
pub async fn delete_item(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    let mut items = match read_collection(state).await {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    let Some(position) = items.iter().position(|item| item.id == id) else {
        return response::not_found("item not found");
    };
    let removed = items.remove(position);

    if let Err(resp) = write_collection(state, &items).await {
        return resp;
    }
    response::success(StatusCode::OK, &removed)
}

/// Parse a POST/PUT body into a payload
fn parse_payload(body: &Bytes) -> Result<ItemPayload, Response<Full<Bytes>>> {
    if body.is_empty() {
        return Err(response::bad_request("request body is required"));
    }

    serde_json::from_slice(body).map_err(|e| {
        logger::log_warning(&format!("Rejected malformed request body: {e}"));
        response::bad_request("request body is not valid JSON")
    })
}

async fn read_collection(state: &AppState) -> Result<Vec<Item>, Response<Full<Bytes>>> {
    state.store.read_items().await.map_err(|e| {
        logger::log_error(&format!("Failed to read item collection: {e}"));
        response::internal_error()
    })
}

async fn write_collection(
    state: &AppState,
    items: &[Item],
) -> Result<(), Response<Full<Bytes>>> {
    state.store.write_items(items).await.map_err(|e| {
        logger::log_error(&format!("Failed to write item collection: {e}"));
        response::internal_error()
    })
}
