// API response envelope module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Response, StatusCode};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Uniform JSON envelope carried by every API reply
///
/// Serializes as `{"success": true, "data": ...}` on success and as
/// `{"success": false, "error": ...}` or `{"success": false, "errors": [...]}`
/// on failure.
#[derive(Debug)]
pub enum Envelope<T> {
    /// Successful reply carrying the payload
    Success(T),
    /// Failed reply with a single error message
    Error(String),
    /// Failed validation with itemized messages
    Invalid(Vec<String>),
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Self::Success(data) => {
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
            }
            Self::Error(error) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
            }
            Self::Invalid(errors) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("errors", errors)?;
            }
        }
        s.end()
    }
}

/// Build a JSON response from an envelope
pub fn json_response<T: Serialize>(status: StatusCode, body: &Envelope<T>) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &Envelope::<()>::Error("internal server error".to_string()),
            );
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Successful reply with the given status and data
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response<Full<Bytes>> {
    json_response(status, &Envelope::Success(data))
}

/// Failed reply with a single message
pub fn failure(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &Envelope::<()>::Error(message.to_string()))
}

/// 404 Not Found
pub fn not_found(message: &str) -> Response<Full<Bytes>> {
    failure(StatusCode::NOT_FOUND, message)
}

/// 400 Bad Request
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    failure(StatusCode::BAD_REQUEST, message)
}

/// 422 Unprocessable Entity with itemized validation messages
pub fn unprocessable(errors: Vec<String>) -> Response<Full<Bytes>> {
    json_response(StatusCode::UNPROCESSABLE_ENTITY, &Envelope::<()>::Invalid(errors))
}

/// 405 Method Not Allowed
pub fn method_not_allowed() -> Response<Full<Bytes>> {
    let mut response = failure(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, POST, PUT, DELETE"));
    response
}

/// 413 Payload Too Large
pub fn payload_too_large() -> Response<Full<Bytes>> {
    failure(StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
}

/// 500 with a generic message, details stay server-side
pub fn internal_error() -> Response<Full<Bytes>> {
    failure(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::Success(vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": [1, 2, 3]})
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = Envelope::<()>::Error("item not found".to_string());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "item not found"})
        );
    }

    #[test]
    fn test_invalid_envelope_shape() {
        let envelope = Envelope::<()>::Invalid(vec!["name is required".to_string()]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "errors": ["name is required"]})
        );
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(ALLOW).unwrap(),
            "GET, POST, PUT, DELETE"
        );
    }
}
