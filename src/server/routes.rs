//! # HTTP API
//!
//! | method | path      | body                               | success                        |
//! |--------|-----------|------------------------------------|--------------------------------|
//! | POST   | `/encode` | multipart `file, message, password` | `{"status", "message"}`        |
//! | POST   | `/decode` | multipart `password`                | `{"message": <plaintext>}`     |
//! | GET    | `/health` |                                    | status and counters            |
//!
//! Failures are `{"error": ...}`. Every decode rejection (wrong password,
//! no artifact, corrupted artifact) shares one status and one message.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::error;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::StegoError;
use crate::server::requests::{DecodeRequest, EncodeRequest, RequestError};
use crate::server::service::StegoService;

/// Text returned for every decode rejection.
pub const DECODE_REJECTED: &str =
    "Could not recover a message: wrong password or no valid stego image";

/// Text returned for server-side faults.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Confirmation returned by a successful encode.
pub const ENCODE_CONFIRMATION: &str = "Encoded image saved as stego.png";

#[derive(Serialize)]
struct EncodeResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct DecodeResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub struct AppState {
    pub service: StegoService,
}

/// Failure of a handler, translated into a status and JSON body.
#[derive(Debug)]
pub enum ApiError {
    Request(RequestError),
    Stego(StegoError),
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

impl From<StegoError> for ApiError {
    fn from(e: StegoError) -> Self {
        Self::Stego(e)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Request(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Stego(e) if e.is_client_fault() => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Stego(e) if e.is_decode_rejection() => {
                (StatusCode::BAD_REQUEST, DECODE_REJECTED.to_string())
            }
            Self::Stego(e) => {
                error!("❌ Internal fault: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "stegvault",
        "metrics": state.service.metrics().snapshot(),
    }))
}

async fn encode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let request = EncodeRequest::from_multipart(multipart).await?;
    state.service.encode(request).await?;

    Ok((
        StatusCode::OK,
        Json(EncodeResponse {
            status: "success",
            message: ENCODE_CONFIRMATION,
        }),
    ))
}

async fn decode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let request = DecodeRequest::from_multipart(multipart).await?;
    let message = state.service.decode(request).await?;

    Ok((StatusCode::OK, Json(DecodeResponse { message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Stego(StegoError::CapacityExceeded {
                    required_bits: 2,
                    capacity_bits: 1,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Stego(StegoError::UnsupportedFormat("gif".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Request(RequestError::MissingField("file")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Stego(StegoError::InternalFault("disk full".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_and_message().0, expected);
        }
    }

    #[test]
    fn test_decode_rejections_are_indistinguishable() {
        let rejections = [
            StegoError::AuthenticationFailed,
            StegoError::NotFound,
            StegoError::FormatCorrupted("length".into()),
            StegoError::FormatUnrecognized(0x09),
        ];

        for err in rejections {
            let (status, message) = ApiError::Stego(err).status_and_message();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, DECODE_REJECTED);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let (_, message) =
            ApiError::Stego(StegoError::InternalFault("/secret/path".into())).status_and_message();
        assert_eq!(message, INTERNAL_ERROR);
    }
}
