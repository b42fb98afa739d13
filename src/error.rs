/*
 * Responsibility
 * - サービス間で共有するエラーペイロード (RestError) の定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 起動時エラー (AppError) の定義
 */
use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::oauth::LookupBuildError;

/// Structured error carried across service boundaries.
///
/// Wire shape: `{"message": .., "status": .., "error": .., "causes": [..]}`.
/// Every field is optional on input so that a partially filled payload from a
/// remote service still parses.
#[derive(Debug, Clone, Default, PartialEq, Error, Serialize, Deserialize)]
#[error("message: {message} - status: {status} - error: {error}")]
pub struct RestError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub causes: Vec<serde_json::Value>,
}

// `"causes": null` is what most producers send when there is nothing to add.
fn null_as_empty<'de, D>(de: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(de)?.unwrap_or_default())
}

impl RestError {
    pub fn new(message: impl Into<String>, status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
            error: error.into(),
            causes: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, "bad_request")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::NOT_FOUND, "not_found")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNAUTHORIZED, "unauthorized")
    }

    /// Internal error; the cause is kept as a string in `causes`.
    pub fn internal_server_error(message: impl Into<String>, cause: impl Display) -> Self {
        let mut err = Self::new(
            message,
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
        );
        err.causes.push(serde_json::Value::String(cause.to_string()));
        err
    }

    /// Parse a remote error body. A JSON `null` yields an empty error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(serde_json::from_slice::<Option<Self>>(bytes)?.unwrap_or_default())
    }

    /// HTTP status of this error. Out-of-range values render as 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Startup / process-level errors. Request-level failures use `RestError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupBuildError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
