use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::RestError;

/// Outcome of a failed token resolution.
///
/// Every variant carries the `RestError` that is eventually sent back to the
/// original caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OauthError {
    /// Introspection service unreachable, or it broke the response contract.
    #[error("{0}")]
    Internal(RestError),

    /// Remote service reported the token as unknown (404).
    #[error("{0}")]
    NotFound(RestError),

    /// Any other error reported by the remote service, kept verbatim.
    #[error("{0}")]
    Remote(RestError),
}

impl OauthError {
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Internal(RestError::internal_server_error(message, cause))
    }

    /// Classify an error payload returned by the remote service.
    pub fn from_remote(err: RestError) -> Self {
        if err.status == StatusCode::NOT_FOUND.as_u16() {
            Self::NotFound(err)
        } else {
            Self::Remote(err)
        }
    }

    pub fn rest_error(&self) -> &RestError {
        match self {
            Self::Internal(e) | Self::NotFound(e) | Self::Remote(e) => e,
        }
    }

    pub fn into_rest_error(self) -> RestError {
        match self {
            Self::Internal(e) | Self::NotFound(e) | Self::Remote(e) => e,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.rest_error().status_code()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for OauthError {
    fn into_response(self) -> Response {
        self.into_rest_error().into_response()
    }
}

/// No response was obtained from the introspection service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// The introspection client could not be built.
#[derive(Debug, Error)]
pub enum LookupBuildError {
    #[error("oauth base url cannot take path segments: {0}")]
    InvalidBaseUrl(String),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_404_is_not_found() {
        let err = OauthError::from_remote(RestError::not_found("no access token found"));

        assert!(err.is_not_found());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_remote_statuses_pass_through() {
        let remote = RestError::bad_request("invalid access token id");
        let err = OauthError::from_remote(remote.clone());

        assert_eq!(err, OauthError::Remote(remote.clone()));
        assert_eq!(err.into_rest_error(), remote);
    }

    #[test]
    fn response_uses_payload_status() {
        let res = OauthError::internal("lookup failed", "network timeout").into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
