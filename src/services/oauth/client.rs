//! Introspection client interface used by the token resolver.
use async_trait::async_trait;
use url::Url;

use crate::config::OauthConfig;
use crate::services::oauth::error::{LookupBuildError, TransportError};
use crate::services::oauth::types::RawResponse;

/// The one capability the resolver needs from the remote side:
/// given a token id, return the raw response or a transport failure.
///
/// Implementations are shared across requests and must be safe for
/// concurrent use.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn fetch(&self, token_id: &str) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed lookup against `GET {base_url}/oauth/access_token/{id}`.
///
/// The timeout is applied to the whole call (connect + headers + body).
#[derive(Clone, Debug)]
pub struct HttpTokenLookup {
    http: reqwest::Client,
    // `{base_url}/oauth/access_token`, checked to accept path segments
    endpoint: Url,
}

impl HttpTokenLookup {
    pub fn new(config: &OauthConfig) -> Result<Self, LookupBuildError> {
        let mut endpoint = config.base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| LookupBuildError::InvalidBaseUrl(config.base_url.to_string()))?
            .pop_if_empty()
            .extend(["oauth", "access_token"]);

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, endpoint })
    }

    /// Token id goes in as a single, percent-encoded path segment.
    pub fn token_url(&self, token_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        // `endpoint` accepted segments in `new`, so this always applies
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(token_id);
        }
        url
    }
}

#[async_trait]
impl TokenLookup for HttpTokenLookup {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, token_id: &str) -> Result<RawResponse, TransportError> {
        let res = self.http.get(self.token_url(token_id)).send().await?;

        let status = res.status().as_u16();
        let body = res.bytes().await?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
