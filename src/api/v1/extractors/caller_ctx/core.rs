use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::RestError;

use super::CallerCtx;

/// Always succeeds; an anonymous caller has `caller_id == 0`.
impl<S> FromRequestParts<S> for CallerCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallerCtx::from_headers(&parts.headers))
    }
}

/// Handler で認証済みの呼び出し元を要求するための extractor
/// public 扱いでなく caller_id が 0 の場合は 401 を返す
pub struct RequireCaller(pub CallerCtx);

impl<S> FromRequestParts<S> for RequireCaller
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = CallerCtx::from_headers(&parts.headers);

        if !ctx.public && !ctx.is_authenticated() {
            return Err(RestError::unauthorized("a valid access_token is required"));
        }

        Ok(RequireCaller(ctx))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/me");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn caller_ctx_reads_headers() {
        let mut p = parts(&[("x-caller-id", "42"), ("x-client-id", "7")]);

        let ctx = CallerCtx::from_request_parts(&mut p, &()).await.unwrap();

        assert_eq!(
            ctx,
            CallerCtx {
                public: false,
                caller_id: 42,
                client_id: 7
            }
        );
        assert!(ctx.is_authenticated());
    }

    #[tokio::test]
    async fn require_caller_rejects_anonymous() {
        let mut p = parts(&[("x-caller-id", "not-a-number")]);

        let Err(err) = RequireCaller::from_request_parts(&mut p, &()).await else {
            panic!("anonymous caller must be rejected");
        };

        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_caller_allows_public() {
        let mut p = parts(&[("x-public", "true")]);

        let RequireCaller(ctx) = RequireCaller::from_request_parts(&mut p, &()).await.unwrap();

        assert!(ctx.public);
        assert_eq!(ctx.caller_id, 0);
    }
}
