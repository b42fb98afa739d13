/*
 * Responsibility
 * - リクエストの識別ヘッダを除去 → access_token を取り出し → 解決 → ヘッダへ書き戻す
 * - NotFound は匿名扱い (エラーにしない)
 * - 認証必須かどうかの判断は handler 側 (RequireCaller など) の責務
 */
use axum::http::{HeaderValue, Request};

use crate::services::oauth::{
    error::OauthError,
    headers::{self, HEADER_X_CALLER_ID, HEADER_X_CLIENT_ID},
    resolver::TokenResolver,
};

pub const PARAM_ACCESS_TOKEN: &str = "access_token";

#[derive(Clone)]
pub struct Authenticator {
    resolver: TokenResolver,
}

impl Authenticator {
    pub fn new(resolver: TokenResolver) -> Self {
        Self { resolver }
    }

    /// Rewrite the identity headers of `req` from its `access_token` query
    /// parameter.
    ///
    /// On `Ok(())` either both `X-Caller-Id` and `X-Client-Id` were written
    /// by this call, or neither is present. On `Err` neither is present.
    pub async fn authenticate_request<B>(
        &self,
        req: Option<&mut Request<B>>,
    ) -> Result<(), OauthError> {
        let Some(req) = req else {
            return Ok(());
        };

        headers::clean_request(req.headers_mut());

        let Some(token_id) = access_token_param(req.uri().query()) else {
            return Ok(());
        };

        let at = match self.resolver.resolve(&token_id).await {
            Ok(at) => at,
            Err(err) if err.is_not_found() => {
                tracing::debug!("unknown access token, continuing anonymously");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let h = req.headers_mut();
        h.append(HEADER_X_CALLER_ID, HeaderValue::from(at.user_id));
        h.append(HEADER_X_CLIENT_ID, HeaderValue::from(at.client_id));

        Ok(())
    }
}

/// First `access_token` value, trimmed. Blank counts as absent.
///
/// Pairs holding a `;` or a malformed `%` escape are dropped, not decoded
/// loosely.
fn access_token_param(query: Option<&str>) -> Option<String> {
    let query = query?;

    query
        .split('&')
        .filter(|pair| !pair.contains(';') && !has_bad_escape(pair))
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
        .find(|(k, _)| k == PARAM_ACCESS_TOKEN)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn has_bad_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return true,
            }
        } else {
            i += 1;
        }
    }
    false
}
