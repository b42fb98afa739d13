/*
 * Responsibility
 * - access token id → AccessToken の解決 (リモート呼び出しは 1 回のみ)
 * - レスポンスを OauthError に分類する
 *   - 通信失敗 / 不正なペイロード → Internal
 *   - 404 → NotFound
 *   - それ以外のリモートエラー → Remote (そのまま返す)
 * - リトライ・キャッシュはしない
 */
use std::sync::Arc;

use crate::error::RestError;
use crate::services::oauth::{
    client::TokenLookup, error::OauthError, types::AccessToken, types::RawResponse,
};

const MSG_NO_RESPONSE: &str = "invalid restclient response when trying to get access token";
const MSG_BAD_ERROR_BODY: &str = "invalid error interface when trying to get access token";
const MSG_BAD_TOKEN_BODY: &str = "error when trying to unmarshal access token response";

#[derive(Clone)]
pub struct TokenResolver {
    lookup: Arc<dyn TokenLookup>,
}

impl TokenResolver {
    pub fn new(lookup: Arc<dyn TokenLookup>) -> Self {
        Self { lookup }
    }

    /// `token_id` must be non-empty; the authenticator filters blanks out.
    pub async fn resolve(&self, token_id: &str) -> Result<AccessToken, OauthError> {
        let res = match self.lookup.fetch(token_id).await {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    backend = self.lookup.backend_name(),
                    "access token lookup failed"
                );
                return Err(OauthError::internal(MSG_NO_RESPONSE, err));
            }
        };

        classify(res)
    }
}

fn classify(res: RawResponse) -> Result<AccessToken, OauthError> {
    if !res.is_success() {
        let remote = match RestError::from_bytes(&res.body) {
            Ok(remote) => remote,
            Err(err) => {
                tracing::warn!(status = res.status, error = %err, "unparsable error payload");
                return Err(OauthError::internal(MSG_BAD_ERROR_BODY, err));
            }
        };

        // the payload's own status decides, not the transport status
        tracing::debug!(status = remote.status, error = %remote.error, "access token rejected");
        return Err(OauthError::from_remote(remote));
    }

    serde_json::from_slice::<AccessToken>(&res.body).map_err(|err| {
        tracing::warn!(status = res.status, error = %err, "unparsable access token payload");
        OauthError::internal(MSG_BAD_TOKEN_BODY, err)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::services::oauth::error::TransportError;

    /// Scripted lookup: returns a fixed answer and records requested ids.
    pub(crate) struct FakeLookup {
        answer: Mutex<Option<Result<RawResponse, TransportError>>>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        pub(crate) fn responding(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(Ok(RawResponse::new(status, body)))),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(err: TransportError) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(Err(err))),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenLookup for FakeLookup {
        fn backend_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch(&self, token_id: &str) -> Result<RawResponse, TransportError> {
            self.calls.lock().unwrap().push(token_id.to_string());
            self.answer
                .lock()
                .unwrap()
                .take()
                .expect("FakeLookup answers once")
        }
    }

    async fn resolve_with(lookup: Arc<FakeLookup>, token_id: &str) -> Result<AccessToken, OauthError> {
        TokenResolver::new(lookup).resolve(token_id).await
    }

    #[tokio::test]
    async fn resolves_token() {
        let lookup = FakeLookup::responding(200, r#"{"id":"abc","user_id":42,"client_id":7}"#);

        let at = resolve_with(lookup.clone(), "abc").await.unwrap();

        assert_eq!(at.id, "abc");
        assert_eq!(at.user_id, 42);
        assert_eq!(at.client_id, 7);
        assert_eq!(lookup.calls(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn zero_ids_in_success_body_are_kept() {
        let lookup = FakeLookup::responding(200, r#"{"id":"abc","user_id":0,"client_id":0}"#);

        let at = resolve_with(lookup, "abc").await.unwrap();

        assert_eq!((at.user_id, at.client_id), (0, 0));
    }

    #[tokio::test]
    async fn transport_failure_is_internal() {
        let lookup = FakeLookup::failing(TransportError::Timeout);

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        let OauthError::Internal(rest) = err else {
            panic!("expected internal error, got {err:?}");
        };
        assert_eq!(rest.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rest.message, MSG_NO_RESPONSE);
        assert_eq!(rest.causes, vec![serde_json::json!("request timed out")]);
    }

    #[tokio::test]
    async fn malformed_success_body_is_internal() {
        let lookup = FakeLookup::responding(200, r#"{"id":"abc","user_id":"forty-two"}"#);

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert!(matches!(&err, OauthError::Internal(rest) if rest.message == MSG_BAD_TOKEN_BODY));
    }

    #[tokio::test]
    async fn empty_success_body_is_internal() {
        let lookup = FakeLookup::responding(200, "");

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert!(matches!(err, OauthError::Internal(_)));
    }

    #[tokio::test]
    async fn remote_404_is_not_found() {
        let lookup = FakeLookup::responding(
            404,
            r#"{"message":"no access token found with given id","status":404,"error":"not_found","causes":null}"#,
        );

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remote_400_passes_through() {
        let body = r#"{"message":"invalid access token id","status":400,"error":"bad_request","causes":[]}"#;
        let lookup = FakeLookup::responding(400, body);

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert_eq!(err, OauthError::Remote(RestError::from_bytes(body.as_bytes()).unwrap()));
    }

    #[tokio::test]
    async fn remote_status_in_payload_wins() {
        let lookup = FakeLookup::responding(
            500,
            r#"{"message":"token revoked","status":404,"error":"not_found"}"#,
        );

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn payload_without_status_is_not_not_found() {
        let lookup = FakeLookup::responding(404, r#"{"message":"unknown token"}"#);

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        let OauthError::Remote(rest) = &err else {
            panic!("expected remote error, got {err:?}");
        };
        assert_eq!(rest.status, 0);
        assert_eq!(rest.message, "unknown token");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn null_error_body_passes_through_as_zero_error() {
        let lookup = FakeLookup::responding(400, "null");

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert_eq!(err, OauthError::Remote(RestError::default()));
    }

    #[tokio::test]
    async fn unparsable_error_body_is_internal() {
        let lookup = FakeLookup::responding(502, "<html>Bad Gateway</html>");

        let err = resolve_with(lookup, "abc").await.unwrap_err();

        assert!(matches!(&err, OauthError::Internal(rest) if rest.message == MSG_BAD_ERROR_BODY));
    }
}
