//! `access_token` クエリ → introspection → X-Caller-Id / X-Client-Id を付与
//!
//! - 識別ヘッダは毎回除去してから書き直す (クライアントによる偽装を防ぐ)
//! - token が無い / 404 の場合は匿名のまま handler に渡す
//! - それ以外の失敗はここで打ち切り、RestError をそのまま返す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::oauth::OauthError;
use crate::state::AppState;

/// `/api/v1/*` に認証パイプラインを掛ける。
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, OauthError> {
    if let Err(err) = state.auth.authenticate_request(Some(&mut req)).await {
        tracing::warn!(
            error = %err,
            status = %err.status_code(),
            path = %req.uri().path(),
            "request authentication failed"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}
