/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 全 route に access middleware (access_token → 識別ヘッダ) を掛ける
 * - 匿名を許すかどうかは handler の extractor (CallerCtx / RequireCaller) で決める
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::caller::{me, whoami};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/whoami", get(whoami))
        .route("/me", get(me));

    middleware::auth::access::apply(router, state)
}
