/*
 * Responsibility
 * - GET /whoami: 匿名でも可。解決済みの identity をそのまま返す
 * - GET /me: 認証済み (または public) のみ
 */
use axum::Json;

use crate::api::v1::{
    dto::caller::CallerResponse,
    extractors::{CallerCtx, RequireCaller},
};

pub async fn whoami(ctx: CallerCtx) -> Json<CallerResponse> {
    Json(ctx.into())
}

pub async fn me(RequireCaller(ctx): RequireCaller) -> Json<CallerResponse> {
    tracing::debug!(caller_id = ctx.caller_id, client_id = ctx.client_id, "me");
    Json(ctx.into())
}
