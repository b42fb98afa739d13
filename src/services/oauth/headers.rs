/*
 * Responsibility
 * - 認証パイプラインが扱う識別ヘッダの読み取り / 除去
 * - `None` はリクエストが存在しない場合を表す
 *
 * Notes
 * - 数値でないヘッダ値は 0 (未認証) と区別しない
 */
use axum::http::{HeaderMap, HeaderName};

pub const HEADER_X_PUBLIC: HeaderName = HeaderName::from_static("x-public");
pub const HEADER_X_CALLER_ID: HeaderName = HeaderName::from_static("x-caller-id");
pub const HEADER_X_CLIENT_ID: HeaderName = HeaderName::from_static("x-client-id");

/// `true` when there is no request, or the upstream gateway flagged it with
/// exactly `X-Public: true`.
pub fn is_public(headers: Option<&HeaderMap>) -> bool {
    let Some(headers) = headers else {
        return true;
    };

    headers
        .get(&HEADER_X_PUBLIC)
        .is_some_and(|v| v.as_bytes() == b"true")
}

pub fn get_caller_id(headers: Option<&HeaderMap>) -> i64 {
    parse_id(headers, &HEADER_X_CALLER_ID)
}

pub fn get_client_id(headers: Option<&HeaderMap>) -> i64 {
    parse_id(headers, &HEADER_X_CLIENT_ID)
}

/// Drop every value of both identity headers.
pub fn clean_request(headers: &mut HeaderMap) {
    headers.remove(&HEADER_X_CALLER_ID);
    headers.remove(&HEADER_X_CLIENT_ID);
}

fn parse_id(headers: Option<&HeaderMap>, name: &HeaderName) -> i64 {
    headers
        .and_then(|h| h.get(name))
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}
