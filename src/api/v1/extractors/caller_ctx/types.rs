/*
 * Responsibility
 * - Handler から見える「呼び出し元コンテキスト」の型
 *
 * Notes
 * - 値はヘッダからのみ作る。ヘッダの信頼性は access middleware が保証する
 * - caller_id == 0 は未認証
 */
use axum::http::HeaderMap;

use crate::services::oauth::headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerCtx {
    pub public: bool,
    pub caller_id: i64,
    pub client_id: i64,
}

impl CallerCtx {
    pub fn from_headers(h: &HeaderMap) -> Self {
        Self {
            public: headers::is_public(Some(h)),
            caller_id: headers::get_caller_id(Some(h)),
            client_id: headers::get_client_id(Some(h)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller_id != 0
    }
}
