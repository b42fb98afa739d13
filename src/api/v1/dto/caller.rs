/*
 * Responsibility
 * - 呼び出し元 identity の response DTO
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::extractors::CallerCtx;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerResponse {
    pub public: bool,
    pub authenticated: bool,
    pub caller_id: i64,
    pub client_id: i64,
}

impl From<CallerCtx> for CallerResponse {
    fn from(ctx: CallerCtx) -> Self {
        Self {
            public: ctx.public,
            authenticated: ctx.is_authenticated(),
            caller_id: ctx.caller_id,
            client_id: ctx.client_id,
        }
    }
}
