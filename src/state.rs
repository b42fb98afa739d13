/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: auth: Authenticator (introspection client を内包)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::oauth::Authenticator;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth }
    }
}
